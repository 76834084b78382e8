//! Scripture catalog: the canonical list of books and chapter counts.
//!
//! Pure read-only reference data. The plan generator walks it to
//! materialize schedules; nothing in the engine ever mutates it.

mod books;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// One book of the canon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureBook {
    pub name: String,
    pub chapter_count: u32,
}

/// The ordered list of books the engine knows about.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<ScriptureBook>,
}

impl Catalog {
    /// The canonical 66-book catalog (Portuguese book names).
    pub fn canonical() -> Self {
        Self {
            books: books::canonical_books(),
        }
    }

    /// Build a catalog from arbitrary books. Used by tests.
    pub fn from_books(books: Vec<ScriptureBook>) -> Self {
        Self { books }
    }

    pub fn books(&self) -> &[ScriptureBook] {
        &self.books
    }

    pub fn book(&self, name: &str) -> Option<&ScriptureBook> {
        self.books.iter().find(|b| b.name == name)
    }

    pub fn chapter_count(&self, name: &str) -> Result<u32, PlanError> {
        self.book(name)
            .map(|b| b.chapter_count)
            .ok_or_else(|| PlanError::UnknownBook(name.to_string()))
    }

    /// Total chapters across the whole catalog.
    pub fn total_chapters(&self) -> u32 {
        self.books.iter().map(|b| b.chapter_count).sum()
    }

    /// The contiguous run of books from `first` through `last`, in
    /// catalog order.
    pub fn slice(&self, first: &str, last: &str) -> Result<Vec<ScriptureBook>, PlanError> {
        let start = self
            .books
            .iter()
            .position(|b| b.name == first)
            .ok_or_else(|| PlanError::UnknownBook(first.to_string()))?;
        let end = self
            .books
            .iter()
            .position(|b| b.name == last)
            .ok_or_else(|| PlanError::UnknownBook(last.to_string()))?;
        if end < start {
            return Ok(Vec::new());
        }
        Ok(self.books[start..=end].to_vec())
    }

    /// The named books, in catalog order, skipping names the catalog
    /// does not carry.
    pub fn subset(&self, names: &[String]) -> Vec<ScriptureBook> {
        self.books
            .iter()
            .filter(|b| names.iter().any(|n| *n == b.name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_has_66_books_and_1189_chapters() {
        let catalog = Catalog::canonical();
        assert_eq!(catalog.books().len(), 66);
        assert_eq!(catalog.total_chapters(), 1189);
    }

    #[test]
    fn chapter_count_lookup() {
        let catalog = Catalog::canonical();
        assert_eq!(catalog.chapter_count("João").unwrap(), 21);
        assert_eq!(catalog.chapter_count("Salmos").unwrap(), 150);
        assert!(matches!(
            catalog.chapter_count("Enoque"),
            Err(PlanError::UnknownBook(_))
        ));
    }

    #[test]
    fn slice_is_contiguous_and_ordered() {
        let catalog = Catalog::canonical();
        let nt = catalog.slice("Mateus", "Apocalipse").unwrap();
        assert_eq!(nt.len(), 27);
        assert_eq!(nt.first().unwrap().name, "Mateus");
        assert_eq!(nt.last().unwrap().name, "Apocalipse");
        assert_eq!(nt.iter().map(|b| b.chapter_count).sum::<u32>(), 260);
    }

    #[test]
    fn reversed_slice_is_empty() {
        let catalog = Catalog::canonical();
        assert!(catalog.slice("Apocalipse", "Mateus").unwrap().is_empty());
    }

    #[test]
    fn subset_keeps_catalog_order() {
        let catalog = Catalog::canonical();
        let names = vec!["João".to_string(), "Mateus".to_string()];
        let picked = catalog.subset(&names);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].name, "Mateus");
        assert_eq!(picked[1].name, "João");
    }
}
