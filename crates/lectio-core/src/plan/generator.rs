//! Schedule generation strategies.
//!
//! Each strategy is a deterministic distribution of catalog chapters
//! over plan days. Generation runs once per named plan, at first use;
//! the resulting schedule is stored and never regenerated.

use serde::{Deserialize, Serialize};

use super::ChapterAssignment;
use crate::catalog::{Catalog, ScriptureBook};
use crate::error::PlanError;

/// How a plan's schedule is distributed over its days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Every chapter of every book, one chapter per day, catalog order.
    WholeBookSequential,
    /// A contiguous catalog slice spread over a fixed number of days,
    /// `ceil(total / duration)` chapters per day. The last day may run
    /// short; the day counter never exceeds `duration_days`.
    SubsetProportional {
        first_book: String,
        last_book: String,
        duration_days: u32,
    },
    /// One chapter of each of two books per day. The shorter book
    /// wraps back to chapter 1 when the span outruns it.
    DualBookInterleave {
        first_book: String,
        second_book: String,
        duration_days: u32,
    },
    /// Like `SubsetProportional` over an explicit book list, but the
    /// final day absorbs all remaining chapters instead of the counter
    /// ever passing `duration_days`.
    FilteredSubsetCapped {
        books: Vec<String>,
        duration_days: u32,
    },
}

impl Strategy {
    /// Resolve a built-in strategy name.
    ///
    /// # Errors
    /// Returns [`PlanError::UnknownStrategy`] for names the generator
    /// does not recognize.
    pub fn from_name(name: &str) -> Result<Self, PlanError> {
        match name {
            "biblia-completa" => Ok(Strategy::WholeBookSequential),
            "novo-testamento-90" => Ok(Strategy::SubsetProportional {
                first_book: "Mateus".to_string(),
                last_book: "Apocalipse".to_string(),
                duration_days: 90,
            }),
            "salmos-proverbios-60" => Ok(Strategy::DualBookInterleave {
                first_book: "Salmos".to_string(),
                second_book: "Provérbios".to_string(),
                duration_days: 60,
            }),
            "evangelhos-30" => Ok(Strategy::FilteredSubsetCapped {
                books: vec![
                    "Mateus".to_string(),
                    "Marcos".to_string(),
                    "Lucas".to_string(),
                    "João".to_string(),
                ],
                duration_days: 30,
            }),
            other => Err(PlanError::UnknownStrategy(other.to_string())),
        }
    }

    /// Materialize the day-by-day schedule against a catalog.
    ///
    /// An empty book subset yields an empty schedule, not an error.
    pub fn generate(&self, catalog: &Catalog) -> Result<Vec<ChapterAssignment>, PlanError> {
        match self {
            Strategy::WholeBookSequential => Ok(whole_book_sequential(catalog.books())),
            Strategy::SubsetProportional {
                first_book,
                last_book,
                duration_days,
            } => {
                let books = catalog.slice(first_book, last_book)?;
                Ok(proportional(&books, *duration_days, false))
            }
            Strategy::DualBookInterleave {
                first_book,
                second_book,
                duration_days,
            } => {
                let first_len = catalog.chapter_count(first_book)?;
                let second_len = catalog.chapter_count(second_book)?;
                Ok(interleave(
                    first_book,
                    first_len,
                    second_book,
                    second_len,
                    *duration_days,
                ))
            }
            Strategy::FilteredSubsetCapped {
                books,
                duration_days,
            } => {
                let books = catalog.subset(books);
                Ok(proportional(&books, *duration_days, true))
            }
        }
    }
}

fn whole_book_sequential(books: &[ScriptureBook]) -> Vec<ChapterAssignment> {
    let mut schedule = Vec::new();
    let mut day = 0u32;
    for book in books {
        for chapter in 1..=book.chapter_count {
            day += 1;
            schedule.push(ChapterAssignment {
                book: book.name.clone(),
                chapter,
                day,
            });
        }
    }
    schedule
}

/// Fill days left to right with `ceil(total / duration)` chapters each.
/// With `capped`, the day counter stops at `duration` and the final day
/// absorbs whatever is left; without it the counter simply never needs
/// to pass `duration` because of the ceiling division.
fn proportional(books: &[ScriptureBook], duration: u32, capped: bool) -> Vec<ChapterAssignment> {
    let total: u32 = books.iter().map(|b| b.chapter_count).sum();
    if total == 0 || duration == 0 {
        return Vec::new();
    }
    let per_day = total.div_ceil(duration);

    let mut schedule = Vec::with_capacity(total as usize);
    let mut day = 1u32;
    let mut placed_in_day = 0u32;
    for book in books {
        for chapter in 1..=book.chapter_count {
            if placed_in_day == per_day && (!capped || day < duration) {
                day += 1;
                placed_in_day = 0;
            }
            schedule.push(ChapterAssignment {
                book: book.name.clone(),
                chapter,
                day,
            });
            placed_in_day += 1;
        }
    }
    schedule
}

fn interleave(
    first: &str,
    first_len: u32,
    second: &str,
    second_len: u32,
    duration: u32,
) -> Vec<ChapterAssignment> {
    let mut schedule = Vec::with_capacity(2 * duration as usize);
    for day in 1..=duration {
        schedule.push(ChapterAssignment {
            book: first.to_string(),
            chapter: (day - 1) % first_len + 1,
            day,
        });
        schedule.push(ChapterAssignment {
            book: second.to_string(),
            chapter: (day - 1) % second_len + 1,
            day,
        });
    }
    schedule
}

/// A built-in plan the application ships.
#[derive(Debug, Clone, Copy)]
pub struct PlanPreset {
    /// Strategy name, also the CLI identifier for the plan.
    pub slug: &'static str,
    /// Display name; unique across all plans.
    pub name: &'static str,
    pub description: &'static str,
    pub badge_id: &'static str,
}

/// The plans materialized on first use.
pub const PRESETS: &[PlanPreset] = &[
    PlanPreset {
        slug: "biblia-completa",
        name: "Bíblia Completa",
        description: "Toda a Bíblia, um capítulo por dia.",
        badge_id: "badge-biblia-completa",
    },
    PlanPreset {
        slug: "novo-testamento-90",
        name: "Novo Testamento em 90 dias",
        description: "Os 27 livros do Novo Testamento em até 90 dias.",
        badge_id: "badge-novo-testamento",
    },
    PlanPreset {
        slug: "salmos-proverbios-60",
        name: "Salmos e Provérbios",
        description: "Um salmo e um provérbio por dia, durante 60 dias.",
        badge_id: "badge-salmos-proverbios",
    },
    PlanPreset {
        slug: "evangelhos-30",
        name: "Evangelhos em 30 dias",
        description: "Mateus, Marcos, Lucas e João em um mês.",
        badge_id: "badge-evangelhos",
    },
];

/// Look up a preset by slug.
pub fn preset(slug: &str) -> Result<&'static PlanPreset, PlanError> {
    PRESETS
        .iter()
        .find(|p| p.slug == slug)
        .ok_or_else(|| PlanError::UnknownStrategy(slug.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScriptureBook;

    fn book(name: &str, chapters: u32) -> ScriptureBook {
        ScriptureBook {
            name: name.to_string(),
            chapter_count: chapters,
        }
    }

    #[test]
    fn whole_book_sequential_one_chapter_per_day() {
        let catalog = Catalog::from_books(vec![book("A", 2), book("B", 3)]);
        let schedule = Strategy::WholeBookSequential.generate(&catalog).unwrap();
        assert_eq!(schedule.len(), 5);
        let days: Vec<u32> = schedule.iter().map(|a| a.day).collect();
        assert_eq!(days, vec![1, 2, 3, 4, 5]);
        assert_eq!(schedule[2].book, "B");
        assert_eq!(schedule[2].chapter, 1);
    }

    #[test]
    fn proportional_ten_chapters_over_three_days() {
        // ceil(10/3) = 4 per day: days 1,1,1,1,2,2,2,2,3,3.
        let catalog = Catalog::from_books(vec![book("A", 6), book("B", 4)]);
        let schedule = Strategy::SubsetProportional {
            first_book: "A".to_string(),
            last_book: "B".to_string(),
            duration_days: 3,
        }
        .generate(&catalog)
        .unwrap();
        let days: Vec<u32> = schedule.iter().map(|a| a.day).collect();
        assert_eq!(days, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3]);
        assert_eq!(days.iter().max(), Some(&3));
    }

    #[test]
    fn proportional_days_never_exceed_duration() {
        for chapters in 1..40u32 {
            for duration in 1..10u32 {
                let catalog = Catalog::from_books(vec![book("A", chapters)]);
                let schedule = Strategy::SubsetProportional {
                    first_book: "A".to_string(),
                    last_book: "A".to_string(),
                    duration_days: duration,
                }
                .generate(&catalog)
                .unwrap();
                let max_day = schedule.iter().map(|a| a.day).max().unwrap();
                assert!(
                    max_day <= duration,
                    "{chapters} chapters over {duration} days reached day {max_day}"
                );
            }
        }
    }

    #[test]
    fn interleave_wraps_shorter_book() {
        // Book A has 3 chapters, B has 5, over 5 days: day 4 reads
        // A chapter 1 again and B chapter 4.
        let catalog = Catalog::from_books(vec![book("A", 3), book("B", 5)]);
        let schedule = Strategy::DualBookInterleave {
            first_book: "A".to_string(),
            second_book: "B".to_string(),
            duration_days: 5,
        }
        .generate(&catalog)
        .unwrap();
        assert_eq!(schedule.len(), 10);
        let day4: Vec<_> = schedule.iter().filter(|a| a.day == 4).collect();
        assert_eq!(day4[0].book, "A");
        assert_eq!(day4[0].chapter, 1);
        assert_eq!(day4[1].book, "B");
        assert_eq!(day4[1].chapter, 4);
    }

    #[test]
    fn capped_final_day_absorbs_remainder() {
        // 7 chapters over 2 days: ceil(7/2) = 4, so day 1 takes 4 and
        // day 2 takes the remaining 3 without ever reaching day 3.
        let catalog = Catalog::from_books(vec![book("A", 7)]);
        let schedule = Strategy::FilteredSubsetCapped {
            books: vec!["A".to_string()],
            duration_days: 2,
        }
        .generate(&catalog)
        .unwrap();
        let days: Vec<u32> = schedule.iter().map(|a| a.day).collect();
        assert_eq!(days, vec![1, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn capped_never_passes_duration_even_overfull() {
        // 9 chapters, 2 days, per_day = 5: day 2 keeps absorbing.
        let catalog = Catalog::from_books(vec![book("A", 9)]);
        let schedule = Strategy::FilteredSubsetCapped {
            books: vec!["A".to_string()],
            duration_days: 2,
        }
        .generate(&catalog)
        .unwrap();
        assert_eq!(schedule.iter().map(|a| a.day).max(), Some(2));
        assert_eq!(schedule.iter().filter(|a| a.day == 2).count(), 4);
    }

    #[test]
    fn empty_subset_yields_empty_schedule() {
        let catalog = Catalog::from_books(vec![book("A", 5)]);
        let schedule = Strategy::FilteredSubsetCapped {
            books: vec!["Z".to_string()],
            duration_days: 10,
        }
        .generate(&catalog)
        .unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn unknown_strategy_name_is_rejected() {
        assert!(matches!(
            Strategy::from_name("leitura-aleatoria"),
            Err(PlanError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn unknown_book_in_subset_slice_is_rejected() {
        let catalog = Catalog::from_books(vec![book("A", 5)]);
        let result = Strategy::SubsetProportional {
            first_book: "A".to_string(),
            last_book: "Nowhere".to_string(),
            duration_days: 3,
        }
        .generate(&catalog);
        assert!(matches!(result, Err(PlanError::UnknownBook(_))));
    }

    #[test]
    fn days_are_non_decreasing_for_all_presets() {
        let catalog = Catalog::canonical();
        for preset in PRESETS {
            let strategy = Strategy::from_name(preset.slug).unwrap();
            let schedule = strategy.generate(&catalog).unwrap();
            assert!(!schedule.is_empty(), "{} generated nothing", preset.slug);
            for pair in schedule.windows(2) {
                assert!(pair[0].day <= pair[1].day, "{} day order", preset.slug);
            }
        }
    }

    #[test]
    fn new_testament_preset_spans_87_days() {
        // 260 chapters / 90 days -> 3 per day -> 87 days used.
        let catalog = Catalog::canonical();
        let schedule = Strategy::from_name("novo-testamento-90")
            .unwrap()
            .generate(&catalog)
            .unwrap();
        assert_eq!(schedule.len(), 260);
        assert_eq!(schedule.iter().map(|a| a.day).max(), Some(87));
    }

    #[test]
    fn gospels_preset_fills_exactly_30_days() {
        let catalog = Catalog::canonical();
        let schedule = Strategy::from_name("evangelhos-30")
            .unwrap()
            .generate(&catalog)
            .unwrap();
        assert_eq!(schedule.len(), 89);
        assert_eq!(schedule.iter().map(|a| a.day).max(), Some(30));
    }

    #[test]
    fn whole_bible_preset_has_1189_days() {
        let catalog = Catalog::canonical();
        let schedule = Strategy::from_name("biblia-completa")
            .unwrap()
            .generate(&catalog)
            .unwrap();
        assert_eq!(schedule.len(), 1189);
        assert_eq!(schedule.iter().map(|a| a.day).max(), Some(1189));
    }

    #[test]
    fn psalms_proverbs_preset_wraps_proverbs() {
        // Provérbios has 31 chapters; day 32 wraps back to chapter 1.
        let catalog = Catalog::canonical();
        let schedule = Strategy::from_name("salmos-proverbios-60")
            .unwrap()
            .generate(&catalog)
            .unwrap();
        let day32: Vec<_> = schedule.iter().filter(|a| a.day == 32).collect();
        assert_eq!(day32.len(), 2);
        assert_eq!(day32[0].book, "Salmos");
        assert_eq!(day32[0].chapter, 32);
        assert_eq!(day32[1].book, "Provérbios");
        assert_eq!(day32[1].chapter, 1);
    }
}
