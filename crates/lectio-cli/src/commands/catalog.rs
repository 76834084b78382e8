use clap::Subcommand;
use lectio_core::Catalog;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List books and chapter counts
    List {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CatalogAction::List { json } => {
            let catalog = Catalog::canonical();
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.books())?);
            } else {
                for book in catalog.books() {
                    println!("{:>3}  {}", book.chapter_count, book.name);
                }
                println!(
                    "\n{} books, {} chapters",
                    catalog.books().len(),
                    catalog.total_chapters()
                );
            }
        }
    }
    Ok(())
}
