use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "lectio-cli", version, about = "Lectio CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scripture catalog
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Reading plan management
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Record a chapter read (auto-completes plans, updates streak)
    Read {
        /// Book name, e.g. "João"
        book: String,
        /// Chapter number
        chapter: u32,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Daily streak
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Shared reading rooms
    Room {
        #[command(subcommand)]
        action: commands::room::RoomAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Read {
            book,
            chapter,
            user,
            json,
        } => commands::read::run(&book, chapter, user, json),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Room { action } => commands::room::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "lectio-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
