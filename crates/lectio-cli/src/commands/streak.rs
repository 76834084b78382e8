use clap::Subcommand;

use crate::common::{open_engine, user_or_default};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Show the current streak
    Show {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = open_engine()?;
    match action {
        StreakAction::Show { user, json } => {
            let user = user_or_default(user, &config);
            match engine.streak(&user)? {
                Some(state) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&state)?);
                    } else {
                        println!("{}: {} day(s)", user, state.streak);
                        if let Some(date) = state.last_activity_date {
                            println!("Last activity: {date}");
                        }
                    }
                }
                None => println!("{user} has no activity yet"),
            }
        }
    }
    Ok(())
}
