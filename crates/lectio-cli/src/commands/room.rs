use clap::Subcommand;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::common::open_engine;

#[derive(Subcommand)]
pub enum RoomAction {
    /// Create a reading room for a book
    Create {
        name: String,
        book: String,
        /// Start date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        start_date: Option<String>,
    },
    /// List rooms
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show a room's unlock state
    Status {
        id: Uuid,
        #[arg(long)]
        json: bool,
    },
    /// Check whether a chapter is unlocked in a room
    Unlocked { id: Uuid, chapter: u32 },
}

pub fn run(action: RoomAction) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, _config) = open_engine()?;
    match action {
        RoomAction::Create {
            name,
            book,
            start_date,
        } => {
            let start = match start_date {
                Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")?,
                None => engine.today(),
            };
            let room = engine.create_room(&name, &book, start)?;
            println!("Created room '{}' ({}) -- id {}", room.name, room.book, room.id);
        }
        RoomAction::List { json } => {
            let rooms = engine.rooms()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rooms)?);
            } else {
                for room in rooms {
                    println!("{}  {} ({}, from {})", room.id, room.name, room.book, room.start_date);
                }
            }
        }
        RoomAction::Status { id, json } => match engine.room_status(id)? {
            Some(status) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&status)?);
                } else {
                    println!(
                        "{}: chapter {} of {} unlocked",
                        status.room.name, status.unlocked_through, status.total_chapters
                    );
                    if status.fully_unlocked() {
                        println!("All chapters are unlocked.");
                    }
                }
            }
            None => println!("No room with id {id}"),
        },
        RoomAction::Unlocked { id, chapter } => match engine.room(id)? {
            Some(room) => {
                if engine.is_unlocked(&room, chapter) {
                    println!("{} {} is unlocked", room.book, chapter);
                } else {
                    println!("{} {} is still locked", room.book, chapter);
                }
            }
            None => println!("No room with id {id}"),
        },
    }
    Ok(())
}
