//! Time-gated reading rooms.
//!
//! A room ties one book to a start date; one chapter unlocks per
//! calendar day. The progression is never stored -- it is a pure
//! function of the start date and "now", so it needs no timer: the
//! next request after midnight simply computes a bigger index.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::DayBoundary;

/// Chapter index unlocked at `today` for a room started on
/// `start_date`: day one unlocks chapter 1, each later day one more.
///
/// Clamped below at 1 (a future start date still shows chapter 1).
/// There is no upper clamp here; callers clamp against the book's
/// chapter count.
pub fn current_chapter(start_date: NaiveDate, today: NaiveDate) -> u32 {
    let unlocked = DayBoundary::days_between(start_date, today) + 1;
    unlocked.max(1) as u32
}

/// Whether chapter `chapter` of the room's book is readable at `today`.
pub fn is_unlocked(start_date: NaiveDate, chapter: u32, today: NaiveDate) -> bool {
    chapter >= 1 && chapter <= current_chapter(start_date, today)
}

/// A shared reading room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub book: String,
    /// Calendar date of the first unlocked chapter, in the engine's
    /// configured day-boundary basis.
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Derived room state for display.
#[derive(Debug, Clone, Serialize)]
pub struct RoomStatus {
    pub room: Room,
    /// Raw gate output, unclamped.
    pub current_chapter: u32,
    /// Gate output clamped to the book's chapter count.
    pub unlocked_through: u32,
    pub total_chapters: u32,
}

impl RoomStatus {
    pub fn derive(room: Room, total_chapters: u32, today: NaiveDate) -> Self {
        let current = current_chapter(room.start_date, today);
        Self {
            current_chapter: current,
            unlocked_through: current.min(total_chapters),
            total_chapters,
            room,
        }
    }

    pub fn fully_unlocked(&self) -> bool {
        self.current_chapter >= self.total_chapters
    }
}
