//! # Lectio Core Library
//!
//! This library provides the core business logic for Lectio, a
//! devotional reading companion. It implements a CLI-first philosophy
//! where all operations are available via a standalone CLI binary,
//! with any GUI being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Plan Generator**: deterministic day-by-day chapter schedules
//!   from named strategies over the scripture catalog
//! - **Unlock Gate**: pure calendar-day progression for shared reading
//!   rooms -- one chapter unlocks per elapsed day
//! - **Progress Tracker**: per-user, per-plan completion state with
//!   idempotent operations and atomic conditional updates
//! - **Auto-Completion Fan-out**: one chapter-read event marks every
//!   active plan that schedules the chapter
//! - **Streak Tracker**: consecutive-calendar-day engagement counter
//! - **Storage**: versioned document store (SQLite or in-memory) and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Engine`]: facade the presentation layer talks to
//! - [`Strategy`]: schedule distribution algorithms
//! - [`DocumentStore`]: storage contract with compare-and-swap
//! - [`Clock`]: injectable time source

pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod plan;
pub mod progress;
pub mod room;
pub mod store;
pub mod streak;

pub use catalog::{Catalog, ScriptureBook};
pub use clock::{Clock, DayBoundary, ManualClock, SystemClock};
pub use config::Config;
pub use engine::{Engine, ReadingOutcome};
pub use error::{ConfigError, CoreError, PlanError, ProgressError, Result, StoreError};
pub use plan::{ChapterAssignment, PlanPreset, ReadingPlan, Strategy, PRESETS};
pub use progress::{
    AffectedPlan, Completion, CompletionFanout, FanoutReport, PlanFailure, ProgressTracker,
    UserPlanProgress,
};
pub use room::{current_chapter, is_unlocked, Room, RoomStatus};
pub use store::{Document, DocumentStore, MemoryStore, SqliteStore};
pub use streak::{StreakTracker, UserStreakState};
