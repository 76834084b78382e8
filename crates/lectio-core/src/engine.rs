//! Engine facade.
//!
//! Wires the catalog, document store, clock and day-boundary policy
//! into one object the presentation layer talks to. The two mutating
//! entry points are [`Engine::start_plan`] and
//! [`Engine::record_reading`]; everything else is a read.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::clock::{Clock, DayBoundary};
use crate::error::{PlanError, Result};
use crate::plan::{generator, ReadingPlan, PRESETS};
use crate::progress::{CompletionFanout, FanoutReport, ProgressTracker, UserPlanProgress};
use crate::room::{Room, RoomStatus};
use crate::store::{keys, DocumentStore};
use crate::streak::{StreakTracker, UserStreakState};

/// Everything one chapter-read event changed.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingOutcome {
    pub fanout: FanoutReport,
    pub streak: u32,
}

/// The temporal progression engine.
pub struct Engine {
    catalog: Catalog,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    boundary: DayBoundary,
    tracker: ProgressTracker,
    fanout: CompletionFanout,
    streaks: StreakTracker,
}

impl Engine {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>, boundary: DayBoundary) -> Self {
        let tracker = ProgressTracker::new(store.clone(), clock.clone());
        let fanout = CompletionFanout::new(store.clone(), tracker.clone());
        let streaks = StreakTracker::new(store.clone(), boundary);
        Self {
            catalog: Catalog::canonical(),
            store,
            clock,
            boundary,
            tracker,
            fanout,
            streaks,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Today's date under the engine's day-boundary policy.
    pub fn today(&self) -> NaiveDate {
        self.boundary.date_of(self.clock.now())
    }

    // ── Plans ────────────────────────────────────────────────────────

    /// Materialize every built-in plan that does not exist yet.
    pub fn ensure_presets(&self) -> Result<Vec<ReadingPlan>> {
        PRESETS.iter().map(|p| self.ensure_plan(p.slug)).collect()
    }

    /// Materialize the named plan, or return the stored one.
    ///
    /// Uniqueness by display name is enforced with an atomic name-index
    /// claim, so concurrent callers can never create duplicates.
    pub fn ensure_plan(&self, slug: &str) -> Result<ReadingPlan> {
        let preset = generator::preset(slug)?;
        if let Some(existing) = self.plan_by_name(preset.name)? {
            return Ok(existing);
        }

        let plan = ReadingPlan::materialize(preset, &self.catalog)?;
        let claimed = self
            .store
            .insert(&keys::plan_name(preset.name), json!({ "id": plan.id }))?;
        if !claimed {
            // Another process materialized it between our check and the
            // claim; theirs won.
            return self
                .plan_by_name(preset.name)?
                .ok_or_else(|| PlanError::NoSuchPlan(preset.name.to_string()).into());
        }
        self.store
            .insert(&keys::plan(plan.id), serde_json::to_value(&plan)?)?;
        info!(
            slug,
            plan_id = %plan.id,
            days = plan.duration_days,
            chapters = plan.schedule_len(),
            "materialized reading plan"
        );
        Ok(plan)
    }

    /// All stored plans, in name-index order.
    pub fn plans(&self) -> Result<Vec<ReadingPlan>> {
        let docs = self.store.list(keys::PLAN_PREFIX)?;
        let mut plans = Vec::with_capacity(docs.len());
        for doc in docs {
            plans.push(doc.decode()?);
        }
        Ok(plans)
    }

    pub fn plan(&self, id: Uuid) -> Result<Option<ReadingPlan>> {
        match self.store.get(&keys::plan(id))? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Resolve a plan by its unique display name.
    pub fn plan_by_name(&self, name: &str) -> Result<Option<ReadingPlan>> {
        let Some(index) = self.store.get(&keys::plan_name(name))? else {
            return Ok(None);
        };
        let id: Uuid = serde_json::from_value(index.body["id"].clone())?;
        self.plan(id)
    }

    /// Resolve a plan by preset slug or display name.
    pub fn find_plan(&self, ident: &str) -> Result<ReadingPlan> {
        if let Ok(preset) = generator::preset(ident) {
            if let Some(plan) = self.plan_by_name(preset.name)? {
                return Ok(plan);
            }
        }
        self.plan_by_name(ident)?
            .ok_or_else(|| PlanError::NoSuchPlan(ident.to_string()).into())
    }

    // ── Progress ─────────────────────────────────────────────────────

    /// Start a plan for a user (idempotent).
    pub fn start_plan(&self, user: &str, ident: &str) -> Result<UserPlanProgress> {
        let plan = self.find_plan(ident)?;
        self.tracker.start(user, &plan)
    }

    pub fn progress(&self, user: &str, plan_id: Uuid) -> Result<Option<UserPlanProgress>> {
        self.tracker.progress(user, plan_id)
    }

    pub fn active_plans(&self, user: &str) -> Result<Vec<UserPlanProgress>> {
        self.tracker.active_plans(user)
    }

    pub fn completed_plans(&self, user: &str) -> Result<Vec<UserPlanProgress>> {
        self.tracker.completed_plans(user)
    }

    /// Every user's progress through one plan.
    pub fn plan_progress(&self, plan_id: Uuid) -> Result<Vec<UserPlanProgress>> {
        self.tracker.all_for_plan(plan_id)
    }

    /// The combined "I just read chapter X" entry point: fans the
    /// completion out across the user's active plans and touches the
    /// streak.
    pub fn record_reading(&self, user: &str, book: &str, chapter: u32) -> Result<ReadingOutcome> {
        let max = self.catalog.chapter_count(book)?;
        if chapter < 1 || chapter > max {
            return Err(PlanError::ChapterOutOfRange {
                book: book.to_string(),
                chapter,
                max,
            }
            .into());
        }

        let fanout = self.fanout.on_chapter_read(user, book, chapter)?;
        let streak = self.streaks.touch(user, self.clock.now())?;
        Ok(ReadingOutcome { fanout, streak })
    }

    // ── Streaks ──────────────────────────────────────────────────────

    pub fn streak(&self, user: &str) -> Result<Option<UserStreakState>> {
        self.streaks.state(user)
    }

    // ── Rooms ────────────────────────────────────────────────────────

    pub fn create_room(&self, name: &str, book: &str, start_date: NaiveDate) -> Result<Room> {
        // Reject unknown books before anything is stored.
        self.catalog.chapter_count(book)?;
        let room = Room {
            id: Uuid::new_v4(),
            name: name.to_string(),
            book: book.to_string(),
            start_date,
            created_at: self.clock.now(),
        };
        self.store
            .insert(&keys::room(room.id), serde_json::to_value(&room)?)?;
        info!(room_id = %room.id, book, %start_date, "created reading room");
        Ok(room)
    }

    pub fn rooms(&self) -> Result<Vec<Room>> {
        let docs = self.store.list(keys::ROOM_PREFIX)?;
        let mut rooms = Vec::with_capacity(docs.len());
        for doc in docs {
            rooms.push(doc.decode()?);
        }
        Ok(rooms)
    }

    pub fn room(&self, id: Uuid) -> Result<Option<Room>> {
        match self.store.get(&keys::room(id))? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Derived unlock state of a room at this instant.
    pub fn room_status(&self, id: Uuid) -> Result<Option<RoomStatus>> {
        let Some(room) = self.room(id)? else {
            return Ok(None);
        };
        let total = self.catalog.chapter_count(&room.book)?;
        Ok(Some(RoomStatus::derive(room, total, self.today())))
    }

    /// Whether a chapter of a room's book is readable right now.
    pub fn is_unlocked(&self, room: &Room, chapter: u32) -> bool {
        crate::room::is_unlocked(room.start_date, chapter, self.today())
    }
}
