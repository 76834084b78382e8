//! Auto-completion fan-out.
//!
//! A single "chapter read" event is applied to every active plan that
//! schedules that chapter. Plans are independent: a store failure on
//! one plan is captured and the remaining plans still get their marks.

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use super::{Completion, ProgressTracker, UserPlanProgress};
use crate::error::{PlanError, Result};
use crate::plan::{chapter_key, ReadingPlan};
use crate::store::{keys, DocumentStore};

/// A plan that received a completion mark from the fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedPlan {
    pub plan_id: Uuid,
    pub plan_name: String,
    /// True when this mark finished the whole plan.
    pub plan_completed: bool,
    /// Badge earned, present only when the plan completed.
    pub badge_id: Option<String>,
}

/// A plan the fan-out could not update.
#[derive(Debug, Clone, Serialize)]
pub struct PlanFailure {
    pub plan_id: Uuid,
    pub message: String,
}

/// What a single chapter-read event did across the user's plans.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FanoutReport {
    pub affected: Vec<AffectedPlan>,
    pub failures: Vec<PlanFailure>,
}

impl FanoutReport {
    /// Display names of the plans that took the mark, for notification.
    pub fn plan_names(&self) -> Vec<&str> {
        self.affected.iter().map(|p| p.plan_name.as_str()).collect()
    }
}

/// Applies one chapter-read event to every active plan containing it.
pub struct CompletionFanout {
    store: Arc<dyn DocumentStore>,
    tracker: ProgressTracker,
}

impl CompletionFanout {
    pub fn new(store: Arc<dyn DocumentStore>, tracker: ProgressTracker) -> Self {
        Self { store, tracker }
    }

    /// Mark `(book, chapter)` complete in every active plan of `user`
    /// that schedules it.
    ///
    /// Enumeration failures abort; per-plan failures are isolated into
    /// the report and never block sibling plans.
    pub fn on_chapter_read(&self, user: &str, book: &str, chapter: u32) -> Result<FanoutReport> {
        let active = self.tracker.active_plans(user)?;
        let mut report = FanoutReport::default();
        for progress in active {
            match self.apply_to_plan(&progress, user, book, chapter) {
                Ok(Some(affected)) => report.affected.push(affected),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        plan_id = %progress.plan_id,
                        user,
                        error = %err,
                        "auto-completion failed for plan, continuing with the rest"
                    );
                    report.failures.push(PlanFailure {
                        plan_id: progress.plan_id,
                        message: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    fn apply_to_plan(
        &self,
        progress: &UserPlanProgress,
        user: &str,
        book: &str,
        chapter: u32,
    ) -> Result<Option<AffectedPlan>> {
        let doc = self
            .store
            .get(&keys::plan(progress.plan_id))?
            .ok_or_else(|| PlanError::NoSuchPlan(progress.plan_id.to_string()))?;
        let plan: ReadingPlan = doc.decode()?;

        if !plan.contains(book, chapter) {
            return Ok(None);
        }
        // Already marked according to the tracker's own state.
        if progress
            .completed_chapters
            .contains(&chapter_key(book, chapter))
        {
            return Ok(None);
        }

        match self.tracker.mark_complete(user, &plan, book, chapter)? {
            Completion::AlreadyRecorded => Ok(None),
            Completion::Recorded { plan_completed } => Ok(Some(AffectedPlan {
                plan_id: plan.id,
                plan_name: plan.name,
                plan_completed,
                badge_id: if plan_completed { plan.badge_id } else { None },
            })),
        }
    }
}
