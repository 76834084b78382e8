//! Per-user, per-plan reading progress.
//!
//! The tracker owns `UserPlanProgress` documents. Every mutation is a
//! compare-and-swap loop over the stored document: read, apply the
//! pure transition, conditionally write, re-read on conflict. Two
//! near-simultaneous completions for the same user therefore both
//! land, and marking the same chapter twice is a no-op.

pub mod fanout;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{ProgressError, Result};
use crate::plan::{chapter_key, ReadingPlan};
use crate::store::{keys, DocumentStore};

pub use fanout::{AffectedPlan, CompletionFanout, FanoutReport, PlanFailure};

/// One user's progress through one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPlanProgress {
    pub plan_id: Uuid,
    pub user_id: String,
    /// Day of the most recently completed assignment; never decreases.
    pub current_day: u32,
    /// `"book-chapter"` keys of completed assignments.
    pub completed_chapters: BTreeSet<String>,
    pub started_at: DateTime<Utc>,
    /// Set exactly once, when the completed set first covers the
    /// schedule.
    pub completed_at: Option<DateTime<Utc>>,
}

impl UserPlanProgress {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Percent complete, rounded. Zero-length schedules report 0%.
    pub fn percent_complete(&self, schedule_len: usize) -> u32 {
        if schedule_len == 0 {
            return 0;
        }
        let ratio = self.completed_chapters.len() as f64 / schedule_len as f64;
        (ratio * 100.0).round() as u32
    }
}

/// Outcome of a `mark_complete` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The chapter was already in the completed set.
    AlreadyRecorded,
    /// The chapter was appended. `plan_completed` is true only on the
    /// call that finished the plan.
    Recorded { plan_completed: bool },
}

/// Owner of all `UserPlanProgress` state.
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Create the progress record for (user, plan) if absent.
    ///
    /// Idempotent: a repeat call returns the existing record untouched.
    pub fn start(&self, user: &str, plan: &ReadingPlan) -> Result<UserPlanProgress> {
        let key = keys::progress(user, plan.id);
        let fresh = UserPlanProgress {
            plan_id: plan.id,
            user_id: user.to_string(),
            current_day: 1,
            completed_chapters: BTreeSet::new(),
            started_at: self.clock.now(),
            completed_at: None,
        };
        loop {
            if self.store.insert(&key, serde_json::to_value(&fresh)?)? {
                return Ok(fresh);
            }
            // Already started (possibly by a concurrent call); return
            // the existing record untouched.
            if let Some(doc) = self.store.get(&key)? {
                return Ok(doc.decode()?);
            }
        }
    }

    /// Record a completed chapter.
    ///
    /// # Errors
    /// [`ProgressError::PlanNotStarted`] if there is no progress record
    /// for the pair, [`ProgressError::ChapterNotInPlan`] if the plan's
    /// schedule has no matching assignment.
    pub fn mark_complete(
        &self,
        user: &str,
        plan: &ReadingPlan,
        book: &str,
        chapter: u32,
    ) -> Result<Completion> {
        let ck = chapter_key(book, chapter);
        let day = *plan.day_index().get(&ck).ok_or_else(|| {
            ProgressError::ChapterNotInPlan {
                plan_id: plan.id,
                book: book.to_string(),
                chapter,
            }
        })?;

        let key = keys::progress(user, plan.id);
        loop {
            let doc = self
                .store
                .get(&key)?
                .ok_or_else(|| ProgressError::PlanNotStarted {
                    user: user.to_string(),
                    plan_id: plan.id,
                })?;
            let mut progress: UserPlanProgress = doc.decode()?;

            if progress.completed_chapters.contains(&ck) {
                return Ok(Completion::AlreadyRecorded);
            }
            progress.completed_chapters.insert(ck.clone());
            progress.current_day = progress.current_day.max(day);

            let mut plan_completed = false;
            if progress.completed_at.is_none()
                && progress.completed_chapters.len() >= plan.schedule_len()
            {
                progress.completed_at = Some(self.clock.now());
                plan_completed = true;
            }

            let body = serde_json::to_value(&progress)?;
            if self.store.compare_and_swap(&key, doc.version, body)? {
                return Ok(Completion::Recorded { plan_completed });
            }
            // A concurrent writer advanced the document; re-apply.
        }
    }

    /// Progress for one (user, plan) pair; `None` means not started,
    /// which is a valid state rather than an error.
    pub fn progress(&self, user: &str, plan_id: Uuid) -> Result<Option<UserPlanProgress>> {
        match self.store.get(&keys::progress(user, plan_id))? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Every plan the user has started and not finished.
    pub fn active_plans(&self, user: &str) -> Result<Vec<UserPlanProgress>> {
        Ok(self
            .all_progress(user)?
            .into_iter()
            .filter(|p| !p.is_completed())
            .collect())
    }

    /// Every plan the user has finished.
    pub fn completed_plans(&self, user: &str) -> Result<Vec<UserPlanProgress>> {
        Ok(self
            .all_progress(user)?
            .into_iter()
            .filter(|p| p.is_completed())
            .collect())
    }

    /// Every user's progress through one plan.
    pub fn all_for_plan(&self, plan_id: Uuid) -> Result<Vec<UserPlanProgress>> {
        let docs = self.store.list("progress/")?;
        let mut all = Vec::new();
        for doc in docs {
            let progress: UserPlanProgress = doc.decode()?;
            if progress.plan_id == plan_id {
                all.push(progress);
            }
        }
        Ok(all)
    }

    fn all_progress(&self, user: &str) -> Result<Vec<UserPlanProgress>> {
        let docs = self.store.list(&keys::progress_prefix(user))?;
        let mut all = Vec::with_capacity(docs.len());
        for doc in docs {
            all.push(doc.decode()?);
        }
        Ok(all)
    }
}
