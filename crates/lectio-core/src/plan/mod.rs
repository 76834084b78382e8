//! Reading plans: day-by-day chapter schedules.
//!
//! A plan is generated once from a named strategy and is immutable
//! afterwards. Progress through a plan lives in [`crate::progress`];
//! the plan itself is shared, read-only reference data.

pub mod generator;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::error::PlanError;
pub use generator::{PlanPreset, Strategy, PRESETS};

/// One (book, chapter, day) tuple within a plan's schedule.
///
/// `day` values are non-decreasing along the schedule; the maximum day
/// is the plan's duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterAssignment {
    pub book: String,
    pub chapter: u32,
    pub day: u32,
}

/// Storage key for a chapter inside a progress document's completed
/// set, shared by the tracker and the fan-out.
pub fn chapter_key(book: &str, chapter: u32) -> String {
    format!("{book}-{chapter}")
}

/// A named, pre-generated reading plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub strategy: Strategy,
    /// Derived from the schedule's maximum day.
    pub duration_days: u32,
    pub schedule: Vec<ChapterAssignment>,
    /// Badge awarded on completion, if any.
    #[serde(default)]
    pub badge_id: Option<String>,
}

impl ReadingPlan {
    /// Generate a plan from a preset against the given catalog.
    ///
    /// The caller (see [`crate::engine`]) is responsible for enforcing
    /// name uniqueness in the store; generation itself is pure.
    pub fn materialize(preset: &PlanPreset, catalog: &Catalog) -> Result<Self, PlanError> {
        let strategy = Strategy::from_name(preset.slug)?;
        let schedule = strategy.generate(catalog)?;
        let duration_days = schedule.iter().map(|a| a.day).max().unwrap_or(0);
        Ok(Self {
            id: Uuid::new_v4(),
            name: preset.name.to_string(),
            description: preset.description.to_string(),
            strategy,
            duration_days,
            schedule,
            badge_id: Some(preset.badge_id.to_string()),
        })
    }

    /// Number of chapter assignments in the schedule.
    pub fn schedule_len(&self) -> usize {
        self.schedule.len()
    }

    /// `"book-chapter"` -> day lookup map for O(1) completion checks.
    pub fn day_index(&self) -> HashMap<String, u32> {
        self.schedule
            .iter()
            .map(|a| (chapter_key(&a.book, a.chapter), a.day))
            .collect()
    }

    pub fn contains(&self, book: &str, chapter: u32) -> bool {
        self.schedule
            .iter()
            .any(|a| a.book == book && a.chapter == chapter)
    }

    /// Assignments for a single day of the plan.
    pub fn assignments_for_day(&self, day: u32) -> Vec<&ChapterAssignment> {
        self.schedule.iter().filter(|a| a.day == day).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapter_key_format() {
        assert_eq!(chapter_key("João", 3), "João-3");
    }

    #[test]
    fn materialized_plan_derives_duration_from_schedule() {
        let catalog = Catalog::canonical();
        let preset = generator::preset("novo-testamento-90").unwrap();
        let plan = ReadingPlan::materialize(preset, &catalog).unwrap();
        assert_eq!(
            plan.duration_days,
            plan.schedule.iter().map(|a| a.day).max().unwrap()
        );
        assert_eq!(plan.badge_id.as_deref(), Some("badge-novo-testamento"));
    }

    #[test]
    fn day_index_matches_schedule() {
        let catalog = Catalog::canonical();
        let preset = generator::preset("evangelhos-30").unwrap();
        let plan = ReadingPlan::materialize(preset, &catalog).unwrap();
        let index = plan.day_index();
        assert_eq!(index.len(), plan.schedule_len());
        for a in &plan.schedule {
            assert_eq!(index[&chapter_key(&a.book, a.chapter)], a.day);
        }
        assert!(plan.contains("João", 21));
        assert!(!plan.contains("Atos", 1));
    }
}
