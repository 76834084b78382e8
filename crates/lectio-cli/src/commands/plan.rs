use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;

use crate::common::{open_engine, user_or_default};

/// JSON view of one user's progress through a plan.
#[derive(Serialize)]
struct ProgressView {
    plan: String,
    percent: u32,
    current_day: u32,
    completed_chapters: usize,
    schedule_len: usize,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// List available plans
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show a plan's schedule summary
    Show {
        /// Plan slug (e.g. "evangelhos-30") or display name
        ident: String,
        #[arg(long)]
        json: bool,
    },
    /// Start a plan for a user
    Start {
        ident: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Show a user's progress through a plan
    Progress {
        ident: String,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List a user's plans still in progress
    Active {
        #[arg(long)]
        user: Option<String>,
    },
    /// List a user's finished plans
    Completed {
        #[arg(long)]
        user: Option<String>,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = open_engine()?;
    match action {
        PlanAction::List { json } => {
            let plans = engine.plans()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                for plan in plans {
                    println!(
                        "{}  ({} days, {} chapters)",
                        plan.name,
                        plan.duration_days,
                        plan.schedule_len()
                    );
                    println!("    {}", plan.description);
                }
            }
        }
        PlanAction::Show { ident, json } => {
            let plan = engine.find_plan(&ident)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!("{} -- {}", plan.name, plan.description);
                println!(
                    "{} chapters over {} days",
                    plan.schedule_len(),
                    plan.duration_days
                );
                for day in 1..=plan.duration_days.min(7) {
                    let readings: Vec<String> = plan
                        .assignments_for_day(day)
                        .iter()
                        .map(|a| format!("{} {}", a.book, a.chapter))
                        .collect();
                    println!("  day {:>3}: {}", day, readings.join(", "));
                }
                if plan.duration_days > 7 {
                    println!("  ...");
                }
            }
        }
        PlanAction::Start { ident, user } => {
            let user = user_or_default(user, &config);
            let progress = engine.start_plan(&user, &ident)?;
            let plan = engine.find_plan(&ident)?;
            println!(
                "Started '{}' for {} (day {} of {})",
                plan.name, user, progress.current_day, plan.duration_days
            );
        }
        PlanAction::Progress { ident, user, json } => {
            let user = user_or_default(user, &config);
            let plan = engine.find_plan(&ident)?;
            match engine.progress(&user, plan.id)? {
                Some(progress) => {
                    let percent = progress.percent_complete(plan.schedule_len());
                    if json {
                        let view = ProgressView {
                            plan: plan.name.clone(),
                            percent,
                            current_day: progress.current_day,
                            completed_chapters: progress.completed_chapters.len(),
                            schedule_len: plan.schedule_len(),
                            completed_at: progress.completed_at,
                        };
                        println!("{}", serde_json::to_string_pretty(&view)?);
                    } else {
                        println!(
                            "{}: {}% ({}/{} chapters, day {})",
                            plan.name,
                            percent,
                            progress.completed_chapters.len(),
                            plan.schedule_len(),
                            progress.current_day
                        );
                        if let Some(at) = progress.completed_at {
                            println!("Completed at {}", at.to_rfc3339());
                        }
                    }
                }
                None => println!("{} has not started '{}'", user, plan.name),
            }
        }
        PlanAction::Active { user } => {
            let user = user_or_default(user, &config);
            for progress in engine.active_plans(&user)? {
                if let Some(plan) = engine.plan(progress.plan_id)? {
                    println!(
                        "{} ({}%)",
                        plan.name,
                        progress.percent_complete(plan.schedule_len())
                    );
                }
            }
        }
        PlanAction::Completed { user } => {
            let user = user_or_default(user, &config);
            for progress in engine.completed_plans(&user)? {
                if let Some(plan) = engine.plan(progress.plan_id)? {
                    let badge = plan.badge_id.as_deref().unwrap_or("-");
                    println!("{} (badge: {})", plan.name, badge);
                }
            }
        }
    }
    Ok(())
}
