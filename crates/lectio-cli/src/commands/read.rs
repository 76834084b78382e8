use crate::common::{open_engine, user_or_default};

pub fn run(
    book: &str,
    chapter: u32,
    user: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = open_engine()?;
    let user = user_or_default(user, &config);

    let outcome = engine.record_reading(&user, book, chapter)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("Read {book} {chapter}.");
    for affected in &outcome.fanout.affected {
        if affected.plan_completed {
            println!("  Plan completed: {}", affected.plan_name);
            if let Some(badge) = &affected.badge_id {
                println!("  Badge earned: {badge}");
            }
        } else {
            println!("  Progress recorded in '{}'", affected.plan_name);
        }
    }
    for failure in &outcome.fanout.failures {
        eprintln!("  Plan {} failed to update: {}", failure.plan_id, failure.message);
    }
    println!("Streak: {} day(s)", outcome.streak);
    Ok(())
}
