use chrono::Utc;
use tickler_core::{describe, format_instant};

use super::ScheduleArgs;

pub fn run(schedule: ScheduleArgs, limit: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let draft = schedule.draft();
    let occurrences = draft.preview(limit, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
        return Ok(());
    }

    let built = draft.to_schedule()?;
    println!("{}", describe(built.recurrence.as_ref()));
    if occurrences.is_empty() {
        println!("no upcoming occurrences");
    }
    for occurrence in occurrences {
        println!("{}", format_instant(occurrence, draft.timezone.as_deref()));
    }
    Ok(())
}
