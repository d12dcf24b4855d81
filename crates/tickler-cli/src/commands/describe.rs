use tickler_core::{describe, normalize};

use super::ScheduleArgs;

pub fn run(schedule: ScheduleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rule = normalize(&schedule.draft().recurrence);
    println!("{}", describe(rule.as_ref()));
    Ok(())
}
