//! Normalization of raw form cadence input into a [`RecurrenceRule`].

use super::{Frequency, RecurrenceInput, RecurrenceRule};

/// Normalize raw form input into a cadence rule.
///
/// - `frequency = once` yields `None` (a one-time reminder has no rule).
/// - The interval is floored to an integer with a minimum of 1; NaN,
///   infinities, and absent values default to 1.
/// - Weekly weekday sets are deduplicated and sorted ascending; values
///   outside 0..=6 are dropped. An empty set is accepted structurally and
///   simply yields zero occurrences downstream -- rejecting it with a
///   message is the calling form's responsibility.
/// - Monthly monthday sets are clamped to 1..=31, deduplicated, sorted.
///
/// The output owns its data: mutating the caller's input afterwards cannot
/// affect a previously normalized rule.
pub fn normalize(input: &RecurrenceInput) -> Option<RecurrenceRule> {
    let interval = normalize_interval(input.interval);
    match input.frequency {
        Frequency::Once => None,
        Frequency::Daily => Some(RecurrenceRule::Daily { interval }),
        Frequency::Weekly => {
            let mut weekdays: Vec<u8> = input
                .weekdays
                .iter()
                .filter(|d| (0..=6).contains(*d))
                .map(|d| *d as u8)
                .collect();
            weekdays.sort_unstable();
            weekdays.dedup();
            Some(RecurrenceRule::Weekly { interval, weekdays })
        }
        Frequency::Monthly => {
            let mut monthdays: Vec<u32> = input
                .monthdays
                .iter()
                .map(|d| (*d).clamp(1, 31) as u32)
                .collect();
            monthdays.sort_unstable();
            monthdays.dedup();
            Some(RecurrenceRule::Monthly {
                interval,
                monthdays,
            })
        }
    }
}

fn normalize_interval(raw: Option<f64>) -> u32 {
    match raw {
        Some(v) if v.is_finite() && v >= 1.0 => v.floor().min(u32::MAX as f64) as u32,
        _ => 1,
    }
}
