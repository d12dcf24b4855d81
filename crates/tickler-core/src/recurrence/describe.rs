//! Human-readable rendering of cadence rules and occurrence instants.

use chrono::{DateTime, Utc};

use crate::recurrence::RecurrenceRule;
use crate::zone::resolve_zone;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Describe a cadence rule, e.g. "Every 2 weeks on Mon, Wed" or
/// "Monthly on the 1st, 15th". `None` is a one-time reminder.
pub fn describe(rule: Option<&RecurrenceRule>) -> String {
    let Some(rule) = rule else {
        return "One-time reminder".to_string();
    };
    match rule {
        RecurrenceRule::Daily { interval } => match interval {
            0 | 1 => "Daily".to_string(),
            n => format!("Every {n} days"),
        },
        RecurrenceRule::Weekly { interval, weekdays } => {
            let base = match interval {
                0 | 1 => "Weekly".to_string(),
                n => format!("Every {n} weeks"),
            };
            if weekdays.is_empty() {
                base
            } else {
                format!("{base} on {}", weekday_list(weekdays))
            }
        }
        RecurrenceRule::Monthly {
            interval,
            monthdays,
        } => {
            let base = match interval {
                0 | 1 => "Monthly".to_string(),
                n => format!("Every {n} months"),
            };
            if monthdays.is_empty() {
                base
            } else {
                format!("{base} on the {}", ordinal_list(monthdays))
            }
        }
    }
}

/// Render an instant in the given zone, e.g. "Mon, Mar 30 2026, 9:15 AM PDT".
/// An absent or unresolvable zone falls back to the viewer's local zone.
pub fn format_instant(instant: DateTime<Utc>, timezone: Option<&str>) -> String {
    let tz = resolve_zone(timezone);
    instant
        .with_timezone(&tz)
        .format("%a, %b %-d %Y, %-I:%M %p %Z")
        .to_string()
}

fn weekday_list(weekdays: &[u8]) -> String {
    weekdays
        .iter()
        .map(|d| WEEKDAY_NAMES[(*d as usize).min(6)])
        .collect::<Vec<_>>()
        .join(", ")
}

fn ordinal_list(monthdays: &[u32]) -> String {
    monthdays
        .iter()
        .map(|d| ordinal(*d))
        .collect::<Vec<_>>()
        .join(", ")
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn one_time_rule() {
        assert_eq!(describe(None), "One-time reminder");
    }

    #[test]
    fn daily_rules() {
        assert_eq!(describe(Some(&RecurrenceRule::Daily { interval: 1 })), "Daily");
        assert_eq!(
            describe(Some(&RecurrenceRule::Daily { interval: 4 })),
            "Every 4 days"
        );
    }

    #[test]
    fn weekly_rules() {
        assert_eq!(
            describe(Some(&RecurrenceRule::Weekly {
                interval: 2,
                weekdays: vec![1, 3],
            })),
            "Every 2 weeks on Mon, Wed"
        );
        assert_eq!(
            describe(Some(&RecurrenceRule::Weekly {
                interval: 1,
                weekdays: vec![0, 6],
            })),
            "Weekly on Sun, Sat"
        );
        assert_eq!(
            describe(Some(&RecurrenceRule::Weekly {
                interval: 1,
                weekdays: vec![],
            })),
            "Weekly"
        );
    }

    #[test]
    fn monthly_rules() {
        assert_eq!(
            describe(Some(&RecurrenceRule::Monthly {
                interval: 1,
                monthdays: vec![1, 15],
            })),
            "Monthly on the 1st, 15th"
        );
        assert_eq!(
            describe(Some(&RecurrenceRule::Monthly {
                interval: 3,
                monthdays: vec![2, 11, 22, 23, 31],
            })),
            "Every 3 months on the 2nd, 11th, 22nd, 23rd, 31st"
        );
    }

    #[test]
    fn instant_rendering_uses_zone() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 30, 16, 15, 0).unwrap();
        assert_eq!(
            format_instant(instant, Some("America/Los_Angeles")),
            "Mon, Mar 30 2026, 9:15 AM PDT"
        );
        assert_eq!(
            format_instant(instant, Some("UTC")),
            "Mon, Mar 30 2026, 4:15 PM UTC"
        );
    }
}
