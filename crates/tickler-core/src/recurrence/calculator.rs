//! Occurrence calculator.
//!
//! Pure and stateless: safe to call re-entrantly from a live form preview
//! while the dispatch scheduler is reconciling. Candidate generation walks
//! the schedule's **local calendar** (dates plus anchor time-of-day) rather
//! than stepping fixed millisecond intervals, so the wall-clock hour:minute
//! is preserved across DST transitions and variable month lengths.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::recurrence::RecurrenceRule;
use crate::schedule::ReminderSchedule;
use crate::zone::{local_instant, resolve_zone};

/// Hard cap on cadence cycles walked per query. Pathological configurations
/// (a monthly rule whose monthdays almost never exist) terminate with `None`
/// instead of looping.
const MAX_CYCLES: i64 = 480;

/// Query parameters for [`next_occurrence`].
#[derive(Debug, Clone, Copy)]
pub struct OccurrenceQuery {
    pub as_of: DateTime<Utc>,
    /// When set, an occurrence exactly at `as_of` counts as upcoming. The
    /// dispatch scheduler uses this so already-due reminders fire immediately
    /// instead of being skipped.
    pub include_as_of: bool,
}

impl OccurrenceQuery {
    /// Strictly-after query at the given instant.
    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            include_as_of: false,
        }
    }

    /// At-or-after query at the given instant.
    pub fn at_inclusive(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            include_as_of: true,
        }
    }
}

/// Query parameters for [`upcoming_occurrences`].
#[derive(Debug, Clone, Copy)]
pub struct UpcomingQuery {
    pub as_of: DateTime<Utc>,
    pub limit: usize,
}

impl UpcomingQuery {
    pub fn at(as_of: DateTime<Utc>) -> Self {
        Self { as_of, limit: 3 }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Compute the next occurrence of a reminder schedule, or `None` when the
/// schedule produces nothing after `as_of`.
///
/// A one-time reminder whose anchor has passed never recurs. With a cadence,
/// candidates are enumerated chronologically in the schedule's local calendar.
/// A set `snoozed_until` later than the natural candidate replaces it -- for
/// this single occurrence only.
pub fn next_occurrence(
    schedule: &ReminderSchedule,
    query: &OccurrenceQuery,
) -> Option<DateTime<Utc>> {
    let anchor = schedule.anchor()?;
    let natural = match &schedule.recurrence {
        None => Some(anchor).filter(|c| upcoming(*c, query)),
        Some(rule) => {
            let tz = resolve_zone(schedule.timezone.as_deref());
            natural_next(rule, anchor, tz, query)
        }
    };
    match (natural, schedule.snoozed_until) {
        (Some(candidate), Some(snoozed)) if snoozed > candidate => Some(snoozed),
        (None, Some(snoozed)) if upcoming(snoozed, query) => Some(snoozed),
        (natural, _) => natural,
    }
}

/// Compute a bounded, strictly increasing sequence of future occurrences.
///
/// Restartable and pure: repeatedly takes the next occurrence, advancing the
/// cursor just past each result. The snooze override applies only to the
/// first element; afterwards the natural cadence resumes unshifted.
pub fn upcoming_occurrences(
    schedule: &ReminderSchedule,
    query: &UpcomingQuery,
) -> Vec<DateTime<Utc>> {
    let mut out = Vec::new();
    let mut current = schedule.clone();
    let mut cursor = OccurrenceQuery::at(query.as_of);
    while out.len() < query.limit {
        let Some(next) = next_occurrence(&current, &cursor) else {
            break;
        };
        out.push(next);
        cursor.as_of = next;
        current.snoozed_until = None;
    }
    out
}

fn upcoming(candidate: DateTime<Utc>, query: &OccurrenceQuery) -> bool {
    if query.include_as_of {
        candidate >= query.as_of
    } else {
        candidate > query.as_of
    }
}

/// First cadence candidate at or after the anchor that satisfies the query.
///
/// Enumeration fast-forwards to the cycle just before `as_of` (an anchor
/// years in the past must not exhaust the cap on its way to the present)
/// and then walks at most `MAX_CYCLES` cycles.
fn natural_next(
    rule: &RecurrenceRule,
    anchor: DateTime<Utc>,
    tz: Tz,
    query: &OccurrenceQuery,
) -> Option<DateTime<Utc>> {
    let anchor_local = anchor.with_timezone(&tz);
    let anchor_date = anchor_local.date_naive();
    let time_of_day = anchor_local.time();
    let as_of_date = query.as_of.with_timezone(&tz).date_naive();

    match rule {
        RecurrenceRule::Daily { interval } => {
            let interval = (*interval).max(1) as i64;
            let elapsed = (as_of_date - anchor_date).num_days();
            let start = (elapsed / interval - 1).max(0);
            for cycle in start..start + MAX_CYCLES {
                let date = anchor_date + Duration::days(cycle * interval);
                if let Some(hit) = candidate(tz, date, time_of_day, anchor, query) {
                    return Some(hit);
                }
            }
            None
        }
        RecurrenceRule::Weekly { interval, weekdays } => {
            if weekdays.is_empty() {
                return None;
            }
            let interval = (*interval).max(1) as i64;
            // Weeks start on Sunday, matching weekday numbering 0=Sunday.
            let week_start = anchor_date
                - Duration::days(anchor_date.weekday().num_days_from_sunday() as i64);
            let elapsed = (as_of_date - week_start).num_days() / 7;
            let start = (elapsed / interval - 1).max(0);
            for cycle in start..start + MAX_CYCLES {
                let base = week_start + Duration::weeks(cycle * interval);
                for &weekday in weekdays {
                    let date = base + Duration::days(weekday as i64);
                    if let Some(hit) = candidate(tz, date, time_of_day, anchor, query) {
                        return Some(hit);
                    }
                }
            }
            None
        }
        RecurrenceRule::Monthly {
            interval,
            monthdays,
        } => {
            if monthdays.is_empty() {
                return None;
            }
            let interval = (*interval).max(1) as i64;
            let elapsed = (as_of_date.year() - anchor_date.year()) as i64 * 12
                + as_of_date.month0() as i64
                - anchor_date.month0() as i64;
            let start = (elapsed / interval - 1).max(0);
            for cycle in start..start + MAX_CYCLES {
                let months = anchor_date.month0() as i64 + cycle * interval;
                let year = anchor_date.year() + months.div_euclid(12) as i32;
                let month = months.rem_euclid(12) as u32 + 1;
                for &monthday in monthdays {
                    // A month lacking this day contributes nothing -- skip,
                    // never clamp or carry over.
                    let Some(date) = NaiveDate::from_ymd_opt(year, month, monthday) else {
                        continue;
                    };
                    if let Some(hit) = candidate(tz, date, time_of_day, anchor, query) {
                        return Some(hit);
                    }
                }
            }
            None
        }
    }
}

/// Map a local calendar candidate to an instant and test it against the
/// anchor and query bounds. Candidates before the anchor (e.g. a weekday
/// earlier in the anchor's own week) are not part of the sequence.
fn candidate(
    tz: Tz,
    date: NaiveDate,
    time_of_day: NaiveTime,
    anchor: DateTime<Utc>,
    query: &OccurrenceQuery,
) -> Option<DateTime<Utc>> {
    let instant = local_instant(tz, date.and_time(time_of_day))?;
    if instant < anchor || !upcoming(instant, query) {
        return None;
    }
    Some(instant)
}
