//! Recurrence rules: the normalized cadence value type and its form input.
//!
//! A cadence is a tagged variant so that illegal combinations (a weekly rule
//! carrying monthdays) are unrepresentable. `frequency = once` has no rule at
//! all -- a one-time reminder is a single instant derived from due time and
//! lead time, so it is modeled as `Option::<RecurrenceRule>::None`.

use serde::{Deserialize, Serialize};

mod normalize;

pub mod calculator;
pub mod describe;

pub use normalize::normalize;

/// Frequency selector as it arrives from the reminder form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
}

/// Raw cadence values from the reminder form, before normalization.
///
/// Intentionally loose: the interval may be fractional or garbage, day sets
/// may contain duplicates or out-of-range values. [`normalize`] turns this
/// into a well-formed [`RecurrenceRule`] (or `None` for one-time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecurrenceInput {
    pub frequency: Frequency,
    /// Repeat every N cycles; floored, minimum 1, invalid defaults to 1.
    pub interval: Option<f64>,
    /// Weekday multi-select, 0=Sunday ... 6=Saturday.
    #[serde(default)]
    pub weekdays: Vec<i64>,
    /// Day-of-month list, 1-31.
    #[serde(default)]
    pub monthdays: Vec<i64>,
}

/// Normalized cadence. Immutable value type with structural equality.
///
/// The anchor instant (first occurrence, due minus lead) is *not* part of the
/// rule: it is derived from the owning [`crate::ReminderSchedule`], which
/// makes due-date rebasing structural rather than a bookkeeping step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frequency", rename_all = "lowercase")]
pub enum RecurrenceRule {
    Daily {
        #[serde(default = "default_interval")]
        interval: u32,
    },
    Weekly {
        #[serde(default = "default_interval")]
        interval: u32,
        /// Sorted ascending, deduplicated, each in 0..=6 (0=Sunday).
        weekdays: Vec<u8>,
    },
    Monthly {
        #[serde(default = "default_interval")]
        interval: u32,
        /// Sorted ascending, deduplicated, each in 1..=31.
        monthdays: Vec<u32>,
    },
}

fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    pub fn interval(&self) -> u32 {
        match self {
            RecurrenceRule::Daily { interval }
            | RecurrenceRule::Weekly { interval, .. }
            | RecurrenceRule::Monthly { interval, .. } => *interval,
        }
    }

    /// Re-express the rule as form input. `normalize(rule.as_input())`
    /// round-trips exactly, which is what makes normalization idempotent.
    pub fn as_input(&self) -> RecurrenceInput {
        match self {
            RecurrenceRule::Daily { interval } => RecurrenceInput {
                frequency: Frequency::Daily,
                interval: Some(*interval as f64),
                ..Default::default()
            },
            RecurrenceRule::Weekly { interval, weekdays } => RecurrenceInput {
                frequency: Frequency::Weekly,
                interval: Some(*interval as f64),
                weekdays: weekdays.iter().map(|d| *d as i64).collect(),
                ..Default::default()
            },
            RecurrenceRule::Monthly {
                interval,
                monthdays,
            } => RecurrenceInput {
                frequency: Frequency::Monthly,
                interval: Some(*interval as f64),
                monthdays: monthdays.iter().map(|d| *d as i64).collect(),
                ..Default::default()
            },
        }
    }
}
