//! Reminder schedule types.
//!
//! A [`ReminderSchedule`] hangs off every task and is re-read by the dispatch
//! scheduler on each reconciliation; the scheduler never mutates or persists
//! it. Editing operations live here so their invariants hold in one place:
//! rebasing the due instant clears any snooze (the snooze targeted the old
//! instant), and clearing due or lead makes recurrence and snooze inert.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::recurrence::calculator::{next_occurrence, OccurrenceQuery};
use crate::recurrence::RecurrenceRule;

/// Per-task reminder schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSchedule {
    /// When the task is due. Absent means no reminder fires at all.
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// Minutes before the due instant that the reminder fires.
    #[serde(default)]
    pub lead_minutes: Option<u32>,
    /// Cadence; only meaningful when both `due_at` and `lead_minutes` are set.
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    /// One-time override delaying only the next occurrence.
    #[serde(default)]
    pub snoozed_until: Option<DateTime<Utc>>,
    /// IANA zone name; `None` means the viewer's local zone.
    #[serde(default)]
    pub timezone: Option<String>,
    /// Memo of the last computed next trigger, so recomputation stays
    /// idempotent when unrelated task fields change.
    #[serde(default)]
    pub last_computed_trigger: Option<DateTime<Utc>>,
}

impl ReminderSchedule {
    /// The first occurrence instant: due minus lead. `None` whenever either
    /// field is missing, which makes recurrence and snooze inert.
    pub fn anchor(&self) -> Option<DateTime<Utc>> {
        let due = self.due_at?;
        let lead = self.lead_minutes?;
        Some(due - Duration::minutes(lead as i64))
    }

    /// Whether the schedule can produce occurrences at all.
    pub fn is_active(&self) -> bool {
        self.due_at.is_some() && self.lead_minutes.is_some()
    }

    /// Move the due instant (e.g. a calendar drag-reschedule). The recurrence
    /// anchor rebases automatically because it is derived; the snooze is
    /// cleared because it targeted the old instant.
    pub fn reschedule(&mut self, new_due: DateTime<Utc>) {
        self.due_at = Some(new_due);
        self.snoozed_until = None;
    }

    /// Change the lead time. Clears the snooze for the same reason as
    /// [`ReminderSchedule::reschedule`].
    pub fn set_lead_minutes(&mut self, lead_minutes: u32) {
        self.lead_minutes = Some(lead_minutes);
        self.snoozed_until = None;
    }

    /// Clear the due instant; recurrence and snooze become inert.
    pub fn clear_due(&mut self) {
        self.due_at = None;
        self.snoozed_until = None;
    }

    /// Delay only the next occurrence. The underlying cadence is untouched.
    pub fn snooze_until(&mut self, until: DateTime<Utc>) {
        self.snoozed_until = Some(until);
    }

    /// Recompute and memoize the next trigger. Calling this again with the
    /// same inputs leaves the memo unchanged.
    pub fn recompute_trigger(&mut self, as_of: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.last_computed_trigger = next_occurrence(self, &OccurrenceQuery::at(as_of));
        self.last_computed_trigger
    }
}

/// Task-like record as handed over by the task store.
///
/// Read-only from this subsystem's perspective; persistence, permissions and
/// sharing belong to the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub schedule: ReminderSchedule,
}

impl ReminderTask {
    pub fn new(title: impl Into<String>, schedule: ReminderSchedule) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            schedule,
        }
    }
}
