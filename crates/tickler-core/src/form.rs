//! Contract for the create/edit reminder form.
//!
//! The form collects raw strings and presets; this module turns them into a
//! [`ReminderSchedule`] and drives the live upcoming-occurrences preview.
//! Invalid input is rejected here with a [`FormError`] -- by the time values
//! reach the calculator they are fail-soft, never panicking or erroring.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::recurrence::calculator::{upcoming_occurrences, UpcomingQuery};
use crate::recurrence::{normalize, RecurrenceInput};
use crate::schedule::ReminderSchedule;
use crate::zone::{local_instant, resolve_zone};

/// Lead-time presets offered by the form, in minutes.
pub const LEAD_PRESETS: [u32; 6] = [5, 15, 30, 60, 120, 1440];

/// Raw values from the reminder form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDraft {
    /// `YYYY-MM-DD`, interpreted in the draft's zone.
    pub due_date: Option<String>,
    /// `HH:mm`, interpreted in the draft's zone.
    pub due_time: Option<String>,
    pub lead_minutes: Option<u32>,
    #[serde(default)]
    pub recurrence: RecurrenceInput,
    /// RFC 3339 snooze instant.
    pub snoozed_until: Option<String>,
    pub timezone: Option<String>,
}

impl ReminderDraft {
    /// Tolerant parse of a comma-separated day-of-month list ("1, 15,31").
    /// Unparseable entries are dropped; range handling happens in
    /// [`normalize`].
    pub fn parse_monthdays(raw: &str) -> Vec<i64> {
        raw.split(',')
            .filter_map(|part| part.trim().parse().ok())
            .collect()
    }

    /// Build the schedule this draft describes.
    pub fn to_schedule(&self) -> Result<ReminderSchedule, FormError> {
        Ok(ReminderSchedule {
            due_at: self.due_instant()?,
            lead_minutes: self.lead_minutes,
            recurrence: normalize(&self.recurrence),
            snoozed_until: self.snooze_instant()?,
            timezone: self.timezone.clone(),
            last_computed_trigger: None,
        })
    }

    /// Live preview of the next `limit` occurrences.
    pub fn preview(
        &self,
        limit: usize,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, FormError> {
        let schedule = self.to_schedule()?;
        Ok(upcoming_occurrences(
            &schedule,
            &UpcomingQuery::at(as_of).with_limit(limit),
        ))
    }

    fn due_instant(&self) -> Result<Option<DateTime<Utc>>, FormError> {
        let (date, time) = match (&self.due_date, &self.due_time) {
            (None, None) => return Ok(None),
            (Some(date), Some(time)) => (date, time),
            _ => return Err(FormError::IncompleteDueInstant),
        };
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(date.clone()))?;
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|_| FormError::InvalidTime(time.clone()))?;
        let tz = resolve_zone(self.timezone.as_deref());
        Ok(local_instant(tz, date.and_time(time)))
    }

    fn snooze_instant(&self) -> Result<Option<DateTime<Utc>>, FormError> {
        match &self.snoozed_until {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| FormError::InvalidSnooze(raw.clone())),
        }
    }
}
