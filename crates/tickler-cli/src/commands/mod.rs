use clap::{Args, ValueEnum};
use tickler_core::{Frequency, RecurrenceInput, ReminderDraft};

pub mod describe;
pub mod preview;
pub mod watch;

#[derive(ValueEnum, Clone, Copy)]
pub enum FrequencyArg {
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl From<FrequencyArg> for Frequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Once => Frequency::Once,
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Monthly => Frequency::Monthly,
        }
    }
}

/// Schedule flags shared by `preview` and `describe`.
#[derive(Args)]
pub struct ScheduleArgs {
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due_date: Option<String>,
    /// Due time (HH:mm)
    #[arg(long)]
    pub due_time: Option<String>,
    /// Lead time in minutes (presets: 5, 15, 30, 60, 120, 1440)
    #[arg(long, default_value = "15")]
    pub lead: u32,
    /// Cadence frequency
    #[arg(long, value_enum, default_value = "once")]
    pub frequency: FrequencyArg,
    /// Repeat every N cycles
    #[arg(long)]
    pub interval: Option<u32>,
    /// Weekdays for a weekly cadence (0=Sun ... 6=Sat), comma-separated
    #[arg(long)]
    pub weekdays: Option<String>,
    /// Days of the month for a monthly cadence, comma-separated
    #[arg(long)]
    pub monthdays: Option<String>,
    /// Snooze instant (RFC 3339)
    #[arg(long)]
    pub snooze: Option<String>,
    /// IANA timezone name (defaults to the local zone)
    #[arg(long)]
    pub timezone: Option<String>,
}

impl ScheduleArgs {
    pub fn draft(&self) -> ReminderDraft {
        ReminderDraft {
            due_date: self.due_date.clone(),
            due_time: self.due_time.clone(),
            lead_minutes: Some(self.lead),
            recurrence: RecurrenceInput {
                frequency: self.frequency.into(),
                interval: self.interval.map(|n| n as f64),
                weekdays: parse_day_list(self.weekdays.as_deref()),
                monthdays: parse_day_list(self.monthdays.as_deref()),
            },
            snoozed_until: self.snooze.clone(),
            timezone: self.timezone.clone(),
        }
    }
}

fn parse_day_list(raw: Option<&str>) -> Vec<i64> {
    raw.map(ReminderDraft::parse_monthdays).unwrap_or_default()
}
