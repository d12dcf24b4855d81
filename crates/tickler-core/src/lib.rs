//! # Tickler Core Library
//!
//! Core business logic for Tickler's recurring reminder subsystem. The
//! surrounding application (tasks, calendar, notes, sharing) is a thin UI
//! over a hosted backend; everything with real temporal-correctness
//! requirements lives here.
//!
//! ## Architecture
//!
//! - **Recurrence**: normalized cadence rules plus a pure occurrence
//!   calculator that walks the schedule's local calendar (DST-safe)
//! - **Schedule**: the per-task reminder schedule value type and its
//!   rebase/snooze operations
//! - **Dispatch**: a tick-driven scheduler that reconciles the live task
//!   collection into at-most-one platform alert per occurrence
//! - **Form**: the contract for the create/edit reminder form, including
//!   the live upcoming-occurrences preview
//!
//! ## Key Components
//!
//! - [`RecurrenceRule`]: tagged cadence value type
//! - [`next_occurrence`] / [`upcoming_occurrences`]: the calculator
//! - [`DispatchScheduler`]: timer bookkeeping and alert emission
//! - [`NotificationSink`] / [`Clock`]: collaborator seams

pub mod dispatch;
pub mod error;
pub mod form;
pub mod recurrence;
pub mod schedule;
pub mod zone;

pub use dispatch::{
    Alert, Clock, DispatchScheduler, DispatchState, NotificationSink, Permission, SystemClock,
};
pub use error::{CoreError, FormError, NotifyError};
pub use form::{ReminderDraft, LEAD_PRESETS};
pub use recurrence::calculator::{
    next_occurrence, upcoming_occurrences, OccurrenceQuery, UpcomingQuery,
};
pub use recurrence::describe::{describe, format_instant};
pub use recurrence::{normalize, Frequency, RecurrenceInput, RecurrenceRule};
pub use schedule::{ReminderSchedule, ReminderTask};
