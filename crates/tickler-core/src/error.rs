//! Core error types for tickler-core.
//!
//! The occurrence calculator itself never errors: malformed cadence input
//! yields empty results and unresolvable timezones fall back to the viewer's
//! local zone. Errors here cover the seams around it -- form input parsing
//! and alert emission.

use thiserror::Error;

/// Core error type for tickler-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reminder form input errors
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// Alert emission errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised while turning raw form values into a [`crate::ReminderSchedule`].
///
/// Rejecting these with a user-facing message is the calling form's job; the
/// engine downstream stays fail-soft.
#[derive(Error, Debug)]
pub enum FormError {
    /// Due date string did not parse
    #[error("Invalid due date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// Due time string did not parse
    #[error("Invalid due time '{0}' (expected HH:mm)")]
    InvalidTime(String),

    /// Snooze instant string did not parse
    #[error("Invalid snooze instant '{0}' (expected RFC 3339)")]
    InvalidSnooze(String),

    /// A due date was given without a time, or vice versa
    #[error("Due date and due time must be provided together")]
    IncompleteDueInstant,
}

/// Errors from a [`crate::NotificationSink`].
///
/// Caught and logged per task by the dispatch scheduler; never aborts
/// dispatch for other tasks.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The platform notification backend is not available
    #[error("Notification backend unavailable")]
    Unavailable,

    /// The platform rejected the alert
    #[error("Notification rejected: {0}")]
    Rejected(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
