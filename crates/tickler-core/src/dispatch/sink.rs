//! Collaborator seams for the dispatch scheduler.
//!
//! The platform notification primitive, the permission capability, and wall
//! time are all external to this subsystem; each gets a small seam so the
//! scheduler can be unit-tested in isolation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Platform notification capability state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    /// The platform has no notification primitive at all.
    Unsupported,
    /// Available, but the user has not been prompted yet.
    NotAsked,
    Denied,
    Granted,
}

impl Permission {
    pub fn is_granted(self) -> bool {
        self == Permission::Granted
    }
}

/// One platform alert, ready for emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
    /// Dedupe tag: the signature of the occurrence this alert is for.
    pub tag: String,
}

/// Emission seam for platform alerts. May fail; the scheduler catches and
/// logs failures per task.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError>;
}

/// Wall-time seam. Production code uses [`SystemClock`]; tests substitute a
/// manual clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
