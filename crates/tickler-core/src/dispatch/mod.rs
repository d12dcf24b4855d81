//! Dispatch scheduler: turns computed occurrences into exactly-once alerts.
//!
//! The scheduler owns all timer bookkeeping as explicit state -- no process
//! globals -- and works in two phases driven by the caller:
//!
//! - [`DispatchScheduler::reconcile`] replaces every armed deadline from the
//!   latest task snapshot. Cancellation is total: a deadline armed against
//!   stale data can never fire.
//! - [`DispatchScheduler::tick`] fires deadlines that have come due, one
//!   alert per occurrence, deduplicated through the per-task firing record.
//!
//! ## State transitions (per task)
//!
//! ```text
//! Idle -> Armed -> Fired -> (Armed on recomputation | Idle when cleared)
//! ```
//!
//! Everything runs on one logical thread; the firing record is checked and
//! updated within the same synchronous pass, so no locking primitive is
//! needed inside the scheduler itself. [`run`] drives `tick` from a tokio
//! interval for live use.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::recurrence::calculator::{next_occurrence, OccurrenceQuery};
use crate::recurrence::describe::format_instant;
use crate::schedule::ReminderTask;

mod sink;

pub use sink::{Alert, Clock, NotificationSink, Permission, SystemClock};

/// Per-task dispatch state, derived from the scheduler's tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Armed,
    Fired,
}

/// An armed one-shot deadline.
#[derive(Debug, Clone)]
struct ArmedReminder {
    fire_at: DateTime<Utc>,
    alert: Alert,
}

/// Scheduler for reminder alerts.
pub struct DispatchScheduler {
    /// Outstanding deadlines, keyed by task id. At most one per task.
    armed: HashMap<String, ArmedReminder>,
    /// Firing record: task id -> signature of the most recently dispatched
    /// occurrence. Ephemeral, never persisted; entries are dropped when the
    /// task leaves the live collection.
    fired: HashMap<String, String>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl DispatchScheduler {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_clock(sink, Arc::new(SystemClock))
    }

    pub fn with_clock(sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            armed: HashMap::new(),
            fired: HashMap::new(),
            sink,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self, task_id: &str) -> DispatchState {
        if self.armed.contains_key(task_id) {
            DispatchState::Armed
        } else if self.fired.contains_key(task_id) {
            DispatchState::Fired
        } else {
            DispatchState::Idle
        }
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Reconcile against the latest task snapshot and permission state.
    ///
    /// Called on every change to the live collection or the permission
    /// signal. All outstanding deadlines are dropped unconditionally before
    /// re-arming; tasks are treated independently.
    pub fn reconcile(&mut self, tasks: &[ReminderTask], permission: Permission) {
        self.armed.clear();
        self.fired
            .retain(|id, _| tasks.iter().any(|task| task.id == *id));

        if !permission.is_granted() {
            tracing::debug!(?permission, "notifications not granted, nothing armed");
            return;
        }

        let now = self.clock.now();
        for task in tasks {
            if task.completed || !task.schedule.is_active() {
                continue;
            }
            // Inclusive so a reminder coming due at the reconciliation
            // instant fires now instead of being skipped.
            let Some(occurrence) =
                next_occurrence(&task.schedule, &OccurrenceQuery::at_inclusive(now))
            else {
                continue;
            };
            let signature = signature(&task.id, occurrence);
            if self.fired.get(&task.id) == Some(&signature) {
                tracing::debug!(task = %task.id, %signature, "already dispatched, skipping");
                continue;
            }
            let fire_at = occurrence.max(now);
            tracing::debug!(task = %task.id, %fire_at, "reminder armed");
            self.armed.insert(
                task.id.clone(),
                ArmedReminder {
                    fire_at,
                    alert: alert_for(task, occurrence, signature),
                },
            );
        }
    }

    /// Fire every armed deadline that has come due, in due order. Returns
    /// the ids of tasks whose alert was dispatched this pass.
    ///
    /// A sink failure is logged for its task and never aborts dispatch for
    /// the others; the occurrence still counts as fired so it cannot
    /// double-dispatch on the next pass.
    pub fn tick(&mut self) -> Vec<String> {
        let now = self.clock.now();
        let mut due: Vec<(String, ArmedReminder)> = self
            .armed
            .iter()
            .filter(|(_, armed)| armed.fire_at <= now)
            .map(|(id, armed)| (id.clone(), armed.clone()))
            .collect();
        due.sort_by_key(|(_, armed)| armed.fire_at);

        let mut dispatched = Vec::new();
        for (task_id, armed) in due {
            self.armed.remove(&task_id);
            match self.sink.notify(&armed.alert) {
                Ok(()) => {
                    tracing::info!(task = %task_id, tag = %armed.alert.tag, "reminder dispatched");
                }
                Err(e) => {
                    tracing::warn!(task = %task_id, error = %e, "notification sink failed");
                }
            }
            self.fired.insert(task_id.clone(), armed.alert.tag);
            dispatched.push(task_id);
        }
        dispatched
    }

    /// Drop all state. No alert fires after teardown.
    pub fn teardown(&mut self) {
        tracing::debug!(armed = self.armed.len(), "dispatch scheduler torn down");
        self.armed.clear();
        self.fired.clear();
    }
}

/// Drive a scheduler's `tick` from a tokio interval until the task is
/// dropped. Reconciliation stays with the caller, which re-runs it whenever
/// the task collection or permission state changes.
pub async fn run(
    scheduler: Arc<tokio::sync::Mutex<DispatchScheduler>>,
    tick_interval: std::time::Duration,
) {
    let mut interval = tokio::time::interval(tick_interval);
    loop {
        interval.tick().await;
        scheduler.lock().await.tick();
    }
}

fn signature(task_id: &str, occurrence: DateTime<Utc>) -> String {
    format!("{task_id}:{}", occurrence.timestamp_millis())
}

fn alert_for(task: &ReminderTask, occurrence: DateTime<Utc>, signature: String) -> Alert {
    let lead = task.schedule.lead_minutes.unwrap_or(0);
    let due = occurrence + Duration::minutes(lead as i64);
    Alert {
        title: task.title.clone(),
        body: format!(
            "Due {}",
            format_instant(due, task.schedule.timezone.as_deref())
        ),
        tag: signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::recurrence::RecurrenceRule;
    use crate::schedule::ReminderSchedule;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(now),
            })
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        alerts: Mutex<Vec<Alert>>,
        /// Titles for which `notify` reports failure.
        failing: Vec<String>,
    }

    impl RecordingSink {
        fn titles(&self) -> Vec<String> {
            self.alerts
                .lock()
                .unwrap()
                .iter()
                .map(|a| a.title.clone())
                .collect()
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
            if self.failing.contains(&alert.title) {
                return Err(NotifyError::Unavailable);
            }
            self.alerts.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 10, 12, 0, 0).unwrap()
    }

    fn one_time_task(id: &str, due: DateTime<Utc>) -> ReminderTask {
        ReminderTask {
            id: id.into(),
            title: format!("Task {id}"),
            completed: false,
            schedule: ReminderSchedule {
                due_at: Some(due),
                lead_minutes: Some(0),
                timezone: Some("UTC".into()),
                ..Default::default()
            },
        }
    }

    fn setup(sink: Arc<RecordingSink>) -> (DispatchScheduler, Arc<ManualClock>) {
        let clock = ManualClock::starting_at(t0());
        let scheduler = DispatchScheduler::with_clock(sink, clock.clone());
        (scheduler, clock)
    }

    #[test]
    fn fires_exactly_once_in_due_order() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, clock) = setup(sink.clone());
        let tasks = vec![
            one_time_task("b", t0() + Duration::seconds(2)),
            one_time_task("a", t0() + Duration::seconds(1)),
        ];

        scheduler.reconcile(&tasks, Permission::Granted);
        assert_eq!(scheduler.tick(), Vec::<String>::new());

        clock.advance(Duration::seconds(3));
        assert_eq!(scheduler.tick(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(sink.titles(), vec!["Task a", "Task b"]);
        assert_eq!(scheduler.state("a"), DispatchState::Fired);

        // A reconciliation with unchanged data fires neither again.
        scheduler.reconcile(&tasks, Permission::Granted);
        clock.advance(Duration::seconds(1));
        assert!(scheduler.tick().is_empty());
        assert_eq!(sink.titles().len(), 2);
    }

    #[test]
    fn reminder_due_at_reconciliation_fires_immediately() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, _clock) = setup(sink.clone());
        // Due exactly at the reconciliation instant: the inclusive query
        // keeps it from being skipped, and it fires on the same pass.
        let tasks = vec![one_time_task("x", t0())];

        scheduler.reconcile(&tasks, Permission::Granted);
        assert_eq!(scheduler.tick(), vec!["x".to_string()]);

        // The occurrence is still returned on the next reconciliation; only
        // the firing record prevents a duplicate.
        scheduler.reconcile(&tasks, Permission::Granted);
        assert_eq!(scheduler.state("x"), DispatchState::Fired);
        assert!(scheduler.tick().is_empty());
        assert_eq!(sink.titles().len(), 1);
    }

    #[test]
    fn one_time_reminder_expired_before_this_session_never_fires() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, clock) = setup(sink.clone());
        let tasks = vec![one_time_task("old", t0() - Duration::days(2))];

        scheduler.reconcile(&tasks, Permission::Granted);
        assert_eq!(scheduler.state("old"), DispatchState::Idle);
        clock.advance(Duration::seconds(5));
        assert!(scheduler.tick().is_empty());
    }

    #[test]
    fn nothing_armed_without_permission() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, clock) = setup(sink.clone());
        let tasks = vec![one_time_task("a", t0() + Duration::seconds(1))];

        for permission in [Permission::Unsupported, Permission::NotAsked, Permission::Denied] {
            scheduler.reconcile(&tasks, permission);
            assert_eq!(scheduler.armed_count(), 0, "{permission:?}");
        }
        clock.advance(Duration::seconds(5));
        assert!(scheduler.tick().is_empty());
    }

    #[test]
    fn completed_task_is_cancelled_before_expiry() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, clock) = setup(sink.clone());
        let mut tasks = vec![one_time_task("a", t0() + Duration::seconds(5))];

        scheduler.reconcile(&tasks, Permission::Granted);
        assert_eq!(scheduler.state("a"), DispatchState::Armed);

        tasks[0].completed = true;
        scheduler.reconcile(&tasks, Permission::Granted);
        clock.advance(Duration::seconds(10));
        assert!(scheduler.tick().is_empty());
        assert!(sink.titles().is_empty());
    }

    #[test]
    fn firing_record_is_garbage_collected() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, _clock) = setup(sink.clone());
        let tasks = vec![one_time_task("a", t0() - Duration::seconds(1))];

        scheduler.reconcile(&tasks, Permission::Granted);
        scheduler.tick();
        assert_eq!(scheduler.state("a"), DispatchState::Fired);

        scheduler.reconcile(&[], Permission::Granted);
        assert_eq!(scheduler.state("a"), DispatchState::Idle);
    }

    #[test]
    fn recurring_task_rearms_for_the_next_occurrence() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, clock) = setup(sink.clone());
        let mut task = one_time_task("r", t0() + Duration::seconds(1));
        task.schedule.recurrence = Some(RecurrenceRule::Daily { interval: 1 });
        let tasks = vec![task];

        scheduler.reconcile(&tasks, Permission::Granted);
        clock.advance(Duration::seconds(2));
        assert_eq!(scheduler.tick().len(), 1);

        // Recomputation arms the next day's occurrence under a new signature.
        scheduler.reconcile(&tasks, Permission::Granted);
        assert_eq!(scheduler.state("r"), DispatchState::Armed);
        clock.advance(Duration::days(1));
        assert_eq!(scheduler.tick().len(), 1);
        assert_eq!(sink.titles().len(), 2);
    }

    #[test]
    fn sink_failure_is_isolated_per_task() {
        let sink = Arc::new(RecordingSink {
            failing: vec!["Task bad".into()],
            ..Default::default()
        });
        let (mut scheduler, clock) = setup(sink.clone());
        let tasks = vec![
            one_time_task("bad", t0() + Duration::seconds(1)),
            one_time_task("good", t0() + Duration::seconds(1)),
        ];

        scheduler.reconcile(&tasks, Permission::Granted);
        clock.advance(Duration::seconds(2));
        let dispatched = scheduler.tick();
        assert_eq!(dispatched.len(), 2);
        assert_eq!(sink.titles(), vec!["Task good"]);

        // The failed occurrence is still recorded; no retry storm.
        scheduler.reconcile(&tasks, Permission::Granted);
        assert!(scheduler.tick().is_empty());
    }

    #[test]
    fn teardown_cancels_everything() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, clock) = setup(sink.clone());
        let tasks = vec![one_time_task("a", t0() + Duration::seconds(1))];

        scheduler.reconcile(&tasks, Permission::Granted);
        scheduler.teardown();
        clock.advance(Duration::seconds(5));
        assert!(scheduler.tick().is_empty());
        assert!(sink.titles().is_empty());
        assert_eq!(scheduler.state("a"), DispatchState::Idle);
    }

    #[test]
    fn snoozed_reminder_fires_at_the_snoozed_instant() {
        let sink = Arc::new(RecordingSink::default());
        let (mut scheduler, clock) = setup(sink.clone());
        let mut task = one_time_task("s", t0() + Duration::seconds(1));
        task.schedule.snooze_until(t0() + Duration::minutes(10));
        let tasks = vec![task];

        scheduler.reconcile(&tasks, Permission::Granted);
        clock.advance(Duration::seconds(5));
        assert!(scheduler.tick().is_empty(), "must wait for the snoozed instant");
        clock.advance(Duration::minutes(10));
        assert_eq!(scheduler.tick(), vec!["s".to_string()]);
    }
}
