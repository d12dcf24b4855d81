use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tickler_core::error::NotifyError;
use tickler_core::{
    dispatch, Alert, DispatchScheduler, NotificationSink, Permission, ReminderTask,
};
use tracing_subscriber::EnvFilter;

/// Sink that renders alerts on the terminal. Stands in for the platform
/// notification primitive when running from the CLI.
struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        println!("[reminder] {}: {}", alert.title, alert.body);
        Ok(())
    }
}

pub fn run(file: PathBuf, interval_secs: u64, once: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tickler_core=info")),
        )
        .with_target(false)
        .init();

    let mut scheduler = DispatchScheduler::new(Arc::new(ConsoleSink));

    if once {
        let tasks = load_tasks(&file)?;
        scheduler.reconcile(&tasks, Permission::Granted);
        let fired = scheduler.tick();
        println!(
            "armed {} reminder(s), dispatched {}",
            scheduler.armed_count(),
            fired.len()
        );
        return Ok(());
    }

    // Single-threaded runtime: ticking and reconciliation interleave
    // cooperatively, never in parallel.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async move {
        let scheduler = Arc::new(tokio::sync::Mutex::new(scheduler));
        let ticker = dispatch::run(scheduler.clone(), Duration::from_secs(1));
        let reloader = async {
            let mut reload = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                reload.tick().await;
                match load_tasks(&file) {
                    Ok(tasks) => scheduler.lock().await.reconcile(&tasks, Permission::Granted),
                    Err(e) => {
                        tracing::warn!(file = %file.display(), error = %e, "task file reload failed")
                    }
                }
            }
        };
        tokio::join!(ticker, reloader);
        Ok(())
    })
}

fn load_tasks(path: &Path) -> Result<Vec<ReminderTask>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
