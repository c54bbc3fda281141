use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::utils::clock::{Clock, DefaultClock};

use self::{
    args::DaemonArgs,
    display::{CommandToggle, DisplayToggle},
    monitor::SessionMonitor,
    storage::{
        state_store::{JsonStateStore, StateStore},
        STATE_FILE_NAME,
    },
    tracker::{ActiveTimeTracker, Thresholds},
};

pub mod args;
pub mod display;
pub mod monitor;
pub mod shutdown;
pub mod storage;
pub mod tracker;

/// Represents the starting point for the daemon.
pub async fn start_daemon(dir: PathBuf, args: DaemonArgs) -> Result<()> {
    let shutdown_token = CancellationToken::new();

    let store = JsonStateStore::new(dir.join(STATE_FILE_NAME))?;
    let toggle = CommandToggle::new(args.toggle_command.clone());

    let monitor = create_monitor(store, Box::new(toggle), &args, &shutdown_token, DefaultClock);

    let (_, monitor_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        async {
            let result = monitor.run().await;
            // Unblocks shutdown detection when the monitor fails on its own.
            shutdown_token.cancel();
            result
        },
    );

    if let Err(e) = &monitor_result {
        error!("Session monitor got an error {:?}", e);
    }

    monitor_result
}

fn create_monitor<S: StateStore>(
    store: S,
    toggle: Box<dyn DisplayToggle>,
    args: &DaemonArgs,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> SessionMonitor<S> {
    let thresholds = Thresholds {
        checkpoint_interval: args.checkpoint_interval as f64,
        hibernation_threshold: args.hibernation_threshold as f64,
        action_threshold: args.action_threshold as f64,
    };
    let tracker = ActiveTimeTracker::new(store, toggle, thresholds);

    SessionMonitor::new(
        tracker,
        shutdown_token.clone(),
        Duration::from_secs(args.tick_interval),
        Box::new(clock),
    )
}

#[cfg(test)]
mod daemon_tests {
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use crate::{
        daemon::{
            display::MockDisplayToggle,
            monitor::SessionMonitor,
            storage::{
                state_store::{JsonStateStore, StateStore},
                STATE_FILE_NAME,
            },
            tracker::{ActiveTimeTracker, Thresholds},
        },
        utils::{clock::Clock, logging::TEST_LOGGING},
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    #[derive(Clone)]
    struct TestClock {
        start_time: DateTime<Utc>,
        reference: Instant,
    }

    #[async_trait]
    impl Clock for TestClock {
        fn time(&self) -> DateTime<Utc> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep_until(&self, instant: tokio::time::Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }

    /// Very simple smoke test to check if the daemon loop is working
    /// properly: a few ticks, a cancellation, and a persisted record at the
    /// end.
    #[tokio::test]
    async fn smoke_test_daemon() -> Result<()> {
        *TEST_LOGGING;

        let dir = tempdir()?;
        let store = JsonStateStore::new(dir.path().join(STATE_FILE_NAME))?;

        // No flips expected: the action threshold sits far beyond the test
        // runtime.
        let display = MockDisplayToggle::new();

        let test_clock = TestClock {
            start_time: Utc.from_utc_datetime(&TEST_START_DATE),
            reference: Instant::now(),
        };
        let shutdown_token = CancellationToken::new();

        let tracker = ActiveTimeTracker::new(store, Box::new(display), Thresholds::default());
        let monitor = SessionMonitor::new(
            tracker,
            shutdown_token.clone(),
            Duration::from_millis(50),
            Box::new(test_clock),
        );

        let (_, monitor_result) = tokio::join!(
            async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                shutdown_token.cancel()
            },
            monitor.run(),
        );

        monitor_result?;

        let store = JsonStateStore::new(dir.path().join(STATE_FILE_NAME))?;
        let state = store.load().await?.expect("record should exist");
        assert!(!state.grayscale_enabled);
        assert_eq!(state.accumulated_time, 0.0);
        assert!(state.last_checkpoint.is_some());

        Ok(())
    }
}
