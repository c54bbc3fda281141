use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::utils::{clock::Clock, time::epoch_seconds};

use super::{storage::state_store::StateStore, tracker::ActiveTimeTracker};

/// Drives the tracker with a periodic tick. The interval is purely a polling
/// choice made here; the tracker itself never sleeps.
pub struct SessionMonitor<S> {
    tracker: ActiveTimeTracker<S>,
    shutdown: CancellationToken,
    tick_interval: Duration,
    time_provider: Box<dyn Clock>,
}

impl<S: StateStore> SessionMonitor<S> {
    pub fn new(
        tracker: ActiveTimeTracker<S>,
        shutdown: CancellationToken,
        tick_interval: Duration,
        time_provider: Box<dyn Clock>,
    ) -> Self {
        Self {
            tracker,
            shutdown,
            tick_interval,
            time_provider,
        }
    }

    /// Executes the monitor event loop.
    pub async fn run(mut self) -> Result<()> {
        self.tracker.initialize().await?;

        let mut tick_point = self.time_provider.instant();
        loop {
            tick_point += self.tick_interval;

            let now = epoch_seconds(self.time_provider.time());
            debug!("Tick at {now}");
            self.tracker
                .tick(now)
                .await
                .inspect_err(|e| error!("Unexpected error during tick {e:?}"))?;

            tokio::select! {
                // Cancelation restores the display mode and flushes a final
                // checkpoint before the loop exits.
                _ = self.shutdown.cancelled() => {
                    let now = epoch_seconds(self.time_provider.time());
                    return self.tracker.shutdown(now).await;
                }
                _ = self.time_provider.sleep_until(tick_point) => ()
            }
        }
    }
}
