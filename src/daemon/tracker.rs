use anyhow::Result;
use tracing::{debug, info};

use super::{
    display::DisplayToggle,
    storage::{entities::TrackerState, state_store::StateStore},
};

/// Gap and threshold configuration, in seconds.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Checkpoint-to-checkpoint gap above which elapsed time is folded into
    /// the accumulated total and flushed to storage.
    pub checkpoint_interval: f64,
    /// Gap treated as a resume from system hibernation.
    pub hibernation_threshold: f64,
    /// Cumulative active time after which the display mode gets enabled.
    pub action_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            checkpoint_interval: 300.0,
            hibernation_threshold: 3600.0,
            action_threshold: 1800.0,
        }
    }
}

/// Accumulates active elapsed time across restarts and hibernation cycles
/// and enables the display mode once the action threshold is crossed.
///
/// The machine is advanced exclusively through [tick](Self::tick). The caller
/// picks the polling interval and supplies `now` as fractional epoch seconds,
/// which keeps every transition reproducible with synthetic timestamps. No
/// call suspends on anything but storage writes.
pub struct ActiveTimeTracker<S> {
    store: S,
    display: Box<dyn DisplayToggle>,
    thresholds: Thresholds,
    state: TrackerState,
    session_start: Option<f64>,
}

impl<S: StateStore> ActiveTimeTracker<S> {
    pub fn new(store: S, display: Box<dyn DisplayToggle>, thresholds: Thresholds) -> Self {
        Self {
            store,
            display,
            thresholds,
            state: TrackerState::default(),
            session_start: None,
        }
    }

    /// Loads the persisted record. A missing or damaged record resets the
    /// fields to their defaults instead of failing.
    pub async fn initialize(&mut self) -> Result<()> {
        self.state = self.store.load().await?.unwrap_or_default();
        info!(
            "Tracker initialized. Accumulated time: {:.1} seconds",
            self.state.accumulated_time
        );
        Ok(())
    }

    pub fn mode_enabled(&self) -> bool {
        self.state.grayscale_enabled
    }

    pub fn accumulated_time(&self) -> f64 {
        self.state.accumulated_time
    }

    /// Advances the state machine. Intended to be called roughly once per
    /// second.
    pub async fn tick(&mut self, now: f64) -> Result<()> {
        let Some(session_start) = self.session_start else {
            self.session_start = Some(now);
            if !self.check_hibernation(now).await? {
                // A fresh start carries nothing over: time from a previous
                // clean session is presumed already folded into history.
                self.state.accumulated_time = 0.0;
                self.persist(now).await?;
            }
            return Ok(());
        };

        if self.check_hibernation(now).await? {
            // Restart the in-session clock, keep the accumulated total.
            self.session_start = Some(now);
            return Ok(());
        }

        let total = self.state.accumulated_time + (now - session_start);
        if total >= self.thresholds.action_threshold && !self.state.grayscale_enabled {
            self.toggle(now).await?;
        }
        Ok(())
    }

    /// Detects a resume from hibernation by the wall-clock gap since the
    /// last checkpoint. Gaps above the checkpoint interval that fall short
    /// of a hibernation are folded into the accumulated total. Only forward
    /// gaps are detected; a host clock moving backward is not defended
    /// against.
    async fn check_hibernation(&mut self, now: f64) -> Result<bool> {
        let Some(last_checkpoint) = self.state.last_checkpoint else {
            self.persist(now).await?;
            return Ok(false);
        };

        let gap = now - last_checkpoint;
        if gap > self.thresholds.hibernation_threshold {
            info!(
                "Detected return from hibernation. Time gap: {:.2} hours",
                gap / 3600.0
            );
            // Accumulated time is deliberately left untouched.
            self.persist(now).await?;
            return Ok(true);
        }

        if gap > self.thresholds.checkpoint_interval {
            self.state.accumulated_time += gap;
            self.persist(now).await?;
        }
        Ok(false)
    }

    /// Flips the display mode and persists the flag immediately so it
    /// survives a crash.
    pub async fn toggle(&mut self, now: f64) -> Result<()> {
        self.display.flip()?;
        self.state.grayscale_enabled = !self.state.grayscale_enabled;
        self.persist(now).await?;
        info!(
            "Grayscale {}",
            if self.state.grayscale_enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        Ok(())
    }

    async fn persist(&mut self, now: f64) -> Result<()> {
        self.state.last_checkpoint = Some(now);
        debug!("Checkpointing {:?}", self.state);
        self.store.save(&self.state).await
    }

    /// Restores the display mode and flushes a final checkpoint. Must be
    /// called before a clean exit for the off-toggle guarantee to hold.
    pub async fn shutdown(&mut self, now: f64) -> Result<()> {
        if self.state.grayscale_enabled {
            self.toggle(now).await?;
        }
        self.persist(now).await
    }
}
