use serde::{Deserialize, Serialize};

/// The persisted tracker record. This is the sole source of truth across
/// restarts; the in-memory session clock has no meaning until reconciled
/// against it.
///
/// Missing fields fall back to their defaults so records written by older
/// versions keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrackerState {
    /// Epoch seconds of the last checkpoint flush. Absent on first run.
    #[serde(rename = "last_time", default)]
    pub last_checkpoint: Option<f64>,
    /// Active seconds accumulated across sessions prior to the current one.
    #[serde(default)]
    pub accumulated_time: f64,
    /// Whether the threshold-triggered display mode is currently active.
    #[serde(default)]
    pub grayscale_enabled: bool,
}
