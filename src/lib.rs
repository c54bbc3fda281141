//! Small daemon that accumulates active screen time across restarts and
//! hibernation cycles, and toggles a display grayscale mode once a cumulative
//! threshold is crossed. State is checkpointed to a JSON record on disk so
//! that sessions survive process exits.

pub mod daemon;
pub mod utils;
