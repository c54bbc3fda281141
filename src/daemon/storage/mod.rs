//! Persistence for the tracker record.
//! The record is a single JSON object kept in one file per tracker instance.
//! It bridges sessions: hibernation detection and accumulated-time carryover
//! both reconcile against it on startup.

pub mod entities;
pub mod state_store;

pub const STATE_FILE_NAME: &str = "grayscale_time.json";
