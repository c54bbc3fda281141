use std::{future::Future, io::ErrorKind, path::PathBuf};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, warn};

use super::entities::TrackerState;

/// Interface for abstracting persistence of the tracker record.
pub trait StateStore {
    /// Reads the persisted record. `None` means no usable record exists:
    /// a missing file and an unparseable one both land here, so a damaged
    /// state file can never wedge the daemon on startup.
    fn load(&self) -> impl Future<Output = Result<Option<TrackerState>>>;

    /// Overwrites the persisted record. Failures are propagated; the caller
    /// treats them as fatal rather than retrying.
    fn save(&self, state: &TrackerState) -> impl Future<Output = Result<()>>;
}

/// The main realization of [StateStore]. Keeps the record as one JSON object
/// in a single file, guarded by advisory locks.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    async fn read_raw(&self) -> Result<Option<String>, std::io::Error> {
        let mut file = match File::open(&self.path).await {
            Ok(v) => v,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        file.lock_shared()?;
        let mut raw = String::new();
        let result = file.read_to_string(&mut raw).await;
        file.unlock_async().await?;
        result?;

        Ok(Some(raw))
    }

    async fn overwrite(file: &mut File, state: &TrackerState) -> Result<()> {
        let mut buffer = serde_json::to_vec(state)?;
        buffer.push(b'\n');
        file.write_all(&buffer).await?;
        file.flush().await?;
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    async fn load(&self) -> Result<Option<TrackerState>> {
        let Some(raw) = self.read_raw().await? else {
            return Ok(None);
        };

        match serde_json::from_str::<TrackerState>(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                // Might happen after a shutdown cutting off the write.
                warn!(
                    "State file {:?} holds an illegal json record: {e}",
                    self.path
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, state: &TrackerState) -> Result<()> {
        debug!("Persisting {state:?} to {:?}", self.path);
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for the file
        file.lock_exclusive()?;
        let result = Self::overwrite(&mut file, state).await;
        file.unlock_async().await?;
        result
    }
}
