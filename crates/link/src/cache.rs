//! Local connection cache.
//!
//! A single key-value entry recording the last successful veteran
//! connection, used only to restore the pointer across restarts. Cache
//! I/O failures degrade to "no hint" and are never surfaced.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use log::{debug, warn};

use crate::ConnectionRecord;

/// Storage seam for the persisted [`ConnectionRecord`].
pub trait ConnectionCache: Send + Sync {
    fn load(&self) -> Option<ConnectionRecord>;
    fn store(&self, record: &ConnectionRecord);
    fn clear(&self);
}

/// JSON-file backed cache.
pub struct FileConnectionCache {
    path: PathBuf,
}

impl FileConnectionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConnectionCache for FileConnectionCache {
    fn load(&self) -> Option<ConnectionRecord> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!("no connection cache at {}: {}", self.path.display(), err);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("discarding unreadable connection cache: {}", err);
                None
            }
        }
    }

    fn store(&self, record: &ConnectionRecord) {
        let contents = match serde_json::to_string_pretty(record) {
            Ok(contents) => contents,
            Err(err) => {
                warn!("could not serialize connection record: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, contents) {
            warn!(
                "could not write connection cache {}: {}",
                self.path.display(),
                err
            );
        }
    }

    fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            debug!("connection cache not removed: {}", err);
        }
    }
}

/// In-memory cache for tests and demos.
#[derive(Default)]
pub struct InMemoryConnectionCache {
    slot: RwLock<Option<ConnectionRecord>>,
}

impl InMemoryConnectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, record: ConnectionRecord) -> Self {
        {
            let mut slot = self.slot.write().unwrap();
            *slot = Some(record);
        }
        self
    }
}

impl ConnectionCache for InMemoryConnectionCache {
    fn load(&self) -> Option<ConnectionRecord> {
        self.slot.read().unwrap().clone()
    }

    fn store(&self, record: &ConnectionRecord) {
        let mut slot = self.slot.write().unwrap();
        *slot = Some(record.clone());
    }

    fn clear(&self) {
        let mut slot = self.slot.write().unwrap();
        *slot = None;
    }
}
