//! In-memory snapshot store.
//!
//! The fallback when no snapshot path is configured, and the double for
//! tests that need to observe what the bridge wrote.

use std::sync::Mutex;

use super::{SnapshotError, SnapshotStore};
use crate::registry::record::UpstreamRecord;

#[derive(Debug, Default)]
pub struct MemorySnapshots {
    records: Mutex<Vec<UpstreamRecord>>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshots {
    fn save(&self, records: &[UpstreamRecord]) -> Result<(), SnapshotError> {
        *self.records.lock().expect("snapshot lock poisoned") = records.to_vec();
        Ok(())
    }

    fn load(&self) -> Result<Vec<UpstreamRecord>, SnapshotError> {
        Ok(self.records.lock().expect("snapshot lock poisoned").clone())
    }
}
