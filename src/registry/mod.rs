//! Dynamic upstream registry.
//!
//! # Data Flow
//! ```text
//! Admin operation → validate.rs → Registry mutation (record.rs types)
//! Selector call   → Registry snapshot (ascending id) + counter set
//! Create          → allocator.rs (registry-unique id)
//! ```
//!
//! # Design Decisions
//! - One `Registry` per backend group, owning its record and counter stores
//! - Scheduling counters are in-memory only; record content durability is
//!   the persistence bridge's job
//! - Exactly one live record per id; `put` is an upsert with last-write-wins

pub mod allocator;
pub mod record;
pub mod validate;

use std::sync::Arc;

use thiserror::Error;

use crate::store::{CounterStore, RecordStore};
use record::UpstreamRecord;

/// Counter keys for one registry namespace.
pub mod keys {
    /// Monotonic allocator seed.
    pub const NEXT_ID: &str = "next_id";
    /// Round-robin position.
    pub const CURSOR: &str = "cursor";
    /// Consumption within the current backend's weight quota.
    pub const WEIGHT: &str = "weight";
    /// Cumulative count of down entries skipped during selection.
    pub const ATTEMPTS: &str = "attempts";
    /// One-time bulk-load guard.
    pub const INITIALIZED: &str = "initialized";

    /// Per-backend request tally key.
    pub fn requests(id: u64) -> String {
        format!("requests:{id}")
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("upstream {0} does not exist")]
    NotFound(u64),
    #[error("id allocation exhausted after {0} attempts")]
    AllocationExhausted(usize),
}

/// Concurrent collection of upstream records for one backend group.
pub struct Registry {
    name: String,
    records: Arc<dyn RecordStore>,
    counters: Arc<dyn CounterStore>,
}

impl Registry {
    pub fn new(
        name: impl Into<String>,
        records: Arc<dyn RecordStore>,
        counters: Arc<dyn CounterStore>,
    ) -> Self {
        Self {
            name: name.into(),
            records,
            counters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn counters(&self) -> &dyn CounterStore {
        self.counters.as_ref()
    }

    pub fn get(&self, id: u64) -> Option<UpstreamRecord> {
        self.records.get(id)
    }

    /// All records, unordered.
    pub fn list(&self) -> Vec<UpstreamRecord> {
        self.records.items()
    }

    /// The selector's stable view: all records sorted ascending by id.
    pub fn snapshot(&self) -> Vec<UpstreamRecord> {
        let mut items = self.records.items();
        items.sort_unstable_by_key(|r| r.id);
        items
    }

    pub fn put(&self, record: UpstreamRecord) {
        self.records.set(record.id, record);
    }

    pub fn delete(&self, id: u64) -> bool {
        self.records.delete(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.len() == 0
    }

    /// Remove every record and reset all scheduling state for the
    /// namespace, including the bulk-load guard.
    pub fn clear(&self) {
        self.records.clear();
        self.counters.clear();
    }

    /// Observability tally for one backend.
    pub fn requests_for(&self, id: u64) -> i64 {
        self.counters.get(&keys::requests(id)).unwrap_or(0)
    }

    pub fn reset_requests(&self, id: u64) {
        self.counters.delete(&keys::requests(id));
    }
}
