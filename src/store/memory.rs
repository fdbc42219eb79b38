//! DashMap-backed in-process stores.

use dashmap::DashMap;

use super::{CounterStore, RecordStore};
use crate::registry::record::UpstreamRecord;

/// In-process record store over a sharded concurrent map.
#[derive(Debug, Default)]
pub struct MemoryRecords {
    map: DashMap<u64, UpstreamRecord>,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecords {
    fn get(&self, id: u64) -> Option<UpstreamRecord> {
        self.map.get(&id).map(|r| r.clone())
    }

    fn set(&self, id: u64, record: UpstreamRecord) {
        self.map.insert(id, record);
    }

    fn delete(&self, id: u64) -> bool {
        self.map.remove(&id).is_some()
    }

    fn items(&self) -> Vec<UpstreamRecord> {
        self.map.iter().map(|r| r.value().clone()).collect()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn clear(&self) {
        self.map.clear();
    }
}

/// In-process counter store.
///
/// `fetch_add` holds only the touched entry's shard lock, so counters under
/// different keys never contend.
#[derive(Debug, Default)]
pub struct MemoryCounters {
    map: DashMap<String, i64>,
}

impl MemoryCounters {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounters {
    fn get(&self, key: &str) -> Option<i64> {
        self.map.get(key).map(|v| *v)
    }

    fn set(&self, key: &str, value: i64) {
        self.map.insert(key.to_string(), value);
    }

    fn fetch_add(&self, key: &str, delta: i64) -> i64 {
        let mut entry = self.map.entry(key.to_string()).or_insert(0);
        let prior = *entry;
        *entry += delta;
        prior
    }

    fn delete(&self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    fn clear(&self) {
        self.map.clear();
    }
}
