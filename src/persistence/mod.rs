//! Best-effort snapshot/reload bridge.
//!
//! # Data Flow
//! ```text
//! Admin mutation → Registry (already applied) → snapshot() → SnapshotStore
//! First access   → ensure_loaded() → snapshot | seed configuration
//! Purge          → reload() → seed configuration
//! ```
//!
//! # Design Decisions
//! - The in-memory registry is the source of truth; a failed snapshot write
//!   is logged and reported but never rolled back
//! - Snapshots are full-registry dumps, written after every mutation
//! - The one-time bulk load is guarded by the `initialized` counter so a
//!   second concurrent first access cannot double-load

pub mod file;
pub mod memory;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::registry::record::UpstreamRecord;
use crate::registry::validate::{self, ValidationError};
use crate::registry::{keys, Registry};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("seed upstream {index} rejected: {source}")]
    Seed {
        index: usize,
        source: ValidationError,
    },
}

/// Durable-storage collaborator: write and read the full record list.
/// The on-disk shape belongs to the implementation, not to the registry.
pub trait SnapshotStore: Send + Sync {
    fn save(&self, records: &[UpstreamRecord]) -> Result<(), SnapshotError>;
    fn load(&self) -> Result<Vec<UpstreamRecord>, SnapshotError>;
}

/// Composes a snapshot store with the seed configuration for one namespace.
pub struct PersistenceBridge {
    store: Arc<dyn SnapshotStore>,
    seeds: Vec<Value>,
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn SnapshotStore>, seeds: Vec<Value>) -> Self {
        Self { store, seeds }
    }

    /// One-time bulk load: last snapshot first, seed configuration when no
    /// usable snapshot exists. Concurrent first access loads exactly once.
    pub fn ensure_loaded(&self, registry: &Registry) -> Result<(), SnapshotError> {
        if registry.counters().get(keys::INITIALIZED).unwrap_or(0) != 0 {
            return Ok(());
        }
        // fetch-add hands the load to exactly one caller
        if registry.counters().fetch_add(keys::INITIALIZED, 1) != 0 {
            return Ok(());
        }

        match self.store.load() {
            Ok(records) if !records.is_empty() => {
                let count = records.len();
                let mut max_id = 0;
                for record in records {
                    max_id = max_id.max(record.id);
                    registry.put(record);
                }
                registry.counters().set(keys::NEXT_ID, max_id as i64 + 1);
                tracing::info!(
                    registry = %registry.name(),
                    count,
                    "registry loaded from snapshot"
                );
                Ok(())
            }
            Ok(_) => self.load_seeds(registry),
            Err(error) => {
                tracing::warn!(
                    registry = %registry.name(),
                    %error,
                    "snapshot unreadable, loading seed configuration"
                );
                self.load_seeds(registry)
            }
        }
    }

    /// Purge path: repopulate from the seed configuration only, marking the
    /// namespace initialized again.
    pub fn reload(&self, registry: &Registry) -> Result<(), SnapshotError> {
        let result = self.load_seeds(registry);
        registry.counters().set(keys::INITIALIZED, 1);
        result
    }

    fn load_seeds(&self, registry: &Registry) -> Result<(), SnapshotError> {
        for (index, seed) in self.seeds.iter().enumerate() {
            let payload = validate::parse_create_payload(seed)
                .map_err(|source| SnapshotError::Seed { index, source })?;
            registry.put(UpstreamRecord::from_payload(index as u64, &payload));
        }
        registry.counters().set(keys::NEXT_ID, self.seeds.len() as i64);
        tracing::info!(
            registry = %registry.name(),
            count = self.seeds.len(),
            "registry loaded from seed configuration"
        );
        Ok(())
    }

    /// Serialize the whole registry to the storage collaborator.
    pub fn snapshot(&self, registry: &Registry) -> Result<(), SnapshotError> {
        let records = registry.snapshot();
        if let Err(error) = self.store.save(&records) {
            tracing::error!(
                registry = %registry.name(),
                %error,
                "snapshot write failed, in-memory registry remains authoritative"
            );
            return Err(error);
        }
        tracing::debug!(
            registry = %registry.name(),
            count = records.len(),
            "snapshot written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::memory::MemorySnapshots;
    use crate::store::memory::{MemoryCounters, MemoryRecords};
    use serde_json::json;

    fn registry() -> Registry {
        Registry::new(
            "proxy",
            Arc::new(MemoryRecords::new()),
            Arc::new(MemoryCounters::new()),
        )
    }

    #[test]
    fn seeds_load_once_and_set_next_id() {
        let registry = registry();
        let bridge = PersistenceBridge::new(
            Arc::new(MemorySnapshots::new()),
            vec![
                json!({"server": "10.0.0.1", "weight": 2}),
                json!({"server": "10.0.0.2"}),
            ],
        );

        bridge.ensure_loaded(&registry).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).unwrap().weight, 2);
        assert_eq!(registry.counters().get(keys::NEXT_ID), Some(2));

        // a second call must not reload
        registry.delete(1);
        bridge.ensure_loaded(&registry).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_first_access_loads_exactly_once() {
        let registry = Arc::new(registry());
        let bridge = Arc::new(PersistenceBridge::new(
            Arc::new(MemorySnapshots::new()),
            vec![json!({"server": "10.0.0.1"})],
        ));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            let bridge = bridge.clone();
            handles.push(std::thread::spawn(move || {
                bridge.ensure_loaded(&registry).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.counters().get(keys::NEXT_ID), Some(1));
    }

    #[test]
    fn snapshot_wins_over_seeds() {
        let store = Arc::new(MemorySnapshots::new());
        let seeded = registry();
        let seed_bridge = PersistenceBridge::new(
            store.clone(),
            vec![json!({"server": "10.0.0.1"}), json!({"server": "10.0.0.2"})],
        );
        seed_bridge.ensure_loaded(&seeded).unwrap();
        seeded.delete(0);
        seed_bridge.snapshot(&seeded).unwrap();

        // fresh namespace over the same store: the snapshot is authoritative
        let restored = registry();
        let bridge = PersistenceBridge::new(store, vec![json!({"server": "10.9.9.9"})]);
        bridge.ensure_loaded(&restored).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.get(1).unwrap().server, "10.0.0.2");
        assert_eq!(restored.counters().get(keys::NEXT_ID), Some(2));
    }

    #[test]
    fn invalid_seed_is_reported_with_index() {
        let registry = registry();
        let bridge = PersistenceBridge::new(
            Arc::new(MemorySnapshots::new()),
            vec![
                json!({"server": "10.0.0.1"}),
                json!({"server": "10.0.0.2", "color": "blue"}),
            ],
        );

        match bridge.ensure_loaded(&registry) {
            Err(SnapshotError::Seed { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected seed error, got {other:?}"),
        }
    }
}
