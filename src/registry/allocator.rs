//! Registry-unique id allocation.

use super::{keys, Registry, RegistryError};

/// Allocate a registry-unique id.
///
/// Atomically advances the `next_id` counter and re-checks the registry for
/// the produced value. A concurrent create or delete can race the check, so
/// the id is only guaranteed free at the instant it was tested; the re-check
/// on every attempt is what keeps two creates from ever sharing an id.
/// Retries are bounded by twice the current registry size.
pub fn allocate_id(registry: &Registry) -> Result<u64, RegistryError> {
    let max_attempts = registry.len() * 2 + 1;
    for _ in 0..max_attempts {
        let candidate = registry.counters().fetch_add(keys::NEXT_ID, 1).max(0) as u64;
        if registry.get(candidate).is_none() {
            return Ok(candidate);
        }
        tracing::debug!(candidate, "allocator candidate already taken, retrying");
    }
    Err(RegistryError::AllocationExhausted(max_attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::record::{UpstreamPayload, UpstreamRecord};
    use crate::store::memory::{MemoryCounters, MemoryRecords};
    use crate::store::RecordStore;
    use std::sync::Arc;

    fn record(id: u64) -> UpstreamRecord {
        let payload = UpstreamPayload {
            server: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        UpstreamRecord::from_payload(id, &payload)
    }

    fn registry() -> Registry {
        Registry::new(
            "proxy",
            Arc::new(MemoryRecords::new()),
            Arc::new(MemoryCounters::new()),
        )
    }

    #[test]
    fn ids_start_at_zero_and_ascend() {
        let registry = registry();
        assert_eq!(allocate_id(&registry).unwrap(), 0);
        assert_eq!(allocate_id(&registry).unwrap(), 1);
        assert_eq!(allocate_id(&registry).unwrap(), 2);
    }

    #[test]
    fn occupied_ids_are_skipped() {
        let registry = registry();
        registry.put(record(0));
        registry.put(record(1));

        // seed untouched, so the first two candidates collide
        assert_eq!(allocate_id(&registry).unwrap(), 2);
    }

    // Store stub where every id is taken, to drive the retry bound.
    struct SaturatedRecords;

    impl RecordStore for SaturatedRecords {
        fn get(&self, id: u64) -> Option<UpstreamRecord> {
            Some(record(id))
        }
        fn set(&self, _id: u64, _record: UpstreamRecord) {}
        fn delete(&self, _id: u64) -> bool {
            false
        }
        fn items(&self) -> Vec<UpstreamRecord> {
            Vec::new()
        }
        fn len(&self) -> usize {
            4
        }
        fn clear(&self) {}
    }

    #[test]
    fn retries_are_bounded() {
        let registry = Registry::new(
            "proxy",
            Arc::new(SaturatedRecords),
            Arc::new(MemoryCounters::new()),
        );

        match allocate_id(&registry) {
            Err(RegistryError::AllocationExhausted(attempts)) => assert_eq!(attempts, 9),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}
