//! Round-robin-with-weight selection.

use super::{Balancer, SelectError};
use crate::registry::keys;
use crate::registry::record::UpstreamRecord;
use crate::store::CounterStore;

/// Weighted round-robin selector.
///
/// A backend with weight N receives N consecutive picks before the cursor
/// moves on (block-grouped weighting, not smooth interleaving). The cursor
/// and weight counter live in the shared counter store; the read-then-write
/// across them is not atomic, so under heavy concurrency a backend can be
/// skipped or picked twice relative to ideal ordering.
#[derive(Debug, Default)]
pub struct WeightedRoundRobin;

impl WeightedRoundRobin {
    pub fn new() -> Self {
        Self
    }
}

impl Balancer for WeightedRoundRobin {
    fn select(
        &self,
        snapshot: &[UpstreamRecord],
        counters: &dyn CounterStore,
    ) -> Result<UpstreamRecord, SelectError> {
        let len = snapshot.len();
        if len == 0 {
            return Err(SelectError::NoHealthyUpstream);
        }

        // A cursor left over from a larger snapshot wraps to the start.
        let stored = counters.get(keys::CURSOR).unwrap_or(0);
        let cursor = usize::try_from(stored)
            .ok()
            .filter(|c| *c < len)
            .unwrap_or(0);

        // Walk forward past down entries, at most one full lap. Nothing is
        // persisted on an all-down lap, so the schedule stays where it was.
        let mut index = cursor;
        let mut skipped = 0i64;
        while snapshot[index].down {
            skipped += 1;
            if skipped as usize >= len {
                counters.fetch_add(keys::ATTEMPTS, skipped);
                return Err(SelectError::NoHealthyUpstream);
            }
            index = (index + 1) % len;
        }
        if skipped > 0 {
            counters.fetch_add(keys::ATTEMPTS, skipped);
        }

        let selected = snapshot[index].clone();
        counters.fetch_add(&keys::requests(selected.id), 1);

        // Consume one unit of the backend's weight quota; once the quota is
        // spent, start the next backend's block.
        let weight_counter = counters.get(keys::WEIGHT).unwrap_or(0) + 1;
        if weight_counter >= i64::from(selected.weight) {
            counters.set(keys::WEIGHT, 0);
            counters.set(keys::CURSOR, ((index + 1) % len) as i64);
        } else {
            counters.set(keys::WEIGHT, weight_counter);
            counters.set(keys::CURSOR, index as i64);
        }

        Ok(selected)
    }

    fn name(&self) -> &'static str {
        "weighted_round_robin"
    }
}
