//! Weighted-random selection.

use super::{Balancer, SelectError};
use crate::registry::keys;
use crate::registry::record::UpstreamRecord;
use crate::store::CounterStore;

/// Weighted random selector.
///
/// Draws a uniform point in `[0, total_weight)` over the healthy entries
/// and walks the snapshot in id order until the accumulated weight reaches
/// the draw. Converges to proportional shares over many draws and keeps no
/// cursor state.
#[derive(Debug, Default)]
pub struct WeightedRandom;

impl WeightedRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Balancer for WeightedRandom {
    fn select(
        &self,
        snapshot: &[UpstreamRecord],
        counters: &dyn CounterStore,
    ) -> Result<UpstreamRecord, SelectError> {
        let total: u64 = snapshot
            .iter()
            .filter(|r| !r.down)
            .map(|r| u64::from(r.weight))
            .sum();
        if total == 0 {
            return Err(SelectError::NoHealthyUpstream);
        }

        let draw = fastrand::f64() * total as f64;
        let selected = select_at(snapshot, draw).ok_or(SelectError::NoHealthyUpstream)?;
        counters.fetch_add(&keys::requests(selected.id), 1);
        Ok(selected.clone())
    }

    fn name(&self) -> &'static str {
        "weighted_random"
    }
}

/// Accumulate healthy weights in id order until the draw point is reached.
fn select_at(snapshot: &[UpstreamRecord], draw: f64) -> Option<&UpstreamRecord> {
    let mut accumulated = 0.0;
    let mut last = None;
    for record in snapshot.iter().filter(|r| !r.down) {
        accumulated += f64::from(record.weight);
        last = Some(record);
        if accumulated >= draw {
            return Some(record);
        }
    }
    // float round-off can leave the draw a hair past the final accumulator
    last
}
