//! Upstream selection strategies.
//!
//! # Data Flow
//! ```text
//! Request needing a backend
//!     → registry snapshot (ascending id) + counter set
//!     → Apply selection strategy:
//!         - weighted_round_robin.rs (block-grouped weighting, skip down)
//!         - weighted_random.rs (proportional draw over healthy weights)
//!     → Return endpoint or NoHealthyUpstream
//! ```
//!
//! # Design Decisions
//! - Strategy chosen at composition time, one per registry namespace
//! - Selection is synchronous and bounded; no retries beyond the skip-down
//!   walk
//! - Scheduling state lives in the shared counter store, not the strategy
//!   value, so every worker advances the same schedule

pub mod weighted_random;
pub mod weighted_round_robin;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::record::UpstreamRecord;
use crate::store::CounterStore;
use weighted_random::WeightedRandom;
use weighted_round_robin::WeightedRoundRobin;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// Every known upstream is absent or marked down.
    #[error("no healthy upstream available")]
    NoHealthyUpstream,
}

/// A selection strategy over a registry snapshot.
pub trait Balancer: Send + Sync {
    /// Pick one healthy upstream, advancing any scheduling counters the
    /// strategy keeps.
    fn select(
        &self,
        snapshot: &[UpstreamRecord],
        counters: &dyn CounterStore,
    ) -> Result<UpstreamRecord, SelectError>;

    fn name(&self) -> &'static str;
}

/// Selection strategy for a registry namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    RoundRobin,
    Random,
}

/// Build the configured strategy.
pub fn for_strategy(kind: StrategyKind) -> Arc<dyn Balancer> {
    match kind {
        StrategyKind::RoundRobin => Arc::new(WeightedRoundRobin::new()),
        StrategyKind::Random => Arc::new(WeightedRandom::new()),
    }
}
