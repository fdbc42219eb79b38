//! Shared concurrent stores.
//!
//! # Data Flow
//! ```text
//! Admin mutation / selector call
//!     → RecordStore (upstream records, keyed by id)
//!     → CounterStore (scheduling cursors, tallies, allocator seed)
//! ```
//!
//! # Design Decisions
//! - Registry and selector depend on store traits, not a concrete map, so
//!   the backing implementation can be swapped at composition time
//! - Single-key operations are atomic; multi-step sequences across keys are
//!   explicitly not
//! - Counters expose fetch-add returning the prior value, matching the
//!   atomic primitives schedulers expect

pub mod memory;

use crate::registry::record::UpstreamRecord;

/// Concurrent store of upstream records for one registry namespace.
///
/// Per-key atomicity contract: a `set` never tears, concurrent `set`s to
/// different ids never block each other, and the last write to an id wins.
pub trait RecordStore: Send + Sync {
    fn get(&self, id: u64) -> Option<UpstreamRecord>;
    fn set(&self, id: u64, record: UpstreamRecord);
    fn delete(&self, id: u64) -> bool;
    /// All live records, unordered.
    fn items(&self) -> Vec<UpstreamRecord>;
    fn len(&self) -> usize;
    fn clear(&self);
}

/// Concurrent atomic-increment store for scheduling state.
pub trait CounterStore: Send + Sync {
    fn get(&self, key: &str) -> Option<i64>;
    fn set(&self, key: &str, value: i64);
    /// Add `delta` to the counter (missing keys start at zero) and return
    /// the value prior to the addition.
    fn fetch_add(&self, key: &str, delta: i64) -> i64;
    fn delete(&self, key: &str) -> bool;
    fn clear(&self);
}
