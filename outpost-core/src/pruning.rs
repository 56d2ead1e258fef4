//! Bounded memory lists.
//!
//! After every insertion the per-NPC list is checked against its capacity.
//! When it overflows, entries are ranked by importance (descending), ties
//! broken by recency (newest first), and everything past the capacity is
//! evicted.

use std::cmp::Ordering;

use crate::memory::MemoryEntry;

/// Retention order: more important first, then newer first.
#[must_use]
pub fn retention_order(a: &MemoryEntry, b: &MemoryEntry) -> Ordering {
    b.importance
        .cmp(&a.importance)
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Trim `memories` to `capacity`, returning the evicted entries.
///
/// Lists at or under capacity are left untouched, including their order.
pub fn prune(memories: &mut Vec<MemoryEntry>, capacity: usize) -> Vec<MemoryEntry> {
    if memories.len() <= capacity {
        return Vec::new();
    }
    memories.sort_by(retention_order);
    memories.split_off(capacity)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
