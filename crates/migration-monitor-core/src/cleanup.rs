//! # Auto-Cleanup
//!
//! Drops transition records for resources that are no longer delivered.
//!
//! Cleanup only removes ids the current collection does not reference, so
//! running it before or after the transition scan gives the same result.
//! After a prune the store holds at most as many records as the collection
//! had resources.

use crate::store::TransitionStore;
use crate::ResourceId;
use std::collections::BTreeSet;

/// Remove every record whose identifier is not in `live_ids`.
///
/// Returns the number of records removed.
pub fn prune(store: &mut TransitionStore, live_ids: &BTreeSet<ResourceId>) -> usize {
    let removed = store.retain(|id| live_ids.contains(id));
    if removed > 0 {
        tracing::debug!(removed, remaining = store.len(), "pruned stale transition records");
    }
    removed
}
