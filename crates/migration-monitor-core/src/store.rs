//! # Transition Store
//!
//! In-memory mapping from resource identifier to its `TransitionRecord`.
//!
//! - Owned by exactly one observer, never shared
//! - Volatile: never serialized, rebuilt from first sightings on restart
//! - Uses `BTreeMap` for deterministic iteration order

use crate::{ResourceId, TransitionRecord};
use std::collections::{BTreeMap, BTreeSet};

/// Per-observer transition memory.
#[derive(Debug, Clone, Default)]
pub struct TransitionStore {
    records: BTreeMap<ResourceId, TransitionRecord>,
}

impl TransitionStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the record for an identifier.
    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&TransitionRecord> {
        self.records.get(id)
    }

    /// Apply a pure update to the record for `id`.
    ///
    /// A default record is created first if none exists. Returns the
    /// updated record.
    pub fn upsert<F>(&mut self, id: &ResourceId, mutator: F) -> &TransitionRecord
    where
        F: FnOnce(TransitionRecord) -> TransitionRecord,
    {
        let slot = self.records.entry(id.clone()).or_default();
        *slot = mutator(std::mem::take(slot));
        slot
    }

    /// Insert a record only if `id` is not tracked yet.
    ///
    /// Returns `true` if the record was created.
    pub fn insert_if_absent(&mut self, id: &ResourceId, record: TransitionRecord) -> bool {
        if self.records.contains_key(id) {
            return false;
        }
        self.records.insert(id.clone(), record);
        true
    }

    /// Remove the record for an identifier.
    pub fn remove(&mut self, id: &ResourceId) -> Option<TransitionRecord> {
        self.records.remove(id)
    }

    /// All tracked identifiers.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<ResourceId> {
        self.records.keys().cloned().collect()
    }

    /// Check if an identifier is tracked.
    #[must_use]
    pub fn contains(&self, id: &ResourceId) -> bool {
        self.records.contains_key(id)
    }

    /// Number of tracked resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only the records whose identifier satisfies `keep`.
    ///
    /// Returns the number of records removed.
    pub(crate) fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&ResourceId) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|id, _| keep(id));
        before - self.records.len()
    }
}
