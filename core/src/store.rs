//! Capability Store
//!
//! Holds the last fetched snapshot. `load` swaps the whole thing in one
//! assignment; readers hold an `Arc` to whatever snapshot was current when
//! they asked, so a reload never changes data underneath a running query.

use crate::model::Snapshot;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct CapabilityStore {
    snapshot: Arc<Snapshot>,
    /// Sequence number of the fetch that produced `snapshot`; 0 before any load.
    loaded_seq: u64,
}

impl CapabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held snapshot wholesale.
    pub fn load(&mut self, snapshot: Snapshot) {
        self.snapshot = Arc::new(snapshot);
    }

    /// Replace the snapshot only if `seq` is newer than the last applied fetch.
    ///
    /// Returns false when the response is stale and was dropped.
    pub fn load_sequenced(&mut self, seq: u64, snapshot: Snapshot) -> bool {
        if seq < self.loaded_seq {
            return false;
        }
        self.loaded_seq = seq;
        self.load(snapshot);
        true
    }

    /// Shared read-only handle to the current snapshot.
    pub fn get(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn loaded_seq(&self) -> u64 {
        self.loaded_seq
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}
