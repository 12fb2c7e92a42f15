//! Node id allocation

use std::cell::Cell;

use crate::domain::entities::NodeId;

/// Monotonic id source for one editing session.
///
/// Shared by reference between decoding and editing. Ids are never reused,
/// even after the node holding one is deleted.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: Cell<u64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> NodeId {
        let id = self.next.get();
        self.next.set(id + 1);
        NodeId(id)
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> u64 {
        self.next.get()
    }
}
