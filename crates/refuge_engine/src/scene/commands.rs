//! Deferred scene mutations
//!
//! Behaviors run while the registry walks its live list, so they cannot
//! remove entities directly. They queue requests here and the registry
//! applies them once the pass is over. Duplicate requests are harmless:
//! removing an entity that is already gone is a no-op.

use crate::scene::entity::EntityId;

/// Mutations requested during a tick
#[derive(Debug, Default, Clone)]
pub struct CommandQueue {
    removals: Vec<EntityId>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Request removal of an entity at end of tick
    pub fn remove(&mut self, entity: EntityId) {
        self.removals.push(entity);
    }

    /// Number of queued requests, duplicates included
    pub fn len(&self) -> usize {
        self.removals.len()
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    /// Take every queued removal, leaving the queue empty
    pub fn take_removals(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.removals)
    }
}
