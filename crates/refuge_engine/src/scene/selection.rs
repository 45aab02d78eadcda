//! Selection and hover state
//!
//! Tracks which entities are selected and which one is under the pointer.
//! Colors are applied by the registry from this state, see
//! [`ColorStates::resolve`](crate::scene::ColorStates::resolve).

use std::collections::HashSet;

use crate::scene::entity::EntityId;

/// Selected entities plus the hovered one
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    /// Currently selected entities
    selected_entities: HashSet<EntityId>,

    /// Entity under the pointer
    hovered_entity: Option<EntityId>,
}

impl SelectionSet {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership; returns the membership after the toggle
    pub fn toggle(&mut self, entity: EntityId) -> bool {
        if self.selected_entities.remove(&entity) {
            false
        } else {
            self.selected_entities.insert(entity);
            true
        }
    }

    /// True when the entity is selected
    pub fn contains(&self, entity: EntityId) -> bool {
        self.selected_entities.contains(&entity)
    }

    /// True when the entity is hovered
    pub fn is_hovered(&self, entity: EntityId) -> bool {
        self.hovered_entity == Some(entity)
    }

    /// Entity under the pointer
    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered_entity
    }

    /// Replace the hovered entity, returning the previous one
    pub fn set_hovered(&mut self, entity: Option<EntityId>) -> Option<EntityId> {
        std::mem::replace(&mut self.hovered_entity, entity)
    }

    /// Drop every trace of an entity that left the scene
    pub fn forget(&mut self, entity: EntityId) {
        self.selected_entities.remove(&entity);
        if self.hovered_entity == Some(entity) {
            self.hovered_entity = None;
        }
    }

    /// Selected entities, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.selected_entities.iter().copied()
    }

    /// Number of selected entities
    pub fn len(&self) -> usize {
        self.selected_entities.len()
    }

    /// True when nothing is selected
    pub fn is_empty(&self) -> bool {
        self.selected_entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(count: usize) -> Vec<EntityId> {
        let mut keys: SlotMap<EntityId, ()> = SlotMap::with_key();
        (0..count).map(|_| keys.insert(())).collect()
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let id = ids(1)[0];
        let mut selection = SelectionSet::new();

        assert!(selection.toggle(id));
        assert!(selection.contains(id));
        assert!(!selection.toggle(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_hover_replacement() {
        let ids = ids(2);
        let mut selection = SelectionSet::new();

        assert_eq!(selection.set_hovered(Some(ids[0])), None);
        assert_eq!(selection.set_hovered(Some(ids[1])), Some(ids[0]));
        assert!(selection.is_hovered(ids[1]));
    }

    #[test]
    fn test_forget_clears_both() {
        let ids = ids(2);
        let mut selection = SelectionSet::new();
        selection.toggle(ids[0]);
        selection.toggle(ids[1]);
        selection.set_hovered(Some(ids[0]));

        selection.forget(ids[0]);

        assert!(!selection.contains(ids[0]));
        assert_eq!(selection.hovered(), None);
        assert_eq!(selection.len(), 1);
    }
}
