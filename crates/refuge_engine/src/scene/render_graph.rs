//! Boundary to the external scene graph
//!
//! The registry attaches a visual when an entity joins, detaches it in the
//! same call that removes the entity, and pushes position or color changes
//! through `sync`. Nothing here rasterizes.

use std::collections::HashMap;

use crate::scene::entity::EntityId;
use crate::scene::visual::Visual;

/// External scene graph the registry mirrors its visuals into
pub trait RenderGraph {
    /// Add a visual
    fn attach(&mut self, entity: EntityId, visual: &Visual);

    /// Remove a visual; unknown ids are ignored
    fn detach(&mut self, entity: EntityId);

    /// Refresh transform and color of an attached visual
    fn sync(&mut self, entity: EntityId, visual: &Visual);

    /// True when the entity's visual is attached
    fn is_attached(&self, entity: EntityId) -> bool;

    /// Number of attached visuals
    fn attached_count(&self) -> usize;
}

/// In-memory render graph keeping a copy of every attached visual
#[derive(Debug, Default)]
pub struct VisualList {
    visuals: HashMap<EntityId, Visual>,
}

impl VisualList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Attached copy of an entity's visual
    pub fn get(&self, entity: EntityId) -> Option<&Visual> {
        self.visuals.get(&entity)
    }
}

impl RenderGraph for VisualList {
    fn attach(&mut self, entity: EntityId, visual: &Visual) {
        self.visuals.insert(entity, visual.clone());
    }

    fn detach(&mut self, entity: EntityId) {
        self.visuals.remove(&entity);
    }

    fn sync(&mut self, entity: EntityId, visual: &Visual) {
        if let Some(attached) = self.visuals.get_mut(&entity) {
            attached.transform = visual.transform.clone();
            attached.color = visual.color;
        }
    }

    fn is_attached(&self, entity: EntityId) -> bool {
        self.visuals.contains_key(&entity)
    }

    fn attached_count(&self) -> usize {
        self.visuals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Color, Vec3};
    use slotmap::SlotMap;

    #[test]
    fn test_attach_sync_detach() {
        let mut keys: SlotMap<EntityId, ()> = SlotMap::with_key();
        let id = keys.insert(());
        let mut graph = VisualList::new();

        graph.attach(id, &Visual::new("hare"));
        assert!(graph.is_attached(id));

        let moved = Visual::new("hare")
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_color(Color::BLACK);
        graph.sync(id, &moved);
        assert_eq!(graph.get(id).unwrap().position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(graph.get(id).unwrap().color, Color::BLACK);

        graph.detach(id);
        graph.detach(id);
        assert_eq!(graph.attached_count(), 0);
    }
}
