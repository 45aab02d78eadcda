//! Kind-aware proximity queries
//!
//! The registry mirrors every entity with bounds into a [`SpatialIndex`]:
//! its kind, position and radius, in insertion order. Behaviors query it for
//! the nearest refuge, for food in reach and for contacts. Iteration order is
//! insertion order, so "first found" ties are stable within a session but
//! carry no further meaning.

use crate::foundation::math::{distance, Vec3};
use crate::physics::BoundingSphere;
use crate::scene::{EntityId, EntityKind};

/// One indexed entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    /// Indexed entity
    pub entity: EntityId,
    /// Its kind
    pub kind: EntityKind,
    /// Last known position
    pub position: Vec3,
    /// Contact radius
    pub radius: f32,
}

/// Overlap found by a contact query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    /// Entity touched
    pub entity: EntityId,
    /// Its kind
    pub kind: EntityKind,
    /// Center-to-center distance
    pub distance: f32,
}

/// Flat spatial index of live entities
#[derive(Debug, Default, Clone)]
pub struct SpatialIndex {
    entries: Vec<IndexEntry>,
}

impl SpatialIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, replacing any previous entry for it
    pub fn insert(&mut self, entity: EntityId, kind: EntityKind, position: Vec3, radius: f32) {
        self.remove(entity);
        self.entries.push(IndexEntry { entity, kind, position, radius });
    }

    /// Remove an entity; returns false if it was not indexed
    pub fn remove(&mut self, entity: EntityId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.entity != entity);
        self.entries.len() != before
    }

    /// Update an entity's position
    pub fn set_position(&mut self, entity: EntityId, position: Vec3) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.entity == entity) {
            entry.position = position;
        }
    }

    /// Indexed data for an entity
    pub fn get(&self, entity: EntityId) -> Option<&IndexEntry> {
        self.entries.iter().find(|entry| entry.entity == entity)
    }

    /// Nearest entity of `kind` to `from`
    ///
    /// Strict comparison keeps the first candidate found on equal distances.
    pub fn nearest_of_kind(&self, kind: EntityKind, from: Vec3) -> Option<(EntityId, Vec3)> {
        let mut best: Option<(f32, &IndexEntry)> = None;
        for entry in self.entries.iter().filter(|entry| entry.kind == kind) {
            let d = distance(&entry.position, &from);
            if best.map_or(true, |(shortest, _)| d < shortest) {
                best = Some((d, entry));
            }
        }
        best.map(|(_, entry)| (entry.entity, entry.position))
    }

    /// Entities of `kind` whose position lies within `radius` of `center`
    pub fn within_radius(&self, kind: EntityKind, center: Vec3, radius: f32) -> Vec<EntityId> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == kind && distance(&entry.position, &center) <= radius)
            .map(|entry| entry.entity)
            .collect()
    }

    /// Entities whose contact sphere overlaps `sphere`, excluding `exclude`
    pub fn overlapping(&self, sphere: &BoundingSphere, exclude: EntityId) -> Vec<CollisionHit> {
        self.entries
            .iter()
            .filter(|entry| entry.entity != exclude)
            .filter(|entry| sphere.intersects(&BoundingSphere::new(entry.position, entry.radius)))
            .map(|entry| CollisionHit {
                entity: entry.entity,
                kind: entry.kind,
                distance: distance(&entry.position, &sphere.center),
            })
            .collect()
    }

    /// Number of indexed entities of `kind`
    pub fn count_of_kind(&self, kind: EntityKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    /// Number of indexed entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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
    fn test_nearest_of_kind() {
        let ids = ids(3);
        let mut index = SpatialIndex::new();
        index.insert(ids[0], EntityKind::Tree, Vec3::new(100.0, 0.0, 100.0), 10.0);
        index.insert(ids[1], EntityKind::Tree, Vec3::new(-50.0, 0.0, 50.0), 10.0);
        // Closer, but not a tree
        index.insert(ids[2], EntityKind::Bush, Vec3::new(1.0, 0.0, 1.0), 2.0);

        let (nearest, position) = index.nearest_of_kind(EntityKind::Tree, Vec3::zeros()).unwrap();
        assert_eq!(nearest, ids[1]);
        assert_eq!(position, Vec3::new(-50.0, 0.0, 50.0));
    }

    #[test]
    fn test_nearest_tie_keeps_first_found() {
        let ids = ids(2);
        let mut index = SpatialIndex::new();
        index.insert(ids[0], EntityKind::Tree, Vec3::new(10.0, 0.0, 0.0), 1.0);
        index.insert(ids[1], EntityKind::Tree, Vec3::new(-10.0, 0.0, 0.0), 1.0);

        let (nearest, _) = index.nearest_of_kind(EntityKind::Tree, Vec3::zeros()).unwrap();
        assert_eq!(nearest, ids[0]);
    }

    #[test]
    fn test_nearest_of_missing_kind() {
        let index = SpatialIndex::new();
        assert!(index.nearest_of_kind(EntityKind::Tree, Vec3::zeros()).is_none());
    }

    #[test]
    fn test_within_radius_filters_kind_and_distance() {
        let ids = ids(3);
        let mut index = SpatialIndex::new();
        index.insert(ids[0], EntityKind::Grass, Vec3::new(3.0, 0.0, 0.0), 1.0);
        index.insert(ids[1], EntityKind::Grass, Vec3::new(30.0, 0.0, 0.0), 1.0);
        index.insert(ids[2], EntityKind::Tree, Vec3::new(1.0, 0.0, 0.0), 1.0);

        let found = index.within_radius(EntityKind::Grass, Vec3::zeros(), 5.0);
        assert_eq!(found, vec![ids[0]]);
    }

    #[test]
    fn test_overlapping_excludes_self() {
        let ids = ids(3);
        let mut index = SpatialIndex::new();
        index.insert(ids[0], EntityKind::Hare, Vec3::zeros(), 6.0);
        index.insert(ids[1], EntityKind::Grass, Vec3::new(7.0, 0.0, 0.0), 1.5);
        index.insert(ids[2], EntityKind::Grass, Vec3::new(20.0, 0.0, 0.0), 1.5);

        let hits = index.overlapping(&BoundingSphere::new(Vec3::zeros(), 6.0), ids[0]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, ids[1]);
        assert_eq!(hits[0].kind, EntityKind::Grass);
    }

    #[test]
    fn test_insert_remove_and_move() {
        let ids = ids(1);
        let mut index = SpatialIndex::new();
        index.insert(ids[0], EntityKind::Hare, Vec3::zeros(), 6.0);
        index.insert(ids[0], EntityKind::Hare, Vec3::zeros(), 6.0);
        assert_eq!(index.len(), 1);

        index.set_position(ids[0], Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(index.get(ids[0]).unwrap().position.x, 4.0);

        assert!(index.remove(ids[0]));
        assert!(!index.remove(ids[0]));
        assert!(index.is_empty());
    }
}
