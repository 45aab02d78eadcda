//! # Scene Registry
//!
//! Single owner of every live entity. The registry drives the per-frame
//! tick, mirrors visuals into the render graph, answers pointer rays with
//! hit tests, keeps selection colors consistent and reconciles population
//! counts against external targets.
//!
//! ## Tick order
//!
//! 1. `update` on every updatable entity, in live-list order. Hawks publish
//!    on the proximity bus from inside their update and hares react before
//!    the publish returns.
//! 2. Moved positions are pushed to the spatial index and render graph.
//! 3. `handle_collision` on every collidable entity that overlaps something.
//! 4. Queued removals are applied. An entity requested twice is removed once.
//! 5. Scene events are dispatched.
//!
//! The live list is never mutated while it is being walked.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;

use log::{debug, info};
use slotmap::SlotMap;

use crate::behavior::UpdateContext;
use crate::config::SimulationConfig;
use crate::events::{EventSystem, ProximityBus, SceneEvent};
use crate::factory::{EntityConfig, EntityFactory, FactoryError, SpawnContext};
use crate::foundation::math::Vec3;
use crate::physics::{Ray, RayHit};
use crate::scene::commands::CommandQueue;
use crate::scene::entity::{Capabilities, Entity, EntityId, EntityKind, Timestamp};
use crate::scene::render_graph::{RenderGraph, VisualList};
use crate::scene::selection::SelectionSet;
use crate::scene::SceneResult;
use crate::spatial::{SpatialIndex, SpatialRandomizer};

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Entities whose `update` ran
    pub updated: usize,

    /// Contacts delivered to collision handlers
    pub collisions: usize,

    /// Entities removed at end of tick
    pub removed: usize,
}

/// Outcome of a count reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Kind reconciled
    pub kind: Option<EntityKind>,

    /// Entities built to cover a deficit
    pub created: usize,

    /// Entities removed to cut an excess
    pub removed: usize,

    /// Live count afterwards
    pub count: usize,
}

impl ReconcileReport {
    /// True when nothing had to change
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.removed == 0
    }
}

/// Authoritative owner of all scene entities
pub struct SceneRegistry {
    config: SimulationConfig,
    entities: SlotMap<EntityId, Entity>,
    /// Live-list order; update order follows it
    order: Vec<EntityId>,
    render_graph: Box<dyn RenderGraph>,
    selection: SelectionSet,
    proximity: ProximityBus,
    spatial: Rc<RefCell<SpatialIndex>>,
    factory: EntityFactory,
    randomizer: SpatialRandomizer,
    events: EventSystem,
    elapsed: f32,
    next_sequence: u64,
}

impl SceneRegistry {
    /// Create a registry backed by an in-memory render graph
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_render_graph(config, Box::new(VisualList::new()))
    }

    /// Create a registry mirroring visuals into `render_graph`
    pub fn with_render_graph(config: SimulationConfig, render_graph: Box<dyn RenderGraph>) -> Self {
        let randomizer = SpatialRandomizer::new(config.seed);
        Self {
            config,
            entities: SlotMap::with_key(),
            order: Vec::new(),
            render_graph,
            selection: SelectionSet::new(),
            proximity: ProximityBus::new(),
            spatial: Rc::new(RefCell::new(SpatialIndex::new())),
            factory: EntityFactory::with_default_kinds(),
            randomizer,
            events: EventSystem::new(),
            elapsed: 0.0,
            next_sequence: 0,
        }
    }

    /// Builder: replace the entity factory
    pub fn with_factory(mut self, factory: EntityFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Creation stamp for a new entity
    pub fn next_timestamp(&mut self) -> Timestamp {
        self.next_sequence += 1;
        Timestamp {
            elapsed: self.elapsed,
            sequence: self.next_sequence,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Append an entity to the live list and attach its visual
    ///
    /// The caller must not add the same entity twice.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let kind = entity.kind;
        let id = self.entities.insert(entity);
        self.order.push(id);

        let entity = &self.entities[id];
        self.render_graph.attach(id, &entity.visual);
        if let Some(radius) = entity.visual.bounds {
            self.spatial
                .borrow_mut()
                .insert(id, kind, entity.visual.position(), radius);
        }

        debug!("added {} {:?} at {:?}", kind, id, entity.visual.position());
        self.events.send(SceneEvent::Spawned { entity: id, kind });
        id
    }

    /// Build an entity from a kind tag and add it
    pub fn spawn(&mut self, tag: &str, config: &EntityConfig) -> SceneResult<EntityId> {
        let kind = tag.parse::<EntityKind>().map_err(FactoryError::from)?;
        self.spawn_kind(kind, config)
    }

    /// Build an entity of `kind` and add it
    pub fn spawn_kind(&mut self, kind: EntityKind, config: &EntityConfig) -> SceneResult<EntityId> {
        let created_at = self.next_timestamp();
        let mut ctx = SpawnContext {
            created_at,
            config: &self.config,
            randomizer: &mut self.randomizer,
            proximity: &self.proximity,
            spatial: &self.spatial,
        };
        let entity = self.factory.make_kind(kind, config, &mut ctx)?;
        Ok(self.add_entity(entity))
    }

    /// Remove an entity and detach its visual
    ///
    /// Returns false and changes nothing if the entity is not live.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.remove(id) else {
            return false;
        };

        self.order.retain(|live| *live != id);
        self.render_graph.detach(id);
        self.spatial.borrow_mut().remove(id);
        self.selection.forget(id);

        debug!("removed {} {:?}", entity.kind, id);
        self.events.send(SceneEvent::Removed { entity: id, kind: entity.kind });
        // Dropping the entity releases its bus subscription
        drop(entity);
        true
    }

    /// Remove every entity of `kind`, returning how many went
    pub fn remove_all_of_kind(&mut self, kind: EntityKind) -> usize {
        let doomed = self.ids_of_kind(kind);
        let removed = doomed.into_iter().filter(|id| self.remove_entity(*id)).count();
        self.events.dispatch();
        removed
    }

    /// Remove the most recently created entity of `kind`
    ///
    /// Ties on the creation stamp resolve arbitrarily.
    pub fn remove_most_recent_of_kind(&mut self, kind: EntityKind) -> Option<EntityId> {
        let newest = self
            .iter()
            .filter(|(_, entity)| entity.kind == kind)
            .max_by(|(_, a), (_, b)| {
                a.created_at
                    .partial_cmp(&b.created_at)
                    .unwrap_or(Ordering::Equal)
            })
            .map(|(id, _)| id)?;
        self.remove_entity(newest);
        Some(newest)
    }

    /// Remove every selected entity
    pub fn remove_selected(&mut self) -> usize {
        let doomed: Vec<EntityId> = self.selection.iter().collect();
        let removed = doomed.into_iter().filter(|id| self.remove_entity(*id)).count();
        self.events.dispatch();
        removed
    }

    /// Bring the live count of `kind` to `target`
    ///
    /// Excess entities go newest first; a deficit is built by the factory.
    /// A second call with the same target changes nothing.
    pub fn reconcile_count(&mut self, kind: EntityKind, target: usize) -> SceneResult<ReconcileReport> {
        let current = self.count_of_kind(kind);
        let mut report = ReconcileReport {
            kind: Some(kind),
            ..ReconcileReport::default()
        };

        match current.cmp(&target) {
            Ordering::Greater => {
                for _ in target..current {
                    if self.remove_most_recent_of_kind(kind).is_some() {
                        report.removed += 1;
                    }
                }
            }
            Ordering::Less => {
                for _ in current..target {
                    self.spawn_kind(kind, &EntityConfig::default())?;
                    report.created += 1;
                }
            }
            Ordering::Equal => {}
        }

        report.count = self.count_of_kind(kind);
        if !report.is_noop() {
            info!(
                "reconciled {}: {} -> {} (+{} -{})",
                kind, current, report.count, report.created, report.removed
            );
        }
        self.events.dispatch();
        Ok(report)
    }

    /// Add the ground, the two lights and the grass field
    pub fn populate_scenery(&mut self) -> SceneResult<()> {
        self.spawn_kind(EntityKind::Terrain, &EntityConfig::default())?;
        // Ambient and directional
        self.spawn_kind(EntityKind::Light, &EntityConfig::default())?;
        self.spawn_kind(EntityKind::Light, &EntityConfig::at(Vec3::new(0.0, 100.0, 50.0)))?;

        let grass = self.config.initial.grass as usize;
        for _ in 0..grass {
            self.spawn_kind(EntityKind::Grass, &EntityConfig::default())?;
        }
        info!("scenery ready: {} entities", self.len());
        self.events.dispatch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Advance the simulation to `elapsed` seconds
    pub fn tick(&mut self, elapsed: f32) -> TickSummary {
        let delta = (elapsed - self.elapsed).max(0.0);
        self.elapsed = self.elapsed.max(elapsed);

        let order = self.order.clone();
        let mut commands = CommandQueue::new();
        let mut summary = TickSummary::default();
        let mut moved: Vec<EntityId> = Vec::new();

        // Update pass
        {
            let spatial = self.spatial.borrow();
            for &id in &order {
                let Some(entity) = self.entities.get_mut(id) else {
                    continue;
                };
                if !entity.has(Capabilities::UPDATABLE) {
                    continue;
                }
                let position = entity.visual.position();
                let Some(behavior) = entity.behavior_mut() else {
                    continue;
                };

                let mut ctx = UpdateContext {
                    entity: id,
                    elapsed,
                    delta,
                    position,
                    spatial: &spatial,
                    proximity: &self.proximity,
                    commands: &mut commands,
                };
                behavior.update(&mut ctx);
                let updated_position = ctx.position;

                if updated_position != position {
                    entity.visual.set_position(updated_position);
                    moved.push(id);
                }
                summary.updated += 1;
            }
        }

        self.sync_moved(&moved);

        // Collision pass
        {
            let spatial = self.spatial.borrow();
            for &id in &order {
                let Some(entity) = self.entities.get_mut(id) else {
                    continue;
                };
                if !entity.has(Capabilities::COLLIDABLE) {
                    continue;
                }
                let Some(sphere) = entity.visual.bounding_sphere() else {
                    continue;
                };
                let hits = spatial.overlapping(&sphere, id);
                if hits.is_empty() {
                    continue;
                }
                let Some(behavior) = entity.behavior_mut() else {
                    continue;
                };

                let mut ctx = UpdateContext {
                    entity: id,
                    elapsed,
                    delta,
                    position: sphere.center,
                    spatial: &spatial,
                    proximity: &self.proximity,
                    commands: &mut commands,
                };
                behavior.handle_collision(&mut ctx, &hits);
                summary.collisions += hits.len();
            }
        }

        // Deferred removals
        for id in commands.take_removals() {
            if self.remove_entity(id) {
                summary.removed += 1;
            }
        }

        self.events.dispatch();
        summary
    }

    fn sync_moved(&mut self, moved: &[EntityId]) {
        let mut spatial = self.spatial.borrow_mut();
        for &id in moved {
            if let Some(entity) = self.entities.get(id) {
                spatial.set_position(id, entity.visual.position());
                self.render_graph.sync(id, &entity.visual);
            }
        }
    }

    // ------------------------------------------------------------------
    // Picking
    // ------------------------------------------------------------------

    /// Nearest entity intersected by `ray`
    pub fn hit_test(&self, ray: &Ray) -> Option<RayHit> {
        self.hit_test_all(ray).into_iter().next()
    }

    /// Every entity intersected by `ray`, nearest first
    pub fn hit_test_all(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .iter()
            .filter(|(id, _)| self.render_graph.is_attached(*id))
            .filter_map(|(id, entity)| {
                let sphere = entity.visual.bounding_sphere()?;
                let (distance, point, normal) = sphere.intersect_ray(ray)?;
                Some(RayHit { entity: id, distance, point, normal })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
        hits
    }

    /// Pointer click: toggle selection of the nearest selectable hit
    ///
    /// Emits a describe event for a selectable hit and a multi-describe
    /// event when the ray crosses more than one entity.
    pub fn handle_click(&mut self, ray: &Ray) -> Option<RayHit> {
        let hits = self.hit_test_all(ray);
        let nearest = *hits.first()?;

        if hits.len() > 1 {
            let names = hits
                .iter()
                .filter_map(|hit| self.entities.get(hit.entity))
                .map(|entity| entity.visual.name.clone())
                .collect();
            self.events.send(SceneEvent::DescribeMany { names });
        }

        if self.toggle_selected(nearest.entity).is_some() {
            if let Some(entity) = self.entities.get(nearest.entity) {
                self.events.send(SceneEvent::Describe {
                    entity: nearest.entity,
                    name: entity.visual.name.clone(),
                });
            }
        }

        self.events.dispatch();
        Some(nearest)
    }

    /// Pointer move: highlight the hovered entity, restore the previous one
    pub fn handle_hover(&mut self, ray: &Ray) -> Option<EntityId> {
        let hovered = self.hit_test(ray).map(|hit| hit.entity);
        let previous = self.selection.set_hovered(hovered);

        if previous != hovered {
            if let Some(previous) = previous {
                self.apply_display_color(previous);
            }
            if let Some(hovered) = hovered {
                self.apply_display_color(hovered);
            }
        }
        hovered
    }

    /// Flip selection of a selectable entity
    ///
    /// Returns the membership after the toggle, or `None` when the entity is
    /// absent or not selectable.
    pub fn toggle_selected(&mut self, id: EntityId) -> Option<bool> {
        if !self.entities.get(id)?.is_selectable() {
            return None;
        }
        let selected = self.selection.toggle(id);
        self.apply_display_color(id);
        self.events.send(SceneEvent::SelectionChanged { entity: id, selected });
        Some(selected)
    }

    fn apply_display_color(&mut self, id: EntityId) {
        let selected = self.selection.contains(id);
        let hovered = self.selection.is_hovered(id);
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        if !entity.is_selectable() {
            return;
        }
        entity.visual.color = entity.colors.resolve(selected, hovered);
        self.render_graph.sync(id, &entity.visual);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Live entities in live-list order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.entities.get(*id).map(|entity| (*id, entity)))
    }

    /// Entity by id
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// True when the entity is live
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Ids of live entities of `kind`, in live-list order
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.iter()
            .filter(|(_, entity)| entity.kind == kind)
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of live entities of `kind`
    pub fn count_of_kind(&self, kind: EntityKind) -> usize {
        self.iter().filter(|(_, entity)| entity.kind == kind).count()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when the scene is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Selection state
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Predator position bus
    pub fn proximity_bus(&self) -> &ProximityBus {
        &self.proximity
    }

    /// External scene graph
    pub fn render_graph(&self) -> &dyn RenderGraph {
        self.render_graph.as_ref()
    }

    /// Scene events, for registering handlers
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Simulation tuning
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Latest elapsed time seen by `tick`
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
