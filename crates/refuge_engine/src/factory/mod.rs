//! Entity construction
//!
//! The [`EntityFactory`] maps a kind to a constructor. Tags coming from
//! outside (configuration keys, UI requests) are parsed into an
//! [`EntityKind`] first; a tag that names no kind, or a kind without a
//! registered constructor, is a [`FactoryError::UnknownKind`] and nothing is
//! built.

mod builders;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::config::SimulationConfig;
use crate::events::ProximityBus;
use crate::foundation::math::{Color, Vec3};
use crate::scene::{Entity, EntityKind, Timestamp, UnknownKindError};
use crate::spatial::{SpatialIndex, SpatialRandomizer};

pub use builders::KindProfile;

/// Factory errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// Tag names no kind, or no constructor is registered for the kind
    #[error("unknown entity kind '{0}'")]
    UnknownKind(String),
}

impl From<UnknownKindError> for FactoryError {
    fn from(err: UnknownKindError) -> Self {
        Self::UnknownKind(err.0)
    }
}

/// Per-entity overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityConfig {
    /// Position; randomized within the ground bounds when absent
    pub position: Option<Vec3>,

    /// Resting color; the kind default when absent
    pub color: Option<Color>,
}

impl EntityConfig {
    /// Config placing the entity at `position`
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            color: None,
        }
    }

    /// Builder: color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Shared services a constructor may use
pub struct SpawnContext<'a> {
    /// Creation stamp for the new entity
    pub created_at: Timestamp,

    /// Simulation tuning
    pub config: &'a SimulationConfig,

    /// Placement source
    pub randomizer: &'a mut SpatialRandomizer,

    /// Bus hares subscribe to
    pub proximity: &'a ProximityBus,

    /// Index hares search for refuges
    pub spatial: &'a Rc<RefCell<SpatialIndex>>,
}

/// Builds an entity of one kind
pub type Constructor = Box<dyn Fn(&EntityConfig, &mut SpawnContext<'_>) -> Entity>;

/// Kind-to-constructor table
#[derive(Default)]
pub struct EntityFactory {
    constructors: HashMap<EntityKind, Constructor>,
}

impl EntityFactory {
    /// Create a factory with no constructors
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory that can build every kind
    pub fn with_default_kinds() -> Self {
        let mut factory = Self::new();
        for kind in EntityKind::ALL {
            factory.register(kind, Box::new(move |config: &EntityConfig, ctx: &mut SpawnContext<'_>| {
                builders::build(kind, config, ctx)
            }));
        }
        factory
    }

    /// Register or replace the constructor for `kind`
    pub fn register(&mut self, kind: EntityKind, constructor: Constructor) {
        self.constructors.insert(kind, constructor);
    }

    /// True when `kind` can be built
    pub fn supports(&self, kind: EntityKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Build an entity from a textual kind tag
    pub fn make_entity(
        &self,
        tag: &str,
        config: &EntityConfig,
        ctx: &mut SpawnContext<'_>,
    ) -> Result<Entity, FactoryError> {
        let kind: EntityKind = tag.parse()?;
        self.make_kind(kind, config, ctx)
    }

    /// Build an entity of `kind`
    pub fn make_kind(
        &self,
        kind: EntityKind,
        config: &EntityConfig,
        ctx: &mut SpawnContext<'_>,
    ) -> Result<Entity, FactoryError> {
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| FactoryError::UnknownKind(kind.to_string()))?;
        Ok(constructor(config, ctx))
    }
}
