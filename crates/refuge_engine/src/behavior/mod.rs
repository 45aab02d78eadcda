//! Per-entity behaviors
//!
//! A [`Behavior`] is driven by the registry once per tick through
//! [`Behavior::update`] and, for collidable entities, once more through
//! [`Behavior::handle_collision`] after positions have been refreshed.
//! Which of the two the registry calls is decided by the entity's declared
//! [`Capabilities`](crate::scene::Capabilities).

pub mod predator;
pub mod prey;

use std::any::Any;

use thiserror::Error;

use crate::events::ProximityBus;
use crate::foundation::math::Vec3;
use crate::scene::{CommandQueue, EntityId, EntityKind};
use crate::spatial::{CollisionHit, SpatialIndex};

pub use predator::PredatorBehavior;
pub use prey::{PreyBehavior, PreyMode};

/// Behavior errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    /// No live entity of the wanted kind to move towards
    #[error("no {kind} available as a target")]
    EmptyTargetSet {
        /// Kind that was searched for
        kind: EntityKind,
    },
}

/// Everything a behavior may see and touch during one call
pub struct UpdateContext<'a> {
    /// Entity being updated
    pub entity: EntityId,

    /// Total simulation time in seconds
    pub elapsed: f32,

    /// Seconds since the previous tick
    pub delta: f32,

    /// Entity position; written back to the visual after the call
    pub position: Vec3,

    /// Positions of every indexed entity as of the start of the pass
    pub spatial: &'a SpatialIndex,

    /// Predator position broadcast
    pub proximity: &'a ProximityBus,

    /// Deferred removals
    pub commands: &'a mut CommandQueue,
}

/// Logic attached to an entity
pub trait Behavior {
    /// Advance one tick
    fn update(&mut self, ctx: &mut UpdateContext<'_>);

    /// React to overlapping entities
    fn handle_collision(&mut self, ctx: &mut UpdateContext<'_>, hits: &[CollisionHit]) {
        let _ = (ctx, hits);
    }

    /// Short state label for diagnostics and info popups
    fn label(&self) -> &'static str;

    /// Downcast support
    fn as_any(&self) -> &dyn Any;
}
