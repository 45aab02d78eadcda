//! # Refuge Engine
//!
//! Entity lifecycle and behavior simulation for a small ecological scene:
//! trees, bushes and grass on a ground plane, hares that patrol and graze,
//! and hawks that circle overhead.
//!
//! ## Features
//!
//! - **Scene Registry**: single owner of every entity, driving the per-frame tick
//! - **Proximity Bus**: hawks broadcast their position, hares react synchronously
//! - **Animation Chains**: segment sequencing with mid-flight redirection
//! - **Population Sync**: entity counts follow an external bridge
//! - **Picking**: ray hit tests with hover highlight and selection colors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use refuge_engine::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let config = SimulationConfig::default();
//!     let mut registry = SceneRegistry::new(config);
//!     registry.populate_scenery()?;
//!     registry.reconcile_count(EntityKind::Hare, 4)?;
//!     registry.reconcile_count(EntityKind::Hawk, 1)?;
//!
//!     let mut timer = FrameTimer::new();
//!     for _ in 0..60 {
//!         let elapsed = timer.advance(1.0 / 60.0);
//!         registry.tick(elapsed);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod physics;
pub mod spatial;
pub mod animation;
pub mod events;
pub mod scene;
pub mod behavior;
pub mod factory;
pub mod population;
pub mod input;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{AnimationChain, ChainMode, MotionSegment},
        behavior::{Behavior, PredatorBehavior, PreyBehavior, PreyMode},
        config::{Config, ConfigError, SimulationConfig},
        events::{EventType, ProximityBus, SceneEvent},
        factory::{EntityConfig, EntityFactory, FactoryError},
        foundation::{
            math::{Color, Vec3},
            time::{DayClock, FrameTimer, SimulatedClock},
        },
        input::{PickCamera, PointerState},
        physics::Ray,
        population::{GrowthRule, MemoryBridge, PopulationBridge, PopulationSync},
        scene::{EntityId, EntityKind, SceneError, SceneRegistry, SceneResult},
    };
}
