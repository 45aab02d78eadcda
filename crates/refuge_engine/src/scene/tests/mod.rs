//! Scenario tests driving a whole registry

mod interaction;

use crate::behavior::PreyBehavior;
use crate::config::SimulationConfig;
use crate::factory::EntityConfig;
use crate::foundation::math::Vec3;
use crate::scene::{EntityId, EntityKind, SceneRegistry};

/// Registry with a fixed placement seed
fn registry() -> SceneRegistry {
    crate::foundation::logging::init_for_tests();
    SceneRegistry::new(SimulationConfig::default().with_seed(42))
}

fn spawn_at(registry: &mut SceneRegistry, kind: EntityKind, x: f32, y: f32, z: f32) -> EntityId {
    registry
        .spawn_kind(kind, &EntityConfig::at(Vec3::new(x, y, z)))
        .unwrap()
}

fn prey(registry: &SceneRegistry, id: EntityId) -> &PreyBehavior {
    registry
        .get(id)
        .and_then(|entity| entity.behavior_as::<PreyBehavior>())
        .unwrap()
}
