//! Hawk behavior: circle a square circuit and broadcast position

use std::any::Any;

use super::{Behavior, UpdateContext};
use crate::animation::{AnimationChain, MotionSegment};
use crate::config::PredatorConfig;
use crate::foundation::math::Vec3;

/// Predator behavior for hawks
///
/// Publishes its position every tick whether or not anyone listens.
#[derive(Debug)]
pub struct PredatorBehavior {
    chain: AnimationChain,
    publishes: u64,
}

impl PredatorBehavior {
    /// Create a hawk circling `origin` at the height of `origin`
    pub fn new(origin: Vec3, config: &PredatorConfig) -> Self {
        let route = Self::circuit(origin, config.patrol_radius, config.leg_duration);
        Self {
            chain: AnimationChain::cyclic(origin, route),
            publishes: 0,
        }
    }

    /// Square circuit of half-width `radius` around `center`
    pub fn circuit(center: Vec3, radius: f32, leg_duration: f32) -> Vec<MotionSegment> {
        [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)]
            .iter()
            .map(|&(sx, sz)| {
                MotionSegment::new(
                    Vec3::new(center.x + sx * radius, center.y, center.z + sz * radius),
                    leg_duration,
                )
            })
            .collect()
    }

    /// Current position
    pub fn position(&self) -> Vec3 {
        self.chain.position()
    }

    /// Positions published so far
    pub fn publishes(&self) -> u64 {
        self.publishes
    }
}

impl Behavior for PredatorBehavior {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let position = self.chain.step(ctx.delta);
        ctx.position = position;
        ctx.proximity.publish(position);
        self.publishes += 1;
    }

    fn label(&self) -> &'static str {
        "hunting"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ProximityBus;
    use crate::scene::{CommandQueue, EntityId};
    use crate::spatial::SpatialIndex;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> PredatorConfig {
        PredatorConfig {
            altitude: 30.0,
            patrol_radius: 10.0,
            leg_duration: 1.0,
        }
    }

    #[test]
    fn test_circuit_corners() {
        let route = PredatorBehavior::circuit(Vec3::new(0.0, 30.0, 0.0), 10.0, 1.0);
        assert_eq!(route.len(), 4);
        assert_eq!(route[0].target, Vec3::new(10.0, 30.0, 10.0));
        assert_eq!(route[2].target, Vec3::new(-10.0, 30.0, -10.0));
    }

    #[test]
    fn test_publishes_every_update() {
        let bus = ProximityBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = bus.subscribe(move |position| sink.borrow_mut().push(position));

        let mut hawk = PredatorBehavior::new(Vec3::new(0.0, 30.0, 0.0), &config());
        let spatial = SpatialIndex::new();
        let mut commands = CommandQueue::new();

        for _ in 0..3 {
            let mut ctx = UpdateContext {
                entity: EntityId::default(),
                elapsed: 0.0,
                delta: 0.5,
                position: hawk.position(),
                spatial: &spatial,
                proximity: &bus,
                commands: &mut commands,
            };
            hawk.update(&mut ctx);
            assert_relative_eq!(ctx.position, hawk.position());
        }

        assert_eq!(hawk.publishes(), 3);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        // Half way along the first leg after 0.5s
        assert_relative_eq!(seen[0], Vec3::new(5.0, 30.0, 5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_publishes_without_listeners() {
        let bus = ProximityBus::new();
        let mut hawk = PredatorBehavior::new(Vec3::zeros(), &config());
        let spatial = SpatialIndex::new();
        let mut commands = CommandQueue::new();
        let mut ctx = UpdateContext {
            entity: EntityId::default(),
            elapsed: 0.0,
            delta: 0.1,
            position: Vec3::zeros(),
            spatial: &spatial,
            proximity: &bus,
            commands: &mut commands,
        };

        hawk.update(&mut ctx);
        assert_eq!(hawk.publishes(), 1);
        assert!(commands.is_empty());
    }
}
