//! Hare behavior: patrol, flee to the nearest tree, graze
//!
//! The hare patrols a fixed three-leg loop around its spawn point. Every
//! hawk position published on the [`ProximityBus`] is checked immediately,
//! inside the publish call. A hawk closer than the flee threshold sends the
//! hare to the nearest tree: the active patrol leg is redirected there and
//! the loop picks up again after arrival.
//!
//! Grazing runs on its own timer and does not care whether the hare is
//! fleeing.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, warn};

use super::{Behavior, BehaviorError, UpdateContext};
use crate::animation::{AnimationChain, MotionSegment};
use crate::config::PreyConfig;
use crate::events::{ProximityBus, Subscription};
use crate::foundation::math::{distance, Vec3};
use crate::scene::{EntityId, EntityKind};
use crate::spatial::{CollisionHit, SpatialIndex};

/// Patrol waypoints as (dx, absolute y, dz) from the spawn point
const PATROL_OFFSETS: [(f32, f32, f32); 3] = [
    (5.0, 10.0, 5.0),
    (10.0, 0.0, 15.0),
    (25.0, 10.0, 25.0),
];

/// Hare state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreyMode {
    /// Looping the patrol route
    Patrol,
    /// Running to a tree
    Fleeing {
        /// Tree chosen as refuge
        refuge: EntityId,
        /// Where the tree stood when chosen
        target: Vec3,
    },
}

/// Shared between the behavior and its bus callback
#[derive(Debug)]
struct PreyState {
    mode: PreyMode,
    chain: AnimationChain,
    /// `completed_legs` of the chain when the flight started
    flee_marker: u64,
    flee_count: u32,
    state_time: f32,
}

impl PreyState {
    fn set_mode(&mut self, mode: PreyMode) {
        if self.mode != mode {
            self.mode = mode;
            self.state_time = 0.0;
        }
    }

    fn react_to_threat(&mut self, threat: Vec3, spatial: &SpatialIndex, config: &PreyConfig) {
        if matches!(self.mode, PreyMode::Fleeing { .. }) {
            return;
        }

        let here = self.chain.position();
        if distance(&here, &threat) >= config.flee_threshold {
            return;
        }

        match find_refuge(spatial, here) {
            Ok((refuge, target)) => {
                self.chain.redirect(target, config.flee_duration);
                self.flee_marker = self.chain.completed_legs();
                self.flee_count += 1;
                self.set_mode(PreyMode::Fleeing { refuge, target });
                debug!("hare at {here:?} flees to tree at {target:?}");
            }
            Err(err) => {
                // Nothing to run to; keep the current motion
                debug!("hare at {here:?} holds position: {err}");
            }
        }
    }
}

/// Nearest tree to `from`
pub fn find_refuge(spatial: &SpatialIndex, from: Vec3) -> Result<(EntityId, Vec3), BehaviorError> {
    spatial
        .nearest_of_kind(EntityKind::Tree, from)
        .ok_or(BehaviorError::EmptyTargetSet { kind: EntityKind::Tree })
}

/// Prey behavior for hares
pub struct PreyBehavior {
    state: Rc<RefCell<PreyState>>,
    config: PreyConfig,
    since_graze: f32,
    grazed: u32,
    _subscription: Subscription,
}

impl PreyBehavior {
    /// Create a patrolling hare at `origin` listening on `bus`
    ///
    /// `spatial` is consulted from inside the bus callback to pick a refuge.
    pub fn new(
        origin: Vec3,
        config: PreyConfig,
        bus: &ProximityBus,
        spatial: &Rc<RefCell<SpatialIndex>>,
    ) -> Self {
        let chain = AnimationChain::cyclic(origin, Self::patrol_route(origin, config.patrol_leg_duration));
        let state = Rc::new(RefCell::new(PreyState {
            mode: PreyMode::Patrol,
            chain,
            flee_marker: 0,
            flee_count: 0,
            state_time: 0.0,
        }));

        let subscription = bus.subscribe(Self::threat_listener(
            Rc::downgrade(&state),
            Rc::downgrade(spatial),
            config,
        ));

        Self {
            state,
            config,
            since_graze: 0.0,
            grazed: 0,
            _subscription: subscription,
        }
    }

    /// Patrol loop around `origin`
    pub fn patrol_route(origin: Vec3, leg_duration: f32) -> Vec<MotionSegment> {
        PATROL_OFFSETS
            .iter()
            .map(|&(dx, y, dz)| MotionSegment::new(Vec3::new(origin.x + dx, y, origin.z + dz), leg_duration))
            .collect()
    }

    fn threat_listener(
        state: Weak<RefCell<PreyState>>,
        spatial: Weak<RefCell<SpatialIndex>>,
        config: PreyConfig,
    ) -> impl FnMut(Vec3) + 'static {
        move |threat| {
            // Owner gone: the handle is about to be dropped
            let (Some(owner), Some(index)) = (state.upgrade(), spatial.upgrade()) else {
                return;
            };
            let (Ok(mut state), Ok(spatial)) = (owner.try_borrow_mut(), index.try_borrow()) else {
                warn!("hare state busy, threat at {threat:?} ignored");
                return;
            };
            state.react_to_threat(threat, &spatial, &config);
        }
    }

    /// Current state
    pub fn mode(&self) -> PreyMode {
        self.state.borrow().mode
    }

    /// True while running to a tree
    pub fn is_fleeing(&self) -> bool {
        matches!(self.mode(), PreyMode::Fleeing { .. })
    }

    /// Number of flights started
    pub fn flee_count(&self) -> u32 {
        self.state.borrow().flee_count
    }

    /// Seconds spent in the current state
    pub fn time_in_state(&self) -> f32 {
        self.state.borrow().state_time
    }

    /// Destination of the active animation leg
    pub fn chain_target(&self) -> Option<Vec3> {
        self.state.borrow().chain.current_target()
    }

    /// Current position along the chain
    pub fn position(&self) -> Vec3 {
        self.state.borrow().chain.position()
    }

    /// Grass tufts this hare asked to eat
    pub fn grazed(&self) -> u32 {
        self.grazed
    }

    fn graze(&mut self, ctx: &mut UpdateContext<'_>) {
        self.since_graze += ctx.delta;
        if self.since_graze < self.config.graze_interval {
            return;
        }
        self.since_graze = 0.0;

        for grass in ctx.spatial.within_radius(EntityKind::Grass, ctx.position, self.config.graze_radius) {
            ctx.commands.remove(grass);
            self.grazed += 1;
        }
    }
}

impl Behavior for PreyBehavior {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        {
            let mut state = self.state.borrow_mut();
            state.state_time += ctx.delta;
            state.chain.step(ctx.delta);

            if matches!(state.mode, PreyMode::Fleeing { .. }) && state.chain.completed_legs() > state.flee_marker {
                debug!("hare reached refuge, resuming patrol");
                state.set_mode(PreyMode::Patrol);
            }
            ctx.position = state.chain.position();
        }

        self.graze(ctx);
    }

    fn handle_collision(&mut self, ctx: &mut UpdateContext<'_>, hits: &[CollisionHit]) {
        for hit in hits.iter().filter(|hit| hit.kind == EntityKind::Grass) {
            ctx.commands.remove(hit.entity);
        }
    }

    fn label(&self) -> &'static str {
        match self.mode() {
            PreyMode::Patrol => "patrol",
            PreyMode::Fleeing { .. } => "fleeing",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
