//! Chained position interpolation
//!
//! An [`AnimationChain`] is a fixed list of immutable [`MotionSegment`]s and
//! a cursor. The active leg interpolates linearly from the position it was
//! activated at towards its segment's target. When a leg completes the
//! position snaps to its end and the next segment starts in the same step,
//! carrying the leftover time (zero-gap splice). Cyclic chains wrap back to
//! the first segment and run until redirected.
//!
//! [`AnimationChain::redirect`] swaps the destination and duration of the
//! active leg only. The cursor is untouched, so once the detour completes the
//! chain continues with the segment that would have followed.

use crate::foundation::math::Vec3;

/// One timed move towards a fixed target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSegment {
    /// Destination of the move
    pub target: Vec3,

    /// Seconds the move takes
    pub duration: f32,
}

impl MotionSegment {
    /// Create a segment
    pub fn new(target: Vec3, duration: f32) -> Self {
        Self {
            target,
            duration: duration.max(0.0),
        }
    }
}

/// What happens after the last segment completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainMode {
    /// Stop after the last segment
    Once,
    /// Wrap back to the first segment
    Cyclic,
}

/// The leg currently being interpolated
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveLeg {
    start: Vec3,
    end: Vec3,
    duration: f32,
    elapsed: f32,
    /// Segment whose successor runs next; `None` for a detour on an idle chain
    segment: Option<usize>,
}

impl ActiveLeg {
    fn position(&self) -> Vec3 {
        if self.duration <= 0.0 {
            return self.end;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start.lerp(&self.end, t)
    }
}

/// Sequencer driving an entity's position through a list of segments
#[derive(Debug, Clone)]
pub struct AnimationChain {
    segments: Vec<MotionSegment>,
    mode: ChainMode,
    active: Option<ActiveLeg>,
    position: Vec3,
    completed_legs: u64,
}

impl AnimationChain {
    /// Create an idle chain at `origin`; call [`start`](Self::start) to run it
    pub fn new(origin: Vec3, segments: Vec<MotionSegment>, mode: ChainMode) -> Self {
        Self {
            segments,
            mode,
            active: None,
            position: origin,
            completed_legs: 0,
        }
    }

    /// Create a cyclic chain that is already running
    pub fn cyclic(origin: Vec3, segments: Vec<MotionSegment>) -> Self {
        let mut chain = Self::new(origin, segments, ChainMode::Cyclic);
        chain.start();
        chain
    }

    /// Activate the first segment from the current position
    ///
    /// Returns false when there is nothing to run.
    pub fn start(&mut self) -> bool {
        self.activate(0)
    }

    /// Advance by `delta` seconds and return the new position
    pub fn step(&mut self, delta: f32) -> Vec3 {
        let mut remaining = delta.max(0.0);
        // Bound splices per step so a cycle of zero-length legs cannot spin
        let mut splices_left = self.segments.len() + 1;

        while let Some(mut leg) = self.active {
            let left = leg.duration - leg.elapsed;
            if remaining < left {
                leg.elapsed += remaining;
                self.position = leg.position();
                self.active = Some(leg);
                break;
            }

            remaining -= left.max(0.0);
            self.position = leg.end;
            self.completed_legs += 1;
            self.active = None;

            if let Some(next) = leg.segment.and_then(|index| self.successor(index)) {
                self.activate(next);
            }

            if splices_left == 0 {
                break;
            }
            splices_left -= 1;
        }

        self.position
    }

    /// Point the active leg at `target`, arriving after `duration` seconds
    ///
    /// The leg restarts from the current position. An idle chain gets a
    /// single detour leg and goes idle again on arrival.
    pub fn redirect(&mut self, target: Vec3, duration: f32) {
        let segment = self.active.and_then(|leg| leg.segment);
        self.active = Some(ActiveLeg {
            start: self.position,
            end: target,
            duration: duration.max(0.0),
            elapsed: 0.0,
            segment,
        });
    }

    /// Current interpolated position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// True while a leg is interpolating
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Destination of the active leg
    pub fn current_target(&self) -> Option<Vec3> {
        self.active.map(|leg| leg.end)
    }

    /// Index of the segment the active leg belongs to
    pub fn active_segment(&self) -> Option<usize> {
        self.active.and_then(|leg| leg.segment)
    }

    /// Number of legs finished since creation, detours included
    pub fn completed_legs(&self) -> u64 {
        self.completed_legs
    }

    /// Completion mode
    pub fn mode(&self) -> ChainMode {
        self.mode
    }

    /// The immutable segment list
    pub fn segments(&self) -> &[MotionSegment] {
        &self.segments
    }

    fn successor(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        match self.mode {
            ChainMode::Once if next < self.segments.len() => Some(next),
            ChainMode::Once => None,
            ChainMode::Cyclic if self.segments.is_empty() => None,
            ChainMode::Cyclic => Some(next % self.segments.len()),
        }
    }

    fn activate(&mut self, index: usize) -> bool {
        let Some(segment) = self.segments.get(index) else {
            self.active = None;
            return false;
        };
        self.active = Some(ActiveLeg {
            start: self.position,
            end: segment.target,
            duration: segment.duration,
            elapsed: 0.0,
            segment: Some(index),
        });
        true
    }
}
