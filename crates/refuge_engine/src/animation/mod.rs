//! Timed motion sequencing

pub mod chain;

pub use chain::{AnimationChain, ChainMode, MotionSegment};
