//! Pointer input
//!
//! Turns pixel coordinates into the world-space [`Ray`](crate::physics::Ray)
//! the scene registry picks with.

pub mod pointer;

pub use pointer::{PickCamera, PointerState};
