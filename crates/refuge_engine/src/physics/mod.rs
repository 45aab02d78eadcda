//! Geometric primitives for picking and contact tests

pub mod primitives;

pub use primitives::{BoundingSphere, Ray, RayHit};
