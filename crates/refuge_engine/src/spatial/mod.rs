//! Spatial helpers: random placement and proximity queries

pub mod index;
pub mod randomizer;

pub use index::{CollisionHit, IndexEntry, SpatialIndex};
pub use randomizer::SpatialRandomizer;
