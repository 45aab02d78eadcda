//! Scene management
//!
//! The [`SceneRegistry`] owns every entity in the refuge. Entities carry a
//! [`Visual`] mirrored into an external [`RenderGraph`], a set of
//! [`Capabilities`] and, for animals, a boxed behavior.

pub mod commands;
pub mod entity;
pub mod registry;
pub mod render_graph;
pub mod selection;
pub mod visual;

#[cfg(test)]
mod tests;

pub use commands::CommandQueue;
pub use entity::{Capabilities, ColorStates, Entity, EntityId, EntityKind, Timestamp, UnknownKindError};
pub use registry::{ReconcileReport, SceneRegistry, TickSummary};
pub use render_graph::{RenderGraph, VisualList};
pub use selection::SelectionSet;
pub use visual::Visual;

use thiserror::Error;

use crate::factory::FactoryError;

/// Scene errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An entity could not be built
    #[error("failed to build entity: {0}")]
    Factory(#[from] FactoryError),
}

/// Result alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
