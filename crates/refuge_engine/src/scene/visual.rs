//! Renderable state of an entity
//!
//! The core only ever touches position and display color. Mesh and material
//! details stay with whatever consumes the render graph.

use crate::foundation::math::{Color, Transform, Vec3};
use crate::physics::BoundingSphere;

/// Renderable handle owned by an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    /// Display name, used by info popups
    pub name: String,

    /// World transform
    pub transform: Transform,

    /// Color currently applied to the material
    pub color: Color,

    /// Radius of the picking and contact sphere; `None` is not pickable
    pub bounds: Option<f32>,
}

impl Visual {
    /// Create a visual at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            color: Color::WHITE,
            bounds: None,
        }
    }

    /// Builder: position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder: color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Builder: bounding radius
    pub fn with_bounds(mut self, radius: f32) -> Self {
        self.bounds = Some(radius);
        self
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Move the visual
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Picking sphere at the current position
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        self.bounds
            .map(|radius| BoundingSphere::new(self.transform.position, radius))
    }
}
