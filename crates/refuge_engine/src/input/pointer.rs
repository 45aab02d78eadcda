//! Pointer state and camera unprojection for picking

use nalgebra::{Matrix4, Perspective3, Point3, Vector4};

use crate::foundation::math::Vec3;
use crate::physics::Ray;

/// Pointer position over the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Pixels from the left edge
    pub screen_x: f64,
    /// Pixels from the top edge
    pub screen_y: f64,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
}

impl PointerState {
    /// Pointer at the top-left corner of a viewport
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            viewport_width,
            viewport_height,
        }
    }

    /// Move the pointer
    pub fn update_position(&mut self, x: f64, y: f64) {
        self.screen_x = x;
        self.screen_y = y;
    }

    /// Resize the viewport
    pub fn update_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Normalized device coordinates in [-1, 1], y up
    ///
    /// Returns `None` for a zero-sized viewport.
    #[allow(clippy::cast_possible_truncation)]
    pub fn screen_to_ndc(&self) -> Option<(f32, f32)> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return None;
        }
        let ndc_x = (self.screen_x / f64::from(self.viewport_width)) as f32 * 2.0 - 1.0;
        let ndc_y = 1.0 - (self.screen_y / f64::from(self.viewport_height)) as f32 * 2.0;
        Some((ndc_x, ndc_y))
    }
}

/// Perspective camera used only to build picking rays
#[derive(Debug, Clone, PartialEq)]
pub struct PickCamera {
    /// Eye position
    pub position: Vec3,
    /// Point looked at
    pub target: Vec3,
    /// Up direction
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl PickCamera {
    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::y(),
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    fn view_projection(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        );
        let projection = Perspective3::new(self.aspect, self.fov_y, self.near, self.far);
        projection.to_homogeneous() * view
    }

    /// World-space ray through a point in normalized device coordinates
    ///
    /// Returns `None` when the camera matrices are degenerate.
    pub fn ray_through(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inverse = self.view_projection().try_inverse()?;

        let near = inverse * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far = inverse * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w.abs() < f32::EPSILON || far.w.abs() < f32::EPSILON {
            return None;
        }

        let world_near = near.xyz() / near.w;
        let world_far = far.xyz() / far.w;
        Ray::towards(world_near, world_far)
    }

    /// World-space ray under the pointer
    pub fn pointer_ray(&self, pointer: &PointerState) -> Option<Ray> {
        let (ndc_x, ndc_y) = pointer.screen_to_ndc()?;
        self.ray_through(ndc_x, ndc_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_screen_to_ndc() {
        let mut pointer = PointerState::new(800, 600);
        pointer.update_position(400.0, 300.0);
        let (x, y) = pointer.screen_to_ndc().unwrap();
        assert_relative_eq!(x, 0.0);
        assert_relative_eq!(y, 0.0);

        pointer.update_position(0.0, 0.0);
        assert_eq!(pointer.screen_to_ndc(), Some((-1.0, 1.0)));
    }

    #[test]
    fn test_zero_viewport() {
        let pointer = PointerState::new(0, 600);
        assert!(pointer.screen_to_ndc().is_none());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = PickCamera::looking_at(Vec3::new(0.0, 100.0, 100.0), Vec3::zeros(), 1.0);
        let ray = camera.ray_through(0.0, 0.0).unwrap();

        let expected = (Vec3::zeros() - camera.position).normalize();
        assert_relative_eq!(ray.direction, expected, epsilon = 1e-4);
    }
}
