//! Primitive shapes and intersection algorithms
//!
//! Rays and bounding spheres are all the scene needs: every pickable
//! entity is approximated by a sphere around its position, and contact
//! between entities is sphere overlap.

use crate::foundation::math::Vec3;
use crate::scene::EntityId;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized on construction)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// Returns `None` for a zero-length direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        direction.try_normalize(f32::EPSILON).map(|direction| Self { origin, direction })
    }

    /// Ray from `origin` through `target`
    pub fn towards(origin: Vec3, target: Vec3) -> Option<Self> {
        Self::new(origin, target - origin)
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The entity that was hit
    pub entity: EntityId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// A bounding sphere for picking and contact detection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Test ray intersection with this sphere
    /// Returns (distance, hit_point, normal) if hit, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        // Vector from ray origin to sphere center
        let oc = ray.origin - self.center;

        // Solve: |origin + t*direction - center|^2 = radius^2
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        // Closest positive intersection; origin inside the sphere uses the exit point
        let t = if t1 > 0.0 {
            t1
        } else if t2 > 0.0 {
            t2
        } else {
            return None;
        };

        let hit_point = ray.point_at(t);
        let normal = (hit_point - self.center)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| -ray.direction);

        Some((t, hit_point, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 5.0)).unwrap();
        assert_relative_eq!(ray.direction.magnitude(), 1.0);
        assert_relative_eq!(ray.point_at(2.0).z, 2.0);
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert!(Ray::new(Vec3::zeros(), Vec3::zeros()).is_none());
    }

    #[test]
    fn test_ray_hits_sphere_front_face() {
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0);
        let ray = Ray::new(Vec3::zeros(), Vec3::z()).unwrap();

        let (t, point, normal) = sphere.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 8.0, epsilon = 1e-5);
        assert_relative_eq!(point.z, 8.0, epsilon = 1e-5);
        assert_relative_eq!(normal.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_misses_sphere() {
        let sphere = BoundingSphere::new(Vec3::new(5.0, 0.0, 10.0), 2.0);
        let ray = Ray::new(Vec3::zeros(), Vec3::z()).unwrap();
        assert!(sphere.intersect_ray(&ray).is_none());

        // Sphere behind the origin
        let behind = BoundingSphere::new(Vec3::new(0.0, 0.0, -10.0), 2.0);
        assert!(behind.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_sphere_overlap() {
        let a = BoundingSphere::new(Vec3::zeros(), 1.0);
        let touching = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        let apart = BoundingSphere::new(Vec3::new(2.5, 0.0, 0.0), 1.0);

        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }
}
