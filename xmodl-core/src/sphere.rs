/// Bounding spheres
use crate::transform::Transform;
use crate::vector::Vector;

/// Sphere used for broad-phase intersection tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub origin: Vector,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(origin: Vector, radius: f64) -> Self {
        Self { origin, radius }
    }

    /// Touching spheres count as intersecting
    pub fn intersects_sphere(&self, other: &BoundingSphere) -> bool {
        let reach = self.radius + other.radius;
        (self.origin - other.origin).length_squared3() <= reach * reach
    }

    /// Strictly inside; points on the surface do not count
    pub fn contains_point(&self, point: &Vector) -> bool {
        (*point - self.origin).length_squared3() < self.radius * self.radius
    }

    /// Move the sphere into the space `t` maps to.
    ///
    /// The radius is scaled by the length of the first column of `t`, which
    /// is exact only for uniform scale without shear.
    pub fn transformed(&self, t: &Transform) -> BoundingSphere {
        BoundingSphere {
            origin: t.transform_point(&self.origin),
            radius: self.radius * t.uniform_scale(),
        }
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::new(Vector::point(0.0, 0.0, 0.0), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_sphere() {
        let a = BoundingSphere::new(Vector::point(0.0, 0.0, 0.0), 1.0);
        let touching = BoundingSphere::new(Vector::point(2.0, 0.0, 0.0), 1.0);
        let apart = BoundingSphere::new(Vector::point(5.0, 0.0, 0.0), 1.0);
        assert!(a.intersects_sphere(&touching));
        assert!(!a.intersects_sphere(&apart));
    }

    #[test]
    fn test_point_on_surface_is_outside() {
        let s = BoundingSphere::default();
        assert!(s.contains_point(&Vector::point(0.5, 0.0, 0.0)));
        assert!(!s.contains_point(&Vector::point(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_transformed() {
        let s = BoundingSphere::new(Vector::point(1.0, 0.0, 0.0), 2.0);
        let t = Transform::translate(0.0, 3.0, 0.0) * Transform::scale(2.0);
        let w = s.transformed(&t);
        assert_eq!(w.origin, Vector::point(2.0, 3.0, 0.0));
        assert!((w.radius - 4.0).abs() < 1e-12);
    }
}
