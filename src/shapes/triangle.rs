// Copyright @yucwang 2023

use crate::math::aabb::AABB;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

const DETERMINANT_EPSILON: Float = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p0: Vector3f,
    pub p1: Vector3f,
    pub p2: Vector3f,
}

/// Ray parameter and barycentrics `(b1, b2)` of a hit; the point is
/// `(1 - b1 - b2)·p0 + b1·p1 + b2·p2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: Float,
    pub barycentric: Vector2f,
}

impl Triangle {
    pub fn new(p0: Vector3f, p1: Vector3f, p2: Vector3f) -> Self {
        Self { p0, p1, p2 }
    }

    pub fn bounding_box(&self) -> AABB {
        AABB::from_points(&[self.p0, self.p1, self.p2])
    }

    pub fn surface_area(&self) -> Float {
        0.5 * (self.p1 - self.p0).cross(&(self.p2 - self.p0)).norm()
    }

    /// Möller–Trumbore, two-sided.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<TriangleHit> {
        let edge0 = self.p1 - self.p0;
        let edge1 = self.p2 - self.p0;
        let dir = ray.dir();
        let p = dir.cross(&edge1);
        let det = edge0.dot(&p);
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = ray.origin() - self.p0;
        let b1 = s.dot(&p) * inv_det;
        if b1 < 0.0 || b1 > 1.0 {
            return None;
        }
        let q = s.cross(&edge0);
        let b2 = dir.dot(&q) * inv_det;
        if b2 < 0.0 || b1 + b2 > 1.0 {
            return None;
        }

        let t = edge1.dot(&q) * inv_det;
        if !ray.test_segment(t) {
            return None;
        }
        Some(TriangleHit { t, barycentric: Vector2f::new(b1, b2) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(Vector3f::new(0.0, 0.0, 0.0),
                      Vector3f::new(1.0, 0.0, 0.0),
                      Vector3f::new(0.0, 1.0, 0.0))
    }

    #[test]
    fn test_triangle_hit_reports_barycentrics() {
        let tri = unit_triangle();
        let ray = Ray3f::new(Vector3f::new(0.2, 0.3, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = tri.ray_intersection(&ray).expect("hit");
        assert!((hit.t - 1.0).abs() < 1e-6);
        assert!((hit.barycentric - Vector2f::new(0.2, 0.3)).norm() < 1e-6);

        // from behind as well
        let back = Ray3f::new(Vector3f::new(0.2, 0.3, -2.0), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!((tri.ray_intersection(&back).expect("hit").t - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_misses() {
        let tri = unit_triangle();
        let outside = Ray3f::new(Vector3f::new(0.8, 0.8, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(tri.ray_intersection(&outside).is_none());
        let parallel = Ray3f::new(Vector3f::new(0.2, 0.2, 1.0), Vector3f::new(1.0, 0.0, 0.0), None, None);
        assert!(tri.ray_intersection(&parallel).is_none());
        let short = Ray3f::new(Vector3f::new(0.2, 0.2, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, Some(0.5));
        assert!(tri.ray_intersection(&short).is_none());
        let behind = Ray3f::new(Vector3f::new(0.2, 0.2, 1.0), Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(tri.ray_intersection(&behind).is_none());
    }

    #[test]
    fn test_triangle_bounds_and_area() {
        let tri = unit_triangle();
        let b = tri.bounding_box();
        assert_eq!(b.p_min, Vector3f::zeros());
        assert_eq!(b.p_max, Vector3f::new(1.0, 1.0, 0.0));
        assert!((tri.surface_area() - 0.5).abs() < 1e-6);
    }
}
