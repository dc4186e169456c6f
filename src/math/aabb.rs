// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f, FLOAT_MAX, FLOAT_MIN};
use super::ray::Ray3f;

/// Axis-aligned box. The default box is empty (`p_min > p_max`) and grows
/// through the `expand_*` methods.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::repeat(FLOAT_MAX),
               p_max: Vector3f::repeat(FLOAT_MIN) }
    }
}

impl AABB {
    pub fn new(a: Vector3f, b: Vector3f) -> Self {
        Self { p_min: a.inf(&b), p_max: a.sup(&b) }
    }

    pub fn from_points(points: &[Vector3f]) -> Self {
        let mut bounds = Self::default();
        for p in points {
            bounds.expand_by_point(p);
        }
        bounds
    }

    pub fn center(&self) -> Vector3f {
        0.5 * (self.p_min + self.p_max)
    }

    pub fn expand_by_point(&mut self, p: &Vector3f) {
        self.p_min = self.p_min.inf(p);
        self.p_max = self.p_max.sup(p);
    }

    pub fn expand_by_aabb(&mut self, other: &AABB) {
        self.p_min = self.p_min.inf(&other.p_min);
        self.p_max = self.p_max.sup(&other.p_max);
    }

    /// Slab test against the ray's `[min_t, max_t]` range.
    pub fn ray_intersect(&self, ray: &Ray3f) -> bool {
        self.ray_range(ray).is_some()
    }

    /// Parametric entry and exit distances, clipped to the ray's range.
    pub fn ray_range(&self, ray: &Ray3f) -> Option<(Float, Float)> {
        if !self.is_valid() {
            return None;
        }

        let o = ray.origin();
        let d = ray.dir();
        let mut t_min = ray.min_t;
        let mut t_max = ray.max_t;

        for axis in 0..3 {
            if d[axis].abs() < 1e-8 {
                if o[axis] < self.p_min[axis] || o[axis] > self.p_max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d[axis];
            let t0 = (self.p_min[axis] - o[axis]) * inv;
            let t1 = (self.p_max[axis] - o[axis]) * inv;
            t_min = t_min.max(t0.min(t1));
            t_max = t_max.min(t0.max(t1));
            if t_max < t_min {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    pub fn extent(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn surface_area(&self) -> Float {
        if !self.is_valid() {
            return 0.0;
        }
        let e = self.extent();
        2.0 * (e.x * e.y + e.x * e.z + e.y * e.z)
    }

    /// Axis of the longest side.
    pub fn max_extent(&self) -> usize {
        let e = self.extent();
        if e.x > e.y && e.x > e.z {
            0
        } else if e.y > e.z {
            1
        } else {
            2
        }
    }

    pub fn is_valid(&self) -> bool {
        self.p_min.x <= self.p_max.x && self.p_min.y <= self.p_max.y && self.p_min.z <= self.p_max.z
    }
}

/* Test for AABB */
#[cfg(test)]
mod tests {
    use super::AABB;
    use super::Ray3f;
    use super::Vector3f;

    #[test]
    fn test_aabb_geometry() {
        let min = Vector3f::new(1.0, 7.0, 3.0);
        let max = Vector3f::new(4.0, 4.0, 4.0);
        let mut bbox: AABB = AABB::new(min, max);

        let center = bbox.center();
        assert!((center[0] - 2.5f32).abs() < 1e-6);
        assert!((center[1] - 5.5f32).abs() < 1e-6);
        assert!((center[2] - 3.5f32).abs() < 1e-6);
        assert!((bbox.surface_area() - 30.0f32).abs() < 1e-5);

        bbox.expand_by_point(&Vector3f::new(-1.0, 5.0, 6.0));
        assert!((bbox.p_min[0] + 1.0f32).abs() < 1e-6);
        assert!((bbox.p_max[2] - 6.0f32).abs() < 1e-6);
        assert_eq!(bbox.max_extent(), 0);

        let mut empty = AABB::default();
        assert!(!empty.is_valid());
        assert_eq!(empty.surface_area(), 0.0);
        empty.expand_by_aabb(&bbox);
        assert_eq!(empty, bbox);
    }

    #[test]
    fn test_from_points() {
        let bbox = AABB::from_points(&[Vector3f::new(0.0, 2.0, -1.0),
                                       Vector3f::new(1.0, -3.0, 0.5),
                                       Vector3f::new(0.5, 0.0, 4.0)]);
        assert_eq!(bbox.p_min, Vector3f::new(0.0, -3.0, -1.0));
        assert_eq!(bbox.p_max, Vector3f::new(1.0, 2.0, 4.0));
        assert_eq!(bbox.max_extent(), 2);
    }

    #[test]
    fn test_aabb_intersect() {
        let bbox = AABB::new(Vector3f::new(-1.0, -1.0, -1.0),
                             Vector3f::new(1.0, 1.0, 1.0));

        let inside = Ray3f::new(Vector3f::zeros(), Vector3f::new(1.0, 1.0, 1.0), Some(0.0), Some(10.0));
        assert!(bbox.ray_intersect(&inside));

        let miss = Ray3f::new(Vector3f::new(-1.1, 0.0, 0.0), Vector3f::new(-0.1, 10.0, 10.0), None, None);
        assert!(!bbox.ray_intersect(&miss));

        // the box starts 4 units away, past the clipped range
        let toward = Ray3f::new(Vector3f::new(-5.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), Some(0.0), Some(3.0));
        assert!(!bbox.ray_intersect(&toward));
        let (t0, t1) = bbox.ray_range(&Ray3f::new(Vector3f::new(-5.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), None, None))
            .expect("hit");
        assert!((t0 - 4.0).abs() < 1e-5 && (t1 - 6.0).abs() < 1e-5);
    }
}
