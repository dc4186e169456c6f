// Copyright @yucwang 2026

use crate::core::error::Result;
use crate::core::geometry::HitRecord;
use crate::math::ray::Ray3f;

/// Ray queries against the scene geometry. Only hits with
/// `ray.min_t < t < ray.max_t` are reported.
pub trait IntersectionService: Send + Sync {
    /// Closest hit.
    fn trace(&self, ray: &Ray3f) -> Result<Option<HitRecord>>;

    /// Any hit.
    fn occluded(&self, ray: &Ray3f) -> Result<bool>;
}
