// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f, EPSILON};
use crate::math::ray::Ray3f;

/// Rectangular area emitter centred at `position`, spanning
/// `±half_width` along `tangent_u` and `±half_height` along `tangent_v`.
/// Emission is the same from both faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadLight {
    pub emission: Vector3f,
    pub position: Vector3f,
    pub normal: Vector3f,
    pub tangent_u: Vector3f,
    pub half_width: Float,
    pub tangent_v: Vector3f,
    pub half_height: Float,
}

impl QuadLight {
    /// Builds the light from two orthogonal tangents; the normal is
    /// `tangent_u × tangent_v`.
    pub fn new(emission: Vector3f,
               position: Vector3f,
               tangent_u: Vector3f,
               half_width: Float,
               tangent_v: Vector3f,
               half_height: Float) -> Self {
        let tangent_u = tangent_u.normalize();
        let tangent_v = tangent_v.normalize();
        let normal = tangent_u.cross(&tangent_v).normalize();
        Self { emission, position, normal, tangent_u, half_width, tangent_v, half_height }
    }

    pub fn area(&self) -> Float {
        4.0 * self.half_width * self.half_height
    }

    /// Uniform point on the quad.
    pub fn sample_point(&self, u: &Vector2f) -> Vector3f {
        self.position
            + self.tangent_u * ((2.0 * u.x - 1.0) * self.half_width)
            + self.tangent_v * ((2.0 * u.y - 1.0) * self.half_height)
    }

    pub fn corners(&self) -> [Vector3f; 4] {
        let du = self.tangent_u * self.half_width;
        let dv = self.tangent_v * self.half_height;
        [self.position - du - dv,
         self.position + du - dv,
         self.position + du + dv,
         self.position - du + dv]
    }

    /// Distance along `ray` to the quad, if it is hit inside the ray's range.
    pub fn intersect(&self, ray: &Ray3f) -> Option<Float> {
        let denom = self.normal.dot(&ray.dir());
        if denom.abs() < EPSILON {
            return None;
        }
        let t = self.normal.dot(&(self.position - ray.origin())) / denom;
        if !ray.test_segment(t) {
            return None;
        }
        let local = ray.at(t) - self.position;
        if local.dot(&self.tangent_u).abs() > self.half_width
            || local.dot(&self.tangent_v).abs() > self.half_height {
            return None;
        }
        Some(t)
    }
}
