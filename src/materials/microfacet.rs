// Copyright @yucwang 2026

//! GGX microfacet helpers. Every direction here is in the local shading frame
//! (normal along +z).

use crate::math::constants::{Float, Vector2f, Vector3f, PI};

const MIN_ALPHA: Float = 1e-3;

/// Anisotropic GGX (Trowbridge-Reitz) distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ggx {
    pub alpha_x: Float,
    pub alpha_y: Float,
}

impl Ggx {
    pub fn isotropic(alpha: Float) -> Self {
        let alpha = alpha.max(MIN_ALPHA);
        Self { alpha_x: alpha, alpha_y: alpha }
    }

    /// `alpha = roughness²`, stretched along x and squeezed along y by
    /// `sqrt(1 - 0.9·anisotropic)`.
    pub fn from_roughness(roughness: Float, anisotropic: Float) -> Self {
        let alpha = (roughness * roughness).max(MIN_ALPHA);
        let aspect = (1.0 - 0.9 * anisotropic.max(0.0).min(1.0)).sqrt();
        Self {
            alpha_x: (alpha / aspect).max(MIN_ALPHA),
            alpha_y: (alpha * aspect).max(MIN_ALPHA),
        }
    }

    pub fn d(&self, h: &Vector3f) -> Float {
        if h.z <= 0.0 {
            return 0.0;
        }
        let x = h.x / self.alpha_x;
        let y = h.y / self.alpha_y;
        let denom = x * x + y * y + h.z * h.z;
        1.0 / (PI * self.alpha_x * self.alpha_y * denom * denom)
    }

    /// Smith masking for one direction.
    pub fn g1(&self, w: &Vector3f) -> Float {
        if w.z <= 0.0 {
            return 0.0;
        }
        let a2_tan2 = (w.x * w.x * self.alpha_x * self.alpha_x + w.y * w.y * self.alpha_y * self.alpha_y)
            / (w.z * w.z);
        2.0 / (1.0 + (1.0 + a2_tan2).sqrt())
    }

    /// Separable masking-shadowing.
    pub fn g(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        self.g1(wo) * self.g1(wi)
    }

    /// Half vector with density `D(h)·h.z`, drawn through the slope domain.
    pub fn sample_half(&self, u: &Vector2f) -> Vector3f {
        let u0 = u.x.max(0.0).min(1.0 - 1e-6);
        let r = (u0 / (1.0 - u0)).sqrt();
        let (sin_phi, cos_phi) = (2.0 * PI * u.y).sin_cos();
        let slope_x = self.alpha_x * r * cos_phi;
        let slope_y = self.alpha_y * r * sin_phi;
        Vector3f::new(-slope_x, -slope_y, 1.0).normalize()
    }

    /// Solid-angle density of `sample_half` for a given half vector.
    pub fn pdf_half(&self, h: &Vector3f) -> Float {
        self.d(h) * h.z.max(0.0)
    }
}

pub fn reflect(wo: &Vector3f, h: &Vector3f) -> Vector3f {
    2.0 * wo.dot(h) * h - wo
}

pub fn schlick_weight(cos_theta: Float) -> Float {
    let m = (1.0 - cos_theta).max(0.0).min(1.0);
    let m2 = m * m;
    m2 * m2 * m
}

pub fn fresnel_schlick(f0: &Vector3f, cos_theta: Float) -> Vector3f {
    let w = schlick_weight(cos_theta);
    f0 + (Vector3f::repeat(1.0) - f0) * w
}

pub fn fresnel_schlick_scalar(f0: Float, cos_theta: Float) -> Float {
    f0 + (1.0 - f0) * schlick_weight(cos_theta)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Midpoint rule over the hemisphere, uniform in (cos_theta, phi).
    fn integrate_hemisphere<F: Fn(&Vector3f) -> Float>(n: usize, f: F) -> Float {
        let mut sum = 0.0f64;
        for i in 0..n {
            for j in 0..n {
                let z = (i as Float + 0.5) / n as Float;
                let phi = 2.0 * PI * (j as Float + 0.5) / n as Float;
                let s = (1.0 - z * z).max(0.0).sqrt();
                let w = Vector3f::new(s * phi.cos(), s * phi.sin(), z);
                sum += f(&w) as f64;
            }
        }
        (sum * 2.0 * PI as f64 / (n * n) as f64) as Float
    }

    #[test]
    fn test_projected_ndf_integrates_to_one() {
        for ggx in [Ggx::isotropic(0.5), Ggx::from_roughness(0.6, 0.8), Ggx::from_roughness(0.8, 0.0)] {
            let total = integrate_hemisphere(1000, |h| ggx.d(h) * h.z);
            assert!((total - 1.0).abs() < 0.02, "{:?} integrates to {}", ggx, total);
        }
    }

    #[test]
    fn test_anisotropy_stretches_x() {
        let ggx = Ggx::from_roughness(0.5, 0.5);
        assert!(ggx.alpha_x > ggx.alpha_y);
        let iso = Ggx::from_roughness(0.5, 0.0);
        assert!((iso.alpha_x - 0.25).abs() < 1e-6);
        assert_eq!(iso.alpha_x, iso.alpha_y);
    }

    #[test]
    fn test_masking_limits() {
        let ggx = Ggx::isotropic(0.3);
        assert!((ggx.g1(&Vector3f::new(0.0, 0.0, 1.0)) - 1.0).abs() < 1e-6);
        let grazing = Vector3f::new(0.999, 0.0, 0.0447).normalize();
        assert!(ggx.g1(&grazing) < 0.5);
        assert_eq!(ggx.g1(&Vector3f::new(0.0, 0.0, -1.0)), 0.0);
    }

    #[test]
    fn test_sampled_half_vectors_are_upper_hemisphere_and_unit() {
        let ggx = Ggx::from_roughness(0.7, 0.3);
        for i in 0..32 {
            for j in 0..32 {
                let u = Vector2f::new(i as Float / 32.0, j as Float / 32.0);
                let h = ggx.sample_half(&u);
                assert!(h.z > 0.0);
                assert!((h.norm() - 1.0).abs() < 1e-5);
            }
        }
        // u.x = 0 is the distribution's peak
        let peak = ggx.sample_half(&Vector2f::new(0.0, 0.3));
        assert!((peak - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_reflect_and_schlick() {
        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let wi = reflect(&wo, &Vector3f::new(0.0, 0.0, 1.0));
        assert!((wi - Vector3f::new(-0.6, 0.0, 0.8)).norm() < 1e-6);
        assert!((fresnel_schlick_scalar(0.04, 1.0) - 0.04).abs() < 1e-6);
        assert!((fresnel_schlick_scalar(0.04, 0.0) - 1.0).abs() < 1e-6);
        let f = fresnel_schlick(&Vector3f::new(0.9, 0.5, 0.1), 1.0);
        assert!((f - Vector3f::new(0.9, 0.5, 0.1)).norm() < 1e-6);
    }
}
