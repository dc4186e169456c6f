// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::math::constants::{Float, Vector3f};

/// Flat principled material. Every weight is always present; a lobe whose
/// weight is zero simply contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: Vector3f,
    pub metallic: Float,
    pub roughness: Float,
    pub specular: Float,
    pub specular_tint: Float,
    pub anisotropic: Float,
    pub sheen: Float,
    pub sheen_tint: Float,
    pub clearcoat: Float,
    pub clearcoat_gloss: Float,
    pub specular_transmission: Float,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vector3f::new(0.8, 0.8, 0.8),
            metallic: 0.0,
            roughness: 0.5,
            specular: 0.5,
            specular_tint: 0.0,
            anisotropic: 0.0,
            sheen: 0.0,
            sheen_tint: 0.5,
            clearcoat: 0.0,
            clearcoat_gloss: 1.0,
            specular_transmission: 0.0,
        }
    }
}

impl Material {
    /// Rough dielectric without a specular term. Away from grazing angles it
    /// behaves like a Lambertian surface of albedo `base_color`.
    pub fn diffuse(base_color: Vector3f) -> Self {
        Self { base_color, roughness: 1.0, specular: 0.0, ..Self::default() }
    }

    pub fn metal(base_color: Vector3f, roughness: Float) -> Self {
        Self { base_color, metallic: 1.0, roughness, ..Self::default() }
    }

    fn weights(&self) -> [(&'static str, Float); 10] {
        [("metallic", self.metallic), ("roughness", self.roughness), ("specular", self.specular),
         ("specular_tint", self.specular_tint), ("anisotropic", self.anisotropic), ("sheen", self.sheen),
         ("sheen_tint", self.sheen_tint), ("clearcoat", self.clearcoat),
         ("clearcoat_gloss", self.clearcoat_gloss), ("specular_transmission", self.specular_transmission)]
    }

    /// Rejects non-finite parameters, negative base colour and weights
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !self.base_color.iter().all(|c| c.is_finite() && *c >= 0.0) {
            return Err(RenderError::Config(format!("base_color {:?} must be finite and non-negative",
                                                   self.base_color)));
        }
        for (name, value) in self.weights() {
            if !(0.0..=1.0).contains(&value) {
                return Err(RenderError::Config(format!("{} = {} is outside [0, 1]", name, value)));
            }
        }
        Ok(())
    }

    /// Copy with every weight clamped to `[0, 1]` and the base colour to
    /// non-negative values; NaN becomes zero.
    pub fn clamped(&self) -> Self {
        let unit = |v: Float| if v.is_nan() { 0.0 } else { v.max(0.0).min(1.0) };
        Self {
            base_color: self.base_color.map(|c| if c.is_nan() { 0.0 } else { c.max(0.0) }),
            metallic: unit(self.metallic),
            roughness: unit(self.roughness),
            specular: unit(self.specular),
            specular_tint: unit(self.specular_tint),
            anisotropic: unit(self.anisotropic),
            sheen: unit(self.sheen),
            sheen_tint: unit(self.sheen_tint),
            clearcoat: unit(self.clearcoat),
            clearcoat_gloss: unit(self.clearcoat_gloss),
            specular_transmission: unit(self.specular_transmission),
        }
    }
}

/// Material parameters a texture sampler may override per shading point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialChannel {
    BaseColor,
    Metallic,
    Roughness,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for m in [Material::default(), Material::diffuse(Vector3f::new(0.2, 0.4, 0.6)),
                  Material::metal(Vector3f::new(0.9, 0.9, 0.9), 0.1)] {
            assert!(m.validate().is_ok());
            assert_eq!(m.clamped(), m);
        }
    }

    #[test]
    fn test_out_of_range_weights() {
        let bad = Material { sheen: -4.0, clearcoat: 6.0, roughness: Float::NAN, ..Material::default() };
        assert!(matches!(bad.validate(), Err(RenderError::Config(_))));
        assert!(matches!(Material { base_color: Vector3f::new(-0.1, 0.5, 0.5), ..Material::default() }.validate(),
                         Err(RenderError::Config(_))));

        let c = bad.clamped();
        assert_eq!((c.sheen, c.clearcoat, c.roughness), (0.0, 1.0, 0.0));
        assert!(c.validate().is_ok());
    }
}
