// Copyright @yucwang 2026

//! Principled (Disney-style) BSDF: Fresnel-weighted diffuse, sheen, an
//! anisotropic GGX specular lobe and a GGX clearcoat layer. Public functions
//! take world-space unit directions pointing away from the surface.

use crate::core::material::Material;
use crate::core::rng::LcgRng;
use crate::materials::microfacet::{fresnel_schlick, fresnel_schlick_scalar, reflect, schlick_weight, Ggx};
use crate::math::constants::{Float, Vector3f, INV_PI};
use crate::math::frame::Frame;
use crate::math::spectrum::luminance;
use crate::math::warp::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf};

/// Directions closer to the tangent plane than this are treated as grazing.
const COS_EPSILON: Float = 1e-5;
const CLEARCOAT_F0: Float = 0.04;
const CLEARCOAT_MASKING_ALPHA: Float = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsdfSample {
    pub wi: Vector3f,
    pub pdf: Float,
    pub value: Vector3f,
}

impl BsdfSample {
    pub fn invalid() -> Self {
        Self { wi: Vector3f::zeros(), pdf: 0.0, value: Vector3f::zeros() }
    }

    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0
    }
}

fn lerp(a: Float, b: Float, t: Float) -> Float {
    a + (b - a) * t
}

fn lerp3(a: &Vector3f, b: &Vector3f, t: Float) -> Vector3f {
    a + (b - a) * t
}

/// Per-material quantities shared by evaluation, sampling and pdf.
struct Lobes {
    base: Vector3f,
    cspec0: Vector3f,
    sheen_color: Vector3f,
    diffuse_weight: Float,
    specular: Ggx,
    clearcoat: Ggx,
    clearcoat_weight: Float,
    pick_diffuse: Float,
    pick_specular: Float,
    pick_clearcoat: Float,
}

impl Lobes {
    fn new(m: &Material) -> Self {
        let m = &m.clamped();
        let base = m.base_color;
        let lum = luminance(&base);
        let tint = if lum > 0.0 { base / lum } else { Vector3f::repeat(1.0) };
        let one = Vector3f::repeat(1.0);

        let metallic = m.metallic;
        let transmission = m.specular_transmission;
        let dielectric_spec = lerp3(&one, &tint, m.specular_tint) * (m.specular * 0.08);
        let cspec0 = lerp3(&dielectric_spec, &base, metallic);
        let sheen_color = lerp3(&one, &tint, m.sheen_tint) * m.sheen;
        let diffuse_weight = (1.0 - metallic) * (1.0 - transmission);
        let clearcoat_weight = 0.25 * m.clearcoat;

        let d = 0.5 * diffuse_weight;
        let s = 1.0 - d;
        let c = clearcoat_weight;
        let total = d + s + c;

        Self {
            base,
            cspec0,
            sheen_color,
            diffuse_weight,
            specular: Ggx::from_roughness(m.roughness, m.anisotropic),
            clearcoat: Ggx::isotropic(lerp(0.1, 0.001, m.clearcoat_gloss)),
            clearcoat_weight,
            pick_diffuse: d / total,
            pick_specular: s / total,
            pick_clearcoat: c / total,
        }
    }

    fn evaluate(&self, wo: &Vector3f, wi: &Vector3f) -> Vector3f {
        if wo.z < COS_EPSILON || wi.z < COS_EPSILON {
            return Vector3f::zeros();
        }
        let h = (wo + wi).normalize();
        let cos_o = wo.z;
        let cos_i = wi.z;
        let cos_d = wi.dot(&h).max(0.0);
        let one = Vector3f::repeat(1.0);

        let mut base_layer = Vector3f::zeros();
        if self.diffuse_weight > 0.0 {
            let f_i = fresnel_schlick(&self.cspec0, cos_i);
            let f_o = fresnel_schlick(&self.cspec0, cos_o);
            let diffuse = self.base.component_mul(&(one - f_i)).component_mul(&(one - f_o)) * INV_PI;
            let sheen = self.sheen_color * (schlick_weight(cos_d) * INV_PI);
            base_layer += (diffuse + sheen) * self.diffuse_weight;
        }

        let f = fresnel_schlick(&self.cspec0, cos_d);
        let d = self.specular.d(&h);
        let g = self.specular.g(wo, wi);
        base_layer += f * (d * g / (4.0 * cos_i * cos_o));

        if self.clearcoat_weight <= 0.0 {
            return base_layer;
        }

        let w = self.clearcoat_weight;
        let attenuation = (1.0 - w * fresnel_schlick_scalar(CLEARCOAT_F0, cos_i))
            * (1.0 - w * fresnel_schlick_scalar(CLEARCOAT_F0, cos_o));
        let masking = Ggx::isotropic(CLEARCOAT_MASKING_ALPHA);
        let coat = w * fresnel_schlick_scalar(CLEARCOAT_F0, cos_d) * self.clearcoat.d(&h) * masking.g(wo, wi)
            / (4.0 * cos_i * cos_o);
        base_layer * attenuation + Vector3f::repeat(coat)
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if wo.z < COS_EPSILON || wi.z < COS_EPSILON {
            return 0.0;
        }
        let h = (wo + wi).normalize();
        let jacobian = 1.0 / (4.0 * wo.dot(&h).abs().max(COS_EPSILON));

        let mut pdf = self.pick_diffuse * sample_cosine_hemisphere_pdf(wi.z);
        pdf += self.pick_specular * self.specular.pdf_half(&h) * jacobian;
        if self.pick_clearcoat > 0.0 {
            pdf += self.pick_clearcoat * self.clearcoat.pdf_half(&h) * jacobian;
        }
        pdf
    }

    fn sample(&self, wo: &Vector3f, rng: &mut LcgRng) -> Option<Vector3f> {
        if wo.z < COS_EPSILON {
            return None;
        }
        let choice = rng.next_f32();
        let u = rng.next_2d();
        let wi = if choice < self.pick_diffuse {
            sample_cosine_hemisphere(&u)
        } else if choice < self.pick_diffuse + self.pick_specular {
            reflect(wo, &self.specular.sample_half(&u))
        } else {
            reflect(wo, &self.clearcoat.sample_half(&u))
        };
        if wi.z < COS_EPSILON {
            return None;
        }
        Some(wi)
    }
}

pub fn evaluate(material: &Material, wo: &Vector3f, wi: &Vector3f, normal: &Vector3f) -> Vector3f {
    let frame = Frame::from_normal(normal);
    Lobes::new(material).evaluate(&frame.to_local(wo), &frame.to_local(wi))
}

/// Density of `sample` producing `wi`, over solid angle.
pub fn pdf(material: &Material, wo: &Vector3f, wi: &Vector3f, normal: &Vector3f) -> Float {
    let frame = Frame::from_normal(normal);
    Lobes::new(material).pdf(&frame.to_local(wo), &frame.to_local(wi))
}

/// Draws `wi` from the lobe mixture. The returned pdf is the full mixture
/// density and the value is `evaluate(wo, wi)`.
pub fn sample(material: &Material, wo: &Vector3f, normal: &Vector3f, rng: &mut LcgRng) -> BsdfSample {
    let frame = Frame::from_normal(normal);
    let lobes = Lobes::new(material);
    let wo_local = frame.to_local(wo);
    let wi_local = match lobes.sample(&wo_local, rng) {
        Some(wi) => wi,
        None => return BsdfSample::invalid(),
    };
    let pdf = lobes.pdf(&wo_local, &wi_local);
    if !(pdf > 0.0) || !pdf.is_finite() {
        return BsdfSample::invalid();
    }
    BsdfSample {
        wi: frame.from_local(&wi_local),
        pdf,
        value: lobes.evaluate(&wo_local, &wi_local),
    }
}
