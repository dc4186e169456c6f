// Copyright @yucwang 2026

use crate::core::error::Result;
use crate::core::material::Material;
use crate::core::rng::LcgRng;
use crate::core::scene::RenderContext;
use crate::materials::principled;
use crate::math::constants::{Vector3f, EPSILON};
use crate::math::ray::Ray3f;
use crate::math::spectrum::is_black;

/// Next-event estimate of the radiance reflected toward `wo` from every quad
/// light in the scene, one area sample per light.
pub fn estimate_direct(ctx: &RenderContext,
                       material: &Material,
                       point: &Vector3f,
                       normal: &Vector3f,
                       wo: &Vector3f,
                       rng: &mut LcgRng) -> Result<Vector3f> {
    let mut radiance = Vector3f::zeros();

    for light in ctx.scene.lights() {
        let u = rng.next_2d();
        let p_light = light.sample_point(&u);
        let to_light = p_light - point;
        let dist2 = to_light.norm_squared();
        if dist2 <= EPSILON * EPSILON {
            continue;
        }
        let dist = dist2.sqrt();
        let wi = to_light / dist;

        // Both faces emit.
        let cos_light = light.normal.dot(&(-wi)).abs();
        if cos_light < EPSILON {
            continue;
        }
        let f = principled::evaluate(material, wo, &wi, normal);
        if is_black(&f) {
            continue;
        }

        let shadow_ray = Ray3f::spawn(*point, wi, EPSILON, Some(dist - 2.0 * EPSILON));
        if ctx.intersector.occluded(&shadow_ray)? {
            continue;
        }

        let light_pdf = dist2 / (light.area() * cos_light);
        let cos_surface = normal.dot(&wi).abs();
        radiance += f.component_mul(&light.emission) * (cos_surface / light_pdf);
    }

    Ok(radiance)
}
