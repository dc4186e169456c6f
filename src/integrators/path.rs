// Copyright @yucwang 2026

use crate::core::error::Result;
use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::RenderContext;
use crate::core::sensor::Sensor;
use crate::core::settings::RenderSettings;
use crate::integrators::direct::estimate_direct;
use crate::materials::principled;
use crate::math::constants::{Float, Vector2f, Vector3f, EPSILON, FLOAT_MAX};
use crate::math::ray::Ray3f;
use crate::math::spectrum::{is_black, is_finite, max_channel};
use crate::math::warp::sample_tent;

/// Bounces after which Russian roulette may end a path.
const RR_START_DEPTH: u32 = 3;
const RR_MIN_TERMINATION: Float = 0.05;

/// Survival test for a path with the given throughput. Returns the
/// reweighted throughput, or `None` when the path ends.
pub fn russian_roulette(throughput: &Vector3f, u: Float) -> Option<Vector3f> {
    let q = (1.0 - max_channel(throughput)).max(RR_MIN_TERMINATION);
    if u < q {
        None
    } else {
        Some(throughput / (1.0 - q))
    }
}

pub struct PathIntegrator {
    pub max_depth: u32,
    pub samples_per_pixel: u32,
}

impl PathIntegrator {
    pub fn new(max_depth: u32, samples_per_pixel: u32) -> Self {
        Self { max_depth, samples_per_pixel }
    }

    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.max_depth, settings.samples_per_pixel)
    }

    /// Emission of the nearest quad light a camera ray sees before `max_t`.
    fn visible_emission(&self, ctx: &RenderContext, ray: &Ray3f, max_t: Float) -> Option<Vector3f> {
        let mut clipped = *ray;
        clipped.max_t = max_t;
        let mut nearest: Option<(Float, Vector3f)> = None;
        for light in ctx.scene.lights() {
            if let Some(t) = light.intersect(&clipped) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, light.emission));
                }
            }
        }
        nearest.map(|(_, emission)| emission)
    }

    /// One camera path, from the primary ray until it escapes, is absorbed or
    /// reaches `max_depth` bounces.
    pub fn trace_path(&self, ctx: &RenderContext, mut ray: Ray3f, rng: &mut LcgRng) -> Result<Vector3f> {
        let mut radiance = Vector3f::zeros();
        let mut throughput = Vector3f::new(1.0, 1.0, 1.0);
        let mut depth = 0u32;

        loop {
            let hit = ctx.intersector.trace(&ray)?;

            if depth == 0 {
                let max_t = hit.map_or(FLOAT_MAX, |h| h.distance);
                if let Some(emission) = self.visible_emission(ctx, &ray, max_t) {
                    radiance += emission;
                    break;
                }
            }

            let hit = match hit {
                Some(h) => h,
                None => {
                    radiance += throughput.component_mul(&ctx.scene.background());
                    break;
                }
            };

            let point = ctx.scene.geometry().resolve(&hit)?;
            let material = ctx.scene.material_at(point.material_id, point.uv)?;
            let wo = -ray.dir();
            let normal = if point.normal.dot(&wo) < 0.0 { -point.normal } else { point.normal };

            let direct = estimate_direct(ctx, &material, &point.position, &normal, &wo, rng)?;
            radiance += throughput.component_mul(&direct);

            if depth >= self.max_depth {
                break;
            }

            let bsdf = principled::sample(&material, &wo, &normal, rng);
            if !bsdf.is_valid() || is_black(&bsdf.value) {
                break;
            }
            throughput = throughput.component_mul(&bsdf.value) * (normal.dot(&bsdf.wi).abs() / bsdf.pdf);
            depth += 1;

            if depth > RR_START_DEPTH {
                match russian_roulette(&throughput, rng.next_f32()) {
                    Some(t) => throughput = t,
                    None => break,
                }
            }

            ray = Ray3f::spawn(point.position, bsdf.wi, EPSILON, None);
        }

        Ok(radiance)
    }
}

impl Integrator for PathIntegrator {
    fn render_pixel(&self,
                    ctx: &RenderContext,
                    sensor: &dyn Sensor,
                    pixel: (u32, u32),
                    frame_index: u32) -> Result<Vector3f> {
        let spp = self.samples_per_pixel.max(1);
        let film_size = Vector2f::new(sensor.width() as Float, sensor.height() as Float);
        let mut color = Vector3f::zeros();
        let mut discarded = 0u32;

        for sample_index in 0..spp {
            let mut rng = LcgRng::for_sample(pixel, frame_index, sample_index);
            let jitter = rng.next_2d();
            let film = Vector2f::new((pixel.0 as Float + 0.5 + sample_tent(jitter.x)) / film_size.x,
                                     (pixel.1 as Float + 0.5 + sample_tent(jitter.y)) / film_size.y);
            let ray = sensor.sample_ray(&film);
            let l = self.trace_path(ctx, ray, &mut rng)?;
            if is_finite(&l) {
                color += l;
            } else {
                discarded += 1;
            }
        }

        if discarded > 0 {
            log::warn!("Pixel ({}, {}) frame {}: discarded {} non-finite samples.",
                       pixel.0, pixel.1, frame_index, discarded);
        }
        Ok(color / spp as Float)
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    fn describe(&self) -> String {
        format!("PathIntegrator: max_depth = {}, spp = {}", self.max_depth, self.samples_per_pixel)
    }
}
