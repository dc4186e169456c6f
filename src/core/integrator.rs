// Copyright @yucwang 2026

use crate::core::error::Result;
use crate::core::scene::RenderContext;
use crate::core::sensor::Sensor;
use crate::math::constants::Vector3f;

pub trait Integrator: Sync {
    /// Linear radiance estimate for one pixel of one frame. Must depend only
    /// on its arguments so that pixels can be rendered in any order.
    fn render_pixel(&self,
                    ctx: &RenderContext,
                    sensor: &dyn Sensor,
                    pixel: (u32, u32),
                    frame_index: u32) -> Result<Vector3f>;

    fn samples_per_pixel(&self) -> u32;

    fn describe(&self) -> String {
        String::from("Integrator")
    }
}
