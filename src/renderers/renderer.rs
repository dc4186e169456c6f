// Copyright @yucwang 2026

use crate::core::accumulation::AccumulationBuffer;
use crate::core::error::Result;
use crate::core::scene::RenderContext;
use crate::core::sensor::Sensor;

pub trait Renderer {
    /// Renders one frame and folds it into `accumulation`. A failed frame
    /// leaves the accumulation untouched.
    fn render_frame(&self,
                    ctx: &RenderContext,
                    sensor: &dyn Sensor,
                    accumulation: &mut AccumulationBuffer) -> Result<()>;
}
