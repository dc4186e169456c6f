// Copyright @yucwang 2026

use crate::core::accumulation::AccumulationBuffer;
use crate::core::error::Result;
use crate::math::spectrum::to_srgb8;

/// Receives display-ready frames: row-major RGBA, 8 bits per channel,
/// sRGB-companded.
pub trait PresentationSink {
    fn present(&mut self, width: usize, height: usize, rgba8: &[u8]) -> Result<()>;
}

/// Companded RGBA8 copy of the accumulator. The accumulator itself stays linear.
pub fn encode_rgba8(accumulation: &AccumulationBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(accumulation.width() * accumulation.height() * 4);
    for pixel in accumulation.bitmap().pixels() {
        let [r, g, b] = to_srgb8(pixel);
        out.extend_from_slice(&[r, g, b, 255]);
    }
    out
}

pub fn present_accumulation(accumulation: &AccumulationBuffer, sink: &mut dyn PresentationSink) -> Result<()> {
    let rgba = encode_rgba8(accumulation);
    sink.present(accumulation.width(), accumulation.height(), &rgba)
}
