// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

const LCG_MULTIPLIER: u64 = 6364136223846793005;
const LCG_INCREMENT: u64 = 1442695040888963407;

/// splitmix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Per-sample random stream. A pure function of its seed: the same pixel,
/// frame and sample index always replay the same sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: mix64(seed) }
    }

    pub fn for_sample(pixel: (u32, u32), frame_index: u32, sample_index: u32) -> Self {
        let packed_pixel = (pixel.0 as u64) | ((pixel.1 as u64) << 32);
        let packed_sample = (frame_index as u64) | ((sample_index as u64) << 32);
        Self::new(mix64(packed_pixel) ^ packed_sample.wrapping_mul(0x9e3779b97f4a7c15))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        (self.state >> 32) as u32
    }

    /// Uniform in `[0, 1)`; the low byte is dropped so the value fits an f32
    /// mantissa exactly and never rounds up to one.
    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() >> 8) as Float * (1.0 / 16_777_216.0)
    }

    pub fn next_2d(&mut self) -> Vector2f {
        let u = self.next_f32();
        let v = self.next_f32();
        Vector2f::new(u, v)
    }
}
