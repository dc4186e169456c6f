// Copyright @yucwang 2026

use crate::core::material::MaterialChannel;
use crate::core::texture::TextureSampler;
use crate::math::constants::{Vector2f, Vector3f};

/// Never overrides anything: every shading point uses its material table entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantSampler;

impl TextureSampler for ConstantSampler {
    fn sample(&self, _material_id: u32, _uv: Vector2f, _channel: MaterialChannel) -> Option<Vector3f> {
        None
    }

    fn describe(&self) -> String {
        String::from("ConstantSampler")
    }
}
