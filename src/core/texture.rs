// Copyright @yucwang 2026

use crate::core::material::MaterialChannel;
use crate::math::constants::{Vector2f, Vector3f};

/// Per-point material overrides. `None` means the material table value is
/// used unchanged. Scalar channels are read from the first component.
pub trait TextureSampler: Send + Sync {
    fn sample(&self, material_id: u32, uv: Vector2f, channel: MaterialChannel) -> Option<Vector3f>;

    fn describe(&self) -> String {
        String::from("TextureSampler")
    }
}
