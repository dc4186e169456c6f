// Copyright @yucwang 2026

use super::DemoScene;
use crate::core::error::Result;
use crate::core::light::QuadLight;
use crate::core::material::Material;
use crate::core::scene::SceneBuilder;
use crate::math::constants::{Float, Vector3f};
use crate::sensors::perspective::PerspectiveCamera;

pub const LIGHT_HEIGHT: Float = 1.0;
pub const OCCLUDER_HEIGHT: Float = 0.5;

/// Grey floor at `y = 0`, a square light overhead and a smaller square
/// blocker halfway between them.
pub fn shadowed_quad(width: usize, height: usize) -> Result<DemoScene> {
    let mut builder = SceneBuilder::new();
    let grey = builder.add_material(Material::diffuse(Vector3f::repeat(0.5)));

    builder.add_quad(Vector3f::new(-4.0, 0.0, -4.0), Vector3f::new(0.0, 0.0, 8.0),
                     Vector3f::new(8.0, 0.0, 0.0), grey)?;
    builder.add_quad(Vector3f::new(-0.3, OCCLUDER_HEIGHT, -0.3), Vector3f::new(0.0, 0.0, 0.6),
                     Vector3f::new(0.6, 0.0, 0.0), grey)?;
    builder.add_light(QuadLight::new(Vector3f::repeat(10.0),
                                     Vector3f::new(0.0, LIGHT_HEIGHT, 0.0),
                                     Vector3f::new(0.0, 0.0, 1.0), 0.5,
                                     Vector3f::new(1.0, 0.0, 0.0), 0.5));

    let camera = PerspectiveCamera::new(Vector3f::new(0.0, 3.0, 3.0),
                                        Vector3f::zeros(),
                                        Vector3f::new(0.0, 1.0, 0.0),
                                        0.9, width, height);
    Ok(DemoScene { scene: builder.build()?, camera })
}
