// Copyright @yucwang 2026

use super::DemoScene;
use crate::core::error::{RenderError, Result};
use crate::core::light::QuadLight;
use crate::core::material::Material;
use crate::core::scene::SceneBuilder;
use crate::math::constants::{Matrix4f, Vector3f};
use crate::math::transform::Transform;
use crate::sensors::perspective::PerspectiveCamera;

pub const WHITE: Vector3f = Vector3f::new(0.73, 0.73, 0.73);
pub const RED: Vector3f = Vector3f::new(0.65, 0.05, 0.05);
pub const GREEN: Vector3f = Vector3f::new(0.12, 0.45, 0.15);
pub const LIGHT_EMISSION: Vector3f = Vector3f::new(17.0, 12.0, 4.0);

/// Interior spans `[-1, 1] x [0, 2] x [-1, 1]`; red wall at `x = -1`, green
/// wall at `x = 1`, open towards `+z` where the camera sits.
pub fn cornell_box(width: usize, height: usize) -> Result<DemoScene> {
    let mut builder = SceneBuilder::new();
    let white = builder.add_material(Material::diffuse(WHITE));
    let red = builder.add_material(Material::diffuse(RED));
    let green = builder.add_material(Material::diffuse(GREEN));
    let metal = builder.add_material(Material::metal(Vector3f::new(0.9, 0.85, 0.8), 0.25));

    // floor, ceiling, back
    builder.add_quad(Vector3f::new(-1.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 2.0),
                     Vector3f::new(2.0, 0.0, 0.0), white)?;
    builder.add_quad(Vector3f::new(-1.0, 2.0, -1.0), Vector3f::new(2.0, 0.0, 0.0),
                     Vector3f::new(0.0, 0.0, 2.0), white)?;
    builder.add_quad(Vector3f::new(-1.0, 0.0, -1.0), Vector3f::new(2.0, 0.0, 0.0),
                     Vector3f::new(0.0, 2.0, 0.0), white)?;
    builder.add_quad(Vector3f::new(-1.0, 0.0, -1.0), Vector3f::new(0.0, 2.0, 0.0),
                     Vector3f::new(0.0, 0.0, 2.0), red)?;
    builder.add_quad(Vector3f::new(1.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 2.0),
                     Vector3f::new(0.0, 2.0, 0.0), green)?;

    builder.add_box(Vector3f::new(0.05, 0.0, -0.1), Vector3f::new(0.65, 0.6, 0.5), white)?;

    // The tall box is authored around the origin and placed through an instance.
    let tall = builder.add_box(Vector3f::new(-0.3, 0.0, -0.3), Vector3f::new(0.3, 1.2, 0.3), metal)?;
    let placement = Matrix4f::new_translation(&Vector3f::new(-0.4, 0.0, -0.35))
        * Matrix4f::new_rotation(Vector3f::new(0.0, 0.3, 0.0));
    let placement = Transform::new(placement)
        .ok_or_else(|| RenderError::Config(String::from("tall box placement is not invertible")))?;
    builder.add_instance(tall, placement);

    builder.add_light(QuadLight::new(LIGHT_EMISSION,
                                     Vector3f::new(0.0, 1.98, 0.0),
                                     Vector3f::new(1.0, 0.0, 0.0), 0.25,
                                     Vector3f::new(0.0, 0.0, 1.0), 0.2));

    let camera = PerspectiveCamera::new(Vector3f::new(0.0, 1.0, 3.4),
                                        Vector3f::new(0.0, 1.0, 0.0),
                                        Vector3f::new(0.0, 1.0, 0.0),
                                        0.69, width, height);
    Ok(DemoScene { scene: builder.build()?, camera })
}
