// Copyright @yucwang 2026

//! Built-in scenes for the demo binary and the scene-level tests.

pub mod cornell;
pub mod shadowed_quad;

use crate::core::scene::Scene;
use crate::sensors::perspective::PerspectiveCamera;

pub struct DemoScene {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
}
