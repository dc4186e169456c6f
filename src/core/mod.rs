// Copyright @yucwang 2021

pub mod accumulation;
pub mod bvh;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod intersection;
pub mod light;
pub mod material;
pub mod presentation;
pub mod rng;
pub mod scene;
pub mod sensor;
pub mod settings;
pub mod texture;
