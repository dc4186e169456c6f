// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub samples_per_pixel: u32,
    /// Number of indirect bounces; zero renders direct lighting only.
    pub max_depth: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { samples_per_pixel: 1, max_depth: 5 }
    }
}

impl RenderSettings {
    pub fn new(samples_per_pixel: u32, max_depth: u32) -> Self {
        Self { samples_per_pixel, max_depth }
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::Config(String::from("samples_per_pixel must be at least 1")));
        }
        Ok(())
    }
}
