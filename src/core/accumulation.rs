// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector3f};

/// Incremental mean: after `frame_index` earlier frames the cell holds their
/// average, and folding in `sample` keeps it the average of all of them.
pub fn blend(previous: &Vector3f, sample: &Vector3f, frame_index: u32) -> Vector3f {
    let f = frame_index as Float;
    (sample + previous * f) / (f + 1.0)
}

/// Linear running average per pixel plus the number of frames folded in
/// since the last reset.
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    bitmap: Bitmap,
    frame_index: u32,
}

impl AccumulationBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { bitmap: Bitmap::new(width, height), frame_index: 0 }
    }

    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    pub fn height(&self) -> usize {
        self.bitmap.height()
    }

    /// Frames accumulated since the last reset; also the index of the next frame.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Folds a complete frame into the average and advances the frame counter.
    pub fn accumulate(&mut self, frame: &Bitmap) -> Result<()> {
        if frame.width() != self.width() || frame.height() != self.height() {
            return Err(RenderError::ResolutionMismatch {
                expected: (self.width(), self.height()),
                actual: (frame.width(), frame.height()),
            });
        }
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.bitmap[(x, y)] = blend(&self.bitmap[(x, y)], &frame[(x, y)], self.frame_index);
            }
        }
        self.frame_index += 1;
        Ok(())
    }

    /// Clears every cell and restarts the frame count, e.g. after the camera
    /// or the scene changed.
    pub fn reset(&mut self) {
        self.bitmap.fill(Vector3f::zeros());
        self.frame_index = 0;
    }
}
