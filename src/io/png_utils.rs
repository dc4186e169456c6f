// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::presentation::PresentationSink;
use std::path::PathBuf;

/// Writes every presented frame to the same PNG file.
pub struct PngSink {
    path: PathBuf,
    frames_written: usize,
}

impl PngSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), frames_written: 0 }
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }
}

impl PresentationSink for PngSink {
    fn present(&mut self, width: usize, height: usize, rgba8: &[u8]) -> Result<()> {
        if rgba8.len() != width * height * 4 {
            return Err(RenderError::Config(format!(
                "{} bytes is not a {}x{} RGBA8 frame", rgba8.len(), width, height)));
        }
        image::save_buffer(&self.path, rgba8, width as u32, height as u32, image::ColorType::Rgba8)?;
        self.frames_written += 1;
        log::debug!("PNG written to: {}.", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::accumulation::AccumulationBuffer;
    use crate::core::presentation::present_accumulation;
    use crate::math::bitmap::Bitmap;
    use crate::math::constants::Vector3f;

    #[test]
    fn test_png_sink_writes_companded_frame() {
        let mut acc = AccumulationBuffer::new(4, 3);
        let mut frame = Bitmap::new(4, 3);
        frame[(1, 2)] = Vector3f::new(1.0, 0.0, 0.5);
        acc.accumulate(&frame).expect("same size");

        let path = std::env::temp_dir().join("ganache_png_sink.png");
        let mut sink = PngSink::new(path.clone());
        present_accumulation(&acc, &mut sink).expect("present");
        assert_eq!(sink.frames_written(), 1);

        let loaded = image::open(&path).expect("png").to_rgba8();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.dimensions(), (4, 3));
        let lit = loaded.get_pixel(1, 2).0;
        assert_eq!((lit[0], lit[1], lit[3]), (255, 0, 255));
        assert!(lit[2] > 180 && lit[2] < 195);
        assert_eq!(loaded.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_png_sink_rejects_short_buffer() {
        let mut sink = PngSink::new(std::env::temp_dir().join("ganache_never_written.png"));
        assert!(matches!(sink.present(2, 2, &[0u8; 12]), Err(RenderError::Config(_))));
        assert_eq!(sink.frames_written(), 0);
    }
}
