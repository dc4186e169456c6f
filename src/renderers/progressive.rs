// Copyright @yucwang 2026

use crate::core::accumulation::AccumulationBuffer;
use crate::core::error::{RenderError, Result};
use crate::core::integrator::Integrator;
use crate::core::scene::RenderContext;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Vector3f;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

pub use super::renderer::Renderer;

const DEFAULT_BLOCK_SIZE: usize = 32;

struct Block {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    pixels: Vec<Vector3f>,
}

/// Renders each frame on a pool of scoped worker threads, one pixel task at a
/// time, grouped into square blocks.
pub struct ProgressiveRenderer {
    integrator: Box<dyn Integrator>,
    block_size: usize,
    thread_count: usize,
}

impl ProgressiveRenderer {
    pub fn new(integrator: Box<dyn Integrator>) -> Self {
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self { integrator, block_size: DEFAULT_BLOCK_SIZE, thread_count }
    }

    pub fn with_threads(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count.max(1);
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    fn render_block(&self,
                    ctx: &RenderContext,
                    sensor: &dyn Sensor,
                    frame_index: u32,
                    bounds: (usize, usize, usize, usize),
                    cancel: &AtomicBool) -> Result<Block> {
        let (x0, y0, x1, y1) = bounds;
        let mut pixels = Vec::with_capacity((x1 - x0) * (y1 - y0));
        for y in y0..y1 {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            for x in x0..x1 {
                pixels.push(self.integrator.render_pixel(ctx, sensor, (x as u32, y as u32), frame_index)?);
            }
        }
        Ok(Block { x0, y0, x1, y1, pixels })
    }
}

impl Renderer for ProgressiveRenderer {
    fn render_frame(&self,
                    ctx: &RenderContext,
                    sensor: &dyn Sensor,
                    accumulation: &mut AccumulationBuffer) -> Result<()> {
        let (width, height) = (sensor.width(), sensor.height());
        if accumulation.width() != width || accumulation.height() != height {
            return Err(RenderError::ResolutionMismatch {
                expected: (width, height),
                actual: (accumulation.width(), accumulation.height()),
            });
        }
        if width == 0 || height == 0 {
            return Ok(());
        }

        let frame_index = accumulation.frame_index();
        let start = Instant::now();
        let block_size = self.block_size;
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;

        let next_block = AtomicUsize::new(0);
        let cancel = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel::<Result<Block>>();
        let mut frame = Bitmap::new(width, height);
        let mut failure: Option<RenderError> = None;

        thread::scope(|scope| {
            for _ in 0..self.thread_count.min(total_blocks) {
                let tx = tx.clone();
                let next_block = &next_block;
                let cancel = &cancel;
                scope.spawn(move || {
                    loop {
                        if cancel.load(Ordering::Relaxed) {
                            break;
                        }
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let x0 = (block_index % blocks_x) * block_size;
                        let y0 = (block_index / blocks_x) * block_size;
                        let bounds = (x0, y0, (x0 + block_size).min(width), (y0 + block_size).min(height));
                        let result = self.render_block(ctx, sensor, frame_index, bounds, cancel);
                        if result.is_err() {
                            cancel.store(true, Ordering::Relaxed);
                        }
                        if tx.send(result).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for result in rx {
                match result {
                    Ok(block) => {
                        if cancel.load(Ordering::Relaxed) {
                            continue;
                        }
                        let block_width = block.x1 - block.x0;
                        for (i, value) in block.pixels.iter().enumerate() {
                            frame[(block.x0 + i % block_width, block.y0 + i / block_width)] = *value;
                        }
                        log::debug!("Block ({}, {})..({}, {}) done.", block.x0, block.y0, block.x1, block.y1);
                    }
                    Err(e) => {
                        if failure.is_none() {
                            failure = Some(e);
                        }
                    }
                }
            }
        });

        if let Some(e) = failure {
            log::warn!("Frame {} cancelled: {}", frame_index, e);
            return Err(e);
        }

        accumulation.accumulate(&frame)?;
        log::info!("Frame {} rendered in {:.2?} ({} blocks, {} threads).",
                   frame_index, start.elapsed(), total_blocks, self.thread_count);
        Ok(())
    }
}
