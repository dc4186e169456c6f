/* Copyright 2020 @TwoCookingMice */

use crate::core::accumulation::AccumulationBuffer;
use crate::core::error::Result;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Vector3f;

use exr::prelude::*;

/// Reads the first RGBA layer of an OpenEXR file as linear RGB.
pub fn read_exr_from_file(file_path: &str) -> Result<Bitmap> {
    log::info!("Starting reading OpenEXR image from: {}.", file_path);

    let image = read_first_rgba_layer_from_file(
        file_path,
        |resolution, _| Bitmap::new(resolution.width(), resolution.height()),
        |bitmap: &mut Bitmap, position, (r, g, b, _a): (f32, f32, f32, f32)| {
            bitmap[(position.x(), position.y())] = Vector3f::new(r, g, b);
        },
    )?;

    let bitmap = image.layer_data.channel_data.pixels;
    log::info!("OpenEXR loaded, width = {}, height = {}.", bitmap.width(), bitmap.height());
    Ok(bitmap)
}

pub fn write_exr_to_file(image: &Bitmap, file_path: &str) -> Result<()> {
    log::info!("Starting writing openexr images: {}.", file_path);

    write_rgb_file(file_path, image.width(), image.height(), |x, y| {
        let p = image[(x, y)];
        (p.x, p.y, p.z)
    })?;
    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

/// Dumps the linear running average, before any companding.
pub fn write_accumulation_exr(accumulation: &AccumulationBuffer, file_path: &str) -> Result<()> {
    write_exr_to_file(accumulation.bitmap(), file_path)
}
