// Copyright 2020 @TwoCookingMice

//! Helpers for linear RGB colours carried as `Vector3f`.

use super::constants::{Float, Vector3f};

pub fn luminance(c: &Vector3f) -> Float {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}

pub fn max_channel(c: &Vector3f) -> Float {
    c.x.max(c.y).max(c.z)
}

pub fn is_black(c: &Vector3f) -> bool {
    c.x == 0.0 && c.y == 0.0 && c.z == 0.0
}

pub fn is_finite(c: &Vector3f) -> bool {
    c.x.is_finite() && c.y.is_finite() && c.z.is_finite()
}

pub fn srgb_to_linear(v: Float) -> Float {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(v: Float) -> Float {
    let v = v.max(0.0).min(1.0);
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Companded 8-bit encoding used when a frame is handed to a presentation sink.
pub fn to_srgb8(c: &Vector3f) -> [u8; 3] {
    let encode = |v: Float| (linear_to_srgb(v) * 255.0 + 0.5).floor().max(0.0).min(255.0) as u8;
    [encode(c.x), encode(c.y), encode(c.z)]
}
