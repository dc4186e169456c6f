// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::material::MaterialChannel;
use crate::core::texture::TextureSampler;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::srgb_to_linear;
use image::io::Reader as ImageReader;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    Clamp,
}

/// Linear RGB image sampled with bilinear filtering. `v = 0` is the bottom row.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    width: usize,
    height: usize,
    data: Vec<Vector3f>,
    wrap_mode: WrapMode,
}

impl ImageTexture {
    pub fn from_pixels(width: usize, height: usize, data: Vec<Vector3f>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(RenderError::Config(format!(
                "texture data has {} texels for a {}x{} image", data.len(), width, height)));
        }
        Ok(Self { width, height, data, wrap_mode: WrapMode::Repeat })
    }

    /// Loads a PNG/JPEG. Colour images are stored sRGB-encoded, so `srgb`
    /// should be set for base colour and cleared for scalar maps.
    pub fn open(path: &str, srgb: bool) -> Result<Self> {
        log::info!("Loading texture from: {}.", path);
        let img = ImageReader::open(path)?.decode()?;
        let rgb = img.to_rgb32f();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let mut data = Vec::with_capacity(width * height);
        for p in rgb.pixels() {
            let texel = Vector3f::new(p[0], p[1], p[2]);
            data.push(if srgb { texel.map(srgb_to_linear) } else { texel });
        }
        Self::from_pixels(width, height, data)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn set_wrap_mode(&mut self, wrap_mode: WrapMode) {
        self.wrap_mode = wrap_mode;
    }

    fn texel(&self, x: isize, y: isize) -> Vector3f {
        let x = self.wrap_index(x, self.width);
        let y = self.wrap_index(y, self.height);
        self.data[x + self.width * y]
    }

    fn wrap_index(&self, idx: isize, size: usize) -> usize {
        let n = size as isize;
        match self.wrap_mode {
            WrapMode::Repeat => idx.rem_euclid(n) as usize,
            WrapMode::Clamp => idx.clamp(0, n - 1) as usize,
        }
    }

    /// Folds a texture coordinate into `[0, 1]`; non-finite input maps to 0.
    fn wrap_coord(&self, v: Float) -> Float {
        if !v.is_finite() {
            return 0.0;
        }
        match self.wrap_mode {
            WrapMode::Repeat => v - v.floor(),
            WrapMode::Clamp => v.clamp(0.0, 1.0),
        }
    }

    pub fn eval(&self, uv: Vector2f) -> Vector3f {
        let x = self.wrap_coord(uv.x) * self.width as Float - 0.5;
        let y = (1.0 - self.wrap_coord(uv.y)) * self.height as Float - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let top = self.texel(x0, y0) * (1.0 - tx) + self.texel(x0 + 1, y0) * tx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - tx) + self.texel(x0 + 1, y0 + 1) * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

/// Texture overrides bound per material and channel.
#[derive(Debug, Default)]
pub struct ImageTextureSampler {
    bindings: HashMap<(u32, MaterialChannel), ImageTexture>,
}

impl ImageTextureSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, material_id: u32, channel: MaterialChannel, texture: ImageTexture) {
        self.bindings.insert((material_id, channel), texture);
    }

    /// Loads a texture for `channel`; base colour is decoded from sRGB.
    pub fn bind_file(&mut self, material_id: u32, channel: MaterialChannel, path: &str) -> Result<()> {
        let texture = ImageTexture::open(path, channel == MaterialChannel::BaseColor)?;
        self.bind(material_id, channel, texture);
        Ok(())
    }
}

impl TextureSampler for ImageTextureSampler {
    fn sample(&self, material_id: u32, uv: Vector2f, channel: MaterialChannel) -> Option<Vector3f> {
        self.bindings.get(&(material_id, channel)).map(|texture| texture.eval(uv))
    }

    fn describe(&self) -> String {
        format!("ImageTextureSampler ({} bindings)", self.bindings.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> ImageTexture {
        // top row black/white, bottom row white/black
        let b = Vector3f::zeros();
        let w = Vector3f::new(1.0, 1.0, 1.0);
        ImageTexture::from_pixels(2, 2, vec![b, w, w, b]).expect("texture")
    }

    #[test]
    fn test_texel_centres_are_exact() {
        let tex = checker();
        assert!((tex.eval(Vector2f::new(0.25, 0.75)) - Vector3f::zeros()).norm() < 1e-6);
        assert!((tex.eval(Vector2f::new(0.75, 0.75)).x - 1.0).abs() < 1e-6);
        assert!((tex.eval(Vector2f::new(0.25, 0.25)).x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bilinear_midpoint_and_repeat() {
        let tex = checker();
        assert!((tex.eval(Vector2f::new(0.5, 0.75)).x - 0.5).abs() < 1e-6);
        let a = tex.eval(Vector2f::new(0.3, 0.6));
        let b = tex.eval(Vector2f::new(1.3, -0.4));
        assert!((a - b).norm() < 1e-5);
    }

    #[test]
    fn test_sampler_only_answers_bound_channels() {
        let mut sampler = ImageTextureSampler::new();
        sampler.bind(2, MaterialChannel::BaseColor, checker());
        assert!(sampler.sample(2, Vector2f::new(0.25, 0.25), MaterialChannel::BaseColor).is_some());
        assert!(sampler.sample(2, Vector2f::new(0.25, 0.25), MaterialChannel::Roughness).is_none());
        assert!(sampler.sample(1, Vector2f::new(0.25, 0.25), MaterialChannel::BaseColor).is_none());
    }

    #[test]
    fn test_clamp_wrap_holds_edge_texels() {
        let mut tex = checker();
        tex.set_wrap_mode(WrapMode::Clamp);
        assert!((tex.eval(Vector2f::new(1.7, 0.75)).x - 1.0).abs() < 1e-6);
        assert!(tex.eval(Vector2f::new(-3.0, 0.75)).norm() < 1e-6);
        assert!((tex.eval(Vector2f::new(0.25, -2.0)).x - 1.0).abs() < 1e-6);

        let repeat = checker();
        assert!((repeat.eval(Vector2f::new(1.7, 0.75)).x - 1.0).abs() > 0.05);
    }

    #[test]
    fn test_non_finite_and_huge_uvs_stay_finite() {
        for mode in [WrapMode::Repeat, WrapMode::Clamp] {
            let mut tex = checker();
            tex.set_wrap_mode(mode);
            for uv in [Vector2f::new(Float::INFINITY, 0.5), Vector2f::new(Float::NAN, Float::NEG_INFINITY),
                       Vector2f::new(3.0e30, -7.0e25)] {
                let c = tex.eval(uv);
                assert!(c.iter().all(|v| v.is_finite() && *v >= 0.0 && *v <= 1.0), "{:?} -> {:?}", uv, c);
            }
        }
    }

    #[test]
    fn test_bind_file_decodes_srgb_base_colour_only() {
        let path = std::env::temp_dir().join("ganache_texture_decode.png");
        let path_str = path.to_str().expect("utf-8 temp path");
        let pixels: [u8; 6] = [255, 0, 0, 128, 64, 255];
        image::save_buffer(&path, &pixels, 2, 1, image::ColorType::Rgb8).expect("write png");

        let mut sampler = ImageTextureSampler::new();
        sampler.bind_file(0, MaterialChannel::BaseColor, path_str).expect("base colour");
        sampler.bind_file(0, MaterialChannel::Roughness, path_str).expect("roughness");
        let _ = std::fs::remove_file(&path);

        let left = Vector2f::new(0.25, 0.5);
        let right = Vector2f::new(0.75, 0.5);
        let red = sampler.sample(0, left, MaterialChannel::BaseColor).expect("bound");
        assert!((red - Vector3f::new(1.0, 0.0, 0.0)).norm() < 1e-5);

        let linear = sampler.sample(0, right, MaterialChannel::BaseColor).expect("bound");
        let expected = Vector3f::new(srgb_to_linear(128.0 / 255.0), srgb_to_linear(64.0 / 255.0), 1.0);
        assert!((linear - expected).norm() < 1e-4, "{:?} vs {:?}", linear, expected);
        assert!((linear.x - 0.2158).abs() < 1e-3);

        let raw = sampler.sample(0, right, MaterialChannel::Roughness).expect("bound");
        assert!((raw.x - 128.0 / 255.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_texture_file_is_an_error() {
        let mut sampler = ImageTextureSampler::new();
        let missing = std::env::temp_dir().join("ganache_no_such_texture.png");
        let result = sampler.bind_file(0, MaterialChannel::BaseColor, missing.to_str().expect("utf-8 temp path"));
        assert!(matches!(result, Err(RenderError::Io(_))));
        assert!(sampler.sample(0, Vector2f::zeros(), MaterialChannel::BaseColor).is_none());
    }

    #[test]
    fn test_bad_texel_count_is_rejected() {
        assert!(ImageTexture::from_pixels(2, 2, vec![Vector3f::zeros(); 3]).is_err());
    }
}
