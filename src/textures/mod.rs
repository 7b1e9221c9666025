// textures/mod.rs - Procedural raster textures drawn once per scene instance
pub mod canvas;
mod generators;

use rand::Rng;
use thiserror::Error;

use crate::config::TextureConfig;

pub use canvas::{Canvas, ColorStop, DrawOp, Path, Rgba, MAX_TEXTURE_DIM};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TextureError {
    #[error("cannot allocate a {width}x{height} drawing surface")]
    InvalidDimensions { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Marble,
    Stone,
    Smoke,
    Sky,
}

impl TextureKind {
    pub const ALL: [TextureKind; 4] = [Self::Marble, Self::Stone, Self::Smoke, Self::Sky];

    /// Flat colour used when generation fails
    pub fn base_color(self) -> Rgba {
        match self {
            Self::Marble => Rgba::hex(0xfdfdfd),
            Self::Stone => Rgba::hex(0xa8a29e),
            Self::Smoke => Rgba::new(255, 255, 255, 0.3),
            Self::Sky => Rgba::hex(0x4e4376),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Marble => "marble",
            Self::Stone => "stone",
            Self::Smoke => "smoke",
            Self::Sky => "sky",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarbleParams {
    pub size: u32,
    pub base: u32,
    pub veins: usize,
    pub segments_per_vein: usize,
    /// Full width of the random walk step (each axis moves within +/- step/2)
    pub step: f32,
    pub vein: u32,
    pub alpha_range: (f32, f32),
    pub width_range: (f32, f32),
    pub repeat: [f32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banding {
    pub spacing: u32,
    pub color: u32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoneParams {
    pub size: u32,
    pub base: u32,
    pub dots: usize,
    pub dot_size: (f32, f32),
    pub dark: u32,
    pub light: u32,
    pub dot_alpha: f32,
    pub banding: Option<Banding>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmokeParams {
    pub size: u32,
    pub center_alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkyParams {
    pub width: u32,
    pub height: u32,
    /// (offset, 0xRRGGBB) from top to bottom
    pub gradient: Vec<(f32, u32)>,
    pub stars: usize,
    /// Upper fraction of the sky that receives stars and nebulae
    pub star_band: f32,
    pub nebulae: usize,
    pub nebula_radius: (f32, f32),
    pub nebula_alpha: f32,
    pub nebula_colors: Vec<u32>,
}

/// Everything needed to draw one texture
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSpec {
    Marble(MarbleParams),
    Stone(StoneParams),
    Smoke(SmokeParams),
    Sky(SkyParams),
}

impl TextureSpec {
    pub fn kind(&self) -> TextureKind {
        match self {
            Self::Marble(_) => TextureKind::Marble,
            Self::Stone(_) => TextureKind::Stone,
            Self::Smoke(_) => TextureKind::Smoke,
            Self::Sky(_) => TextureKind::Sky,
        }
    }

    pub fn from_config(kind: TextureKind, config: &TextureConfig) -> Self {
        match kind {
            TextureKind::Marble => Self::Marble(MarbleParams {
                size: config.marble_size,
                base: 0xfdfdfd,
                veins: config.marble_veins,
                segments_per_vein: 10,
                step: 300.0,
                vein: 0xc8c8d7,
                alpha_range: (0.05, 0.10),
                width_range: (1.0, 4.0),
                repeat: [2.0, 2.0],
            }),
            TextureKind::Stone => Self::Stone(StoneParams {
                size: config.stone_size,
                base: 0xa8a29e,
                dots: config.stone_dots,
                dot_size: (1.0, 3.0),
                dark: 0x78716c,
                light: 0xd6d3d1,
                dot_alpha: 0.4,
                banding: config.stone_banding.then(|| Banding {
                    spacing: 64,
                    color: 0x57534e,
                    alpha: 0.1,
                }),
            }),
            TextureKind::Smoke => Self::Smoke(SmokeParams {
                size: config.smoke_size,
                center_alpha: 0.6,
            }),
            TextureKind::Sky => Self::Sky(SkyParams {
                width: config.sky_width,
                height: config.sky_height,
                gradient: vec![(0.0, 0x2b5876), (0.5, 0x4e4376), (1.0, 0xf0f2f0)],
                stars: config.sky_stars,
                star_band: 0.45,
                nebulae: config.sky_nebulae,
                nebula_radius: (80.0, 220.0),
                nebula_alpha: 0.08,
                nebula_colors: vec![0x7f5a83, 0x3f6b8c, 0xa07ab0],
            }),
        }
    }
}

/// RGBA8 raster plus sampling state for the GPU
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedTexture {
    pub kind: TextureKind,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    /// UV repeat factor per axis
    pub repeat: [f32; 2],
    pub fallback: bool,
}

impl GeneratedTexture {
    fn from_canvas(
        kind: TextureKind,
        canvas: Canvas,
        wrap_s: WrapMode,
        wrap_t: WrapMode,
        repeat: [f32; 2],
    ) -> Self {
        let (width, height) = canvas.dimensions();
        Self {
            kind,
            width,
            height,
            pixels: canvas.into_pixels(),
            wrap_s,
            wrap_t,
            repeat,
            fallback: false,
        }
    }

    /// Small flat texture in the kind's base colour
    pub fn fallback(kind: TextureKind) -> Self {
        let color = kind.base_color();
        let alpha = (color.a * 255.0).round() as u8;
        let pixels = [color.r, color.g, color.b, alpha].repeat(4 * 4);
        Self {
            kind,
            width: 4,
            height: 4,
            pixels,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            repeat: [1.0, 1.0],
            fallback: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y.min(self.height - 1) * self.width + x.min(self.width - 1)) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Mean Rec. 601 luma over a row
    pub fn row_luma(&self, y: u32) -> f32 {
        let sum: f32 = (0..self.width).map(|x| luma(self.pixel(x, y))).sum();
        sum / self.width as f32
    }
}

pub fn luma([r, g, b, _]: [u8; 4]) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

/// Draw one texture
pub fn generate<R: Rng + ?Sized>(
    spec: &TextureSpec,
    rng: &mut R,
) -> Result<GeneratedTexture, TextureError> {
    match spec {
        TextureSpec::Marble(params) => generators::marble(params, rng),
        TextureSpec::Stone(params) => generators::stone(params, rng),
        TextureSpec::Smoke(params) => generators::smoke(params),
        TextureSpec::Sky(params) => generators::sky(params, rng),
    }
}

/// The four textures of one scene instance
#[derive(Debug, Clone)]
pub struct TextureSet {
    pub marble: GeneratedTexture,
    pub stone: GeneratedTexture,
    pub smoke: GeneratedTexture,
    pub sky: GeneratedTexture,
}

impl TextureSet {
    /// Generate every kind, substituting a flat fallback on failure
    pub fn generate<R: Rng + ?Sized>(config: &TextureConfig, rng: &mut R) -> Self {
        let mut make = |kind: TextureKind| {
            let spec = TextureSpec::from_config(kind, config);
            match generate(&spec, &mut *rng) {
                Ok(texture) => {
                    log::debug!(
                        "generated {} texture {}x{}",
                        kind.label(),
                        texture.width,
                        texture.height
                    );
                    texture
                }
                Err(e) => {
                    log::warn!("{} texture unavailable ({e}), using flat fallback", kind.label());
                    GeneratedTexture::fallback(kind)
                }
            }
        };
        Self {
            marble: make(TextureKind::Marble),
            stone: make(TextureKind::Stone),
            smoke: make(TextureKind::Smoke),
            sky: make(TextureKind::Sky),
        }
    }

    pub fn get(&self, kind: TextureKind) -> &GeneratedTexture {
        match kind {
            TextureKind::Marble => &self.marble,
            TextureKind::Stone => &self.stone,
            TextureKind::Smoke => &self.smoke,
            TextureKind::Sky => &self.sky,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedTexture> {
        TextureKind::ALL.into_iter().map(move |kind| self.get(kind))
    }

    pub fn fallback_count(&self) -> usize {
        self.iter().filter(|t| t.fallback).count()
    }

    /// Total bytes of pixel data held
    pub fn byte_size(&self) -> usize {
        self.iter().map(|t| t.pixels.len()).sum()
    }
}
