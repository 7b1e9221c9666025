use glam::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;

use super::canvas::{Canvas, ColorStop, DrawOp, Path, Rgba};
use super::{
    GeneratedTexture, MarbleParams, SkyParams, SmokeParams, StoneParams, TextureError, TextureKind,
    WrapMode,
};

/// Uniform sample that tolerates an empty or inverted range
pub(crate) fn sample_range<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

pub fn marble<R: Rng + ?Sized>(
    params: &MarbleParams,
    rng: &mut R,
) -> Result<GeneratedTexture, TextureError> {
    let size = params.size as f32;
    let mut canvas = Canvas::new(params.size, params.size)?.draw(DrawOp::Fill(Rgba::hex(params.base)));

    for _ in 0..params.veins {
        let mut cursor = Vec2::new(rng.gen_range(0.0..size), rng.gen_range(0.0..size));
        let mut path = Path::new(cursor);
        for _ in 0..params.segments_per_vein {
            cursor += Vec2::new(
                (rng.gen::<f32>() - 0.5) * params.step,
                (rng.gen::<f32>() - 0.5) * params.step,
            );
            path = path.cubic_to(cursor, cursor + Vec2::splat(50.0), cursor);
        }
        let alpha = sample_range(rng, params.alpha_range);
        let width = sample_range(rng, params.width_range);
        canvas = canvas.draw(DrawOp::Stroke {
            path,
            width,
            color: Rgba::hex_alpha(params.vein, alpha),
        });
    }

    Ok(GeneratedTexture::from_canvas(
        TextureKind::Marble,
        canvas.execute_ops(),
        WrapMode::Repeat,
        WrapMode::Repeat,
        params.repeat,
    ))
}

pub fn stone<R: Rng + ?Sized>(
    params: &StoneParams,
    rng: &mut R,
) -> Result<GeneratedTexture, TextureError> {
    let size = params.size as f32;
    let mut canvas = Canvas::new(params.size, params.size)?.draw(DrawOp::Fill(Rgba::hex(params.base)));

    let dots = (0..params.dots).map(|_| {
        let x = rng.gen_range(0.0..size);
        let y = rng.gen_range(0.0..size);
        let dot = sample_range(rng, params.dot_size);
        let color = if rng.gen_bool(0.5) { params.dark } else { params.light };
        DrawOp::Rect {
            x,
            y,
            width: dot,
            height: dot,
            color: Rgba::hex_alpha(color, params.dot_alpha),
        }
    });
    canvas = canvas.draw_all(dots.collect::<Vec<_>>());

    if let Some(band) = &params.banding {
        let spacing = band.spacing.max(1) as usize;
        canvas = canvas.draw_all((0..params.size).step_by(spacing).map(|y| DrawOp::HLine {
            y,
            color: Rgba::hex_alpha(band.color, band.alpha),
        }));
    }

    Ok(GeneratedTexture::from_canvas(
        TextureKind::Stone,
        canvas.execute_ops(),
        WrapMode::Repeat,
        WrapMode::Repeat,
        [1.0, 1.0],
    ))
}

pub fn smoke(params: &SmokeParams) -> Result<GeneratedTexture, TextureError> {
    let half = params.size as f32 * 0.5;
    let canvas = Canvas::new(params.size, params.size)?
        .draw(DrawOp::RadialGradient {
            center: Vec2::splat(half),
            radius: half,
            stops: vec![
                ColorStop::new(0.0, Rgba::new(255, 255, 255, params.center_alpha)),
                ColorStop::new(1.0, Rgba::new(255, 255, 255, 0.0)),
            ],
        })
        .execute_ops();

    Ok(GeneratedTexture::from_canvas(
        TextureKind::Smoke,
        canvas,
        WrapMode::ClampToEdge,
        WrapMode::ClampToEdge,
        [1.0, 1.0],
    ))
}

pub fn sky<R: Rng + ?Sized>(
    params: &SkyParams,
    rng: &mut R,
) -> Result<GeneratedTexture, TextureError> {
    let width = params.width as f32;
    let height = params.height as f32;
    let stops = params
        .gradient
        .iter()
        .map(|&(offset, hex)| ColorStop::new(offset, Rgba::hex(hex)))
        .collect();
    let mut canvas = Canvas::new(params.width, params.height)?.draw(DrawOp::VerticalGradient { stops });

    // Nebula blobs sit behind the stars
    for _ in 0..params.nebulae {
        let Some(&tint) = params.nebula_colors.choose(&mut *rng) else {
            break;
        };
        let center = Vec2::new(
            rng.gen_range(0.0..width),
            sample_range(rng, (0.0, height * params.star_band)),
        );
        let radius = sample_range(rng, params.nebula_radius);
        canvas = canvas.draw(DrawOp::RadialGradient {
            center,
            radius,
            stops: vec![
                ColorStop::new(0.0, Rgba::hex_alpha(tint, params.nebula_alpha)),
                ColorStop::new(1.0, Rgba::hex_alpha(tint, 0.0)),
            ],
        });
    }

    let stars = (0..params.stars).map(|_| {
        let brightness = rng.gen_range(0.3..1.0);
        DrawOp::Rect {
            x: rng.gen_range(0.0..width),
            y: sample_range(rng, (0.0, height * params.star_band)),
            width: 1.0,
            height: 1.0,
            color: Rgba::new(255, 255, 255, brightness),
        }
    });
    canvas = canvas.draw_all(stars.collect::<Vec<_>>());

    Ok(GeneratedTexture::from_canvas(
        TextureKind::Sky,
        canvas.execute_ops(),
        WrapMode::Repeat,
        WrapMode::ClampToEdge,
        [1.0, 1.0],
    ))
}
