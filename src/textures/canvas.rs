use glam::Vec2;

use super::TextureError;
use crate::math::hex_to_rgb8;

/// Largest edge a generated texture may have
pub const MAX_TEXTURE_DIM: u32 = 8192;

/// Number of line pieces a cubic bezier is flattened into
const BEZIER_STEPS: usize = 24;

/// Straight (non-premultiplied) colour with fractional alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from a 0xRRGGBB literal
    pub const fn hex(hex: u32) -> Self {
        Self::hex_alpha(hex, 1.0)
    }

    pub const fn hex_alpha(hex: u32, a: f32) -> Self {
        let [r, g, b] = hex_to_rgb8(hex);
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Sample a sorted stop list at `t`
fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::new(0, 0, 0, 0.0);
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f32::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (t - a.offset) / span);
        }
    }
    stops[stops.len() - 1].color
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Vec2),
    Cubic { c1: Vec2, c2: Vec2, to: Vec2 },
}

/// Open path stroked as a single coverage mask
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub start: Vec2,
    pub segments: Vec<Segment>,
}

impl Path {
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn line_to(mut self, to: Vec2) -> Self {
        self.segments.push(Segment::Line(to));
        self
    }

    pub fn cubic_to(mut self, c1: Vec2, c2: Vec2, to: Vec2) -> Self {
        self.segments.push(Segment::Cubic { c1, c2, to });
        self
    }

    /// Flatten into a polyline
    pub fn points(&self) -> Vec<Vec2> {
        let mut points = vec![self.start];
        let mut cursor = self.start;
        for segment in &self.segments {
            match *segment {
                Segment::Line(to) => {
                    points.push(to);
                    cursor = to;
                }
                Segment::Cubic { c1, c2, to } => {
                    for step in 1..=BEZIER_STEPS {
                        let t = step as f32 / BEZIER_STEPS as f32;
                        let u = 1.0 - t;
                        let p = cursor * (u * u * u)
                            + c1 * (3.0 * u * u * t)
                            + c2 * (3.0 * u * t * t)
                            + to * (t * t * t);
                        points.push(p);
                    }
                    cursor = to;
                }
            }
        }
        points
    }
}

/// 2D drawing operations for the texture canvas
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Replace every pixel with colour
    Fill(Rgba),

    /// Blend an axis-aligned rectangle; fractional edges snap outward
    Rect { x: f32, y: f32, width: f32, height: f32, color: Rgba },

    /// Blend one horizontal 1px line across the full width
    HLine { y: u32, color: Rgba },

    /// Stroke a path with the given line width
    Stroke { path: Path, width: f32, color: Rgba },

    /// Blend a radial gradient clipped to its radius
    RadialGradient { center: Vec2, radius: f32, stops: Vec<ColorStop> },

    /// Blend a top-to-bottom gradient over the full canvas
    VerticalGradient { stops: Vec<ColorStop> },
}

/// Canvas state - RGBA8 pixel buffer with pending draw operations
#[derive(Clone)]
pub struct Canvas {
    pixels: Vec<u8>,
    operations: Vec<DrawOp>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create a transparent canvas; fails when the surface could not exist
    pub fn new(width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 || width > MAX_TEXTURE_DIM || height > MAX_TEXTURE_DIM {
            return Err(TextureError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels: vec![0; (width * height * 4) as usize],
            operations: Vec::new(),
            width,
            height,
        })
    }

    /// Add draw operation - functional style
    pub fn draw(mut self, op: DrawOp) -> Self {
        self.operations.push(op);
        self
    }

    /// Queue many operations at once
    pub fn draw_all(mut self, ops: impl IntoIterator<Item = DrawOp>) -> Self {
        self.operations.extend(ops);
        self
    }

    /// Execute all pending operations in order
    pub fn execute_ops(mut self) -> Self {
        let operations = std::mem::take(&mut self.operations);
        for op in &operations {
            self.execute_op(op);
        }
        self
    }

    fn execute_op(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Fill(color) => self.fill(*color),
            DrawOp::Rect { x, y, width, height, color } => {
                self.draw_rect(*x, *y, *width, *height, *color)
            }
            DrawOp::HLine { y, color } => self.draw_hline(*y, *color),
            DrawOp::Stroke { path, width, color } => self.stroke(path, *width, *color),
            DrawOp::RadialGradient { center, radius, stops } => {
                self.radial_gradient(*center, *radius, stops)
            }
            DrawOp::VerticalGradient { stops } => self.vertical_gradient(stops),
        }
    }

    fn fill(&mut self, color: Rgba) {
        let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, alpha]);
        }
    }

    /// Source-over blend of one pixel; out-of-bounds writes are dropped
    fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.blend_at(idx, color);
    }

    fn blend_at(&mut self, idx: usize, color: Rgba) {
        let sa = color.a.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[idx..idx + 4];
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let channel = |s: u8, d: u8| {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        dst[0] = channel(color.r, dst[0]);
        dst[1] = channel(color.g, dst[1]);
        dst[2] = channel(color.b, dst[2]);
        dst[3] = (out_a * 255.0).round() as u8;
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = (x + width).ceil() as i64;
        let y1 = (y + height).ceil() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    fn draw_hline(&mut self, y: u32, color: Rgba) {
        for x in 0..self.width {
            self.blend_pixel(x as i64, y as i64, color);
        }
    }

    /// Mark every pixel within `width / 2` of the polyline, then blend each once
    fn stroke(&mut self, path: &Path, width: f32, color: Rgba) {
        let points = path.points();
        let half = (width * 0.5).max(0.5);
        let mut covered = vec![false; (self.width * self.height) as usize];
        let mut hits = Vec::new();

        let mut mark = |canvas: &Canvas, a: Vec2, b: Vec2| {
            let min = a.min(b) - Vec2::splat(half);
            let max = a.max(b) + Vec2::splat(half);
            let x0 = (min.x.floor() as i64).max(0);
            let y0 = (min.y.floor() as i64).max(0);
            let x1 = (max.x.ceil() as i64).min(canvas.width as i64 - 1);
            let y1 = (max.y.ceil() as i64).min(canvas.height as i64 - 1);
            for py in y0..=y1 {
                for px in x0..=x1 {
                    let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                    if distance_to_segment(p, a, b) <= half {
                        let idx = (py as u32 * canvas.width + px as u32) as usize;
                        if !covered[idx] {
                            covered[idx] = true;
                            hits.push(idx);
                        }
                    }
                }
            }
        };

        if points.len() == 1 {
            mark(self, points[0], points[0]);
        }
        for pair in points.windows(2) {
            mark(self, pair[0], pair[1]);
        }

        for idx in hits {
            self.blend_at(idx * 4, color);
        }
    }

    fn radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop]) {
        if radius <= 0.0 {
            return;
        }
        let x0 = (center.x - radius).floor() as i64;
        let y0 = (center.y - radius).floor() as i64;
        let x1 = (center.x + radius).ceil() as i64;
        let y1 = (center.y + radius).ceil() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = p.distance(center) / radius;
                if t <= 1.0 {
                    self.blend_pixel(px, py, sample_stops(stops, t));
                }
            }
        }
    }

    fn vertical_gradient(&mut self, stops: &[ColorStop]) {
        for py in 0..self.height {
            let t = (py as f32 + 0.5) / self.height as f32;
            let color = sample_stops(stops, t);
            for px in 0..self.width {
                self.blend_pixel(px as i64, py as i64, color);
            }
        }
    }

    /// Get pixel buffer
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA at (x, y), transparent black when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
