/// Render target size in physical pixels plus the host's DPI scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale_factor: 1.0,
        }
    }

    pub fn with_scale(mut self, scale_factor: f32) -> Self {
        self.scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        self
    }

    /// A zero-area viewport cannot back a surface (minimised window)
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Size in logical points for the overlay layout
    pub fn logical_size(&self) -> (f32, f32) {
        (
            self.width as f32 / self.scale_factor,
            self.height as f32 / self.scale_factor,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_guards_zero_height() {
        assert_eq!(Viewport::new(800, 0).aspect(), 1.0);
        assert_eq!(Viewport::new(800, 400).aspect(), 2.0);
    }

    #[test]
    fn logical_size_divides_scale() {
        let vp = Viewport::new(2560, 1440).with_scale(2.0);
        assert_eq!(vp.logical_size(), (1280.0, 720.0));
    }

    #[test]
    fn bad_scale_falls_back() {
        assert_eq!(Viewport::new(10, 10).with_scale(0.0).scale_factor, 1.0);
    }

    #[test]
    fn empty_when_minimised() {
        assert!(Viewport::new(0, 720).is_empty());
        assert!(!Viewport::default().is_empty());
    }
}
