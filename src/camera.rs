use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::math::lerp;
use crate::render::types::CameraUniform;

/// Perspective camera that always looks at a fixed authored target
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    start: Vec3,
    end: Vec3,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let start = Vec3::from_array(config.start);
        Self {
            position: start,
            target: Vec3::from_array(config.look_at),
            fov_y: config.fov_degrees.to_radians(),
            aspect: sanitize_aspect(aspect),
            near: config.near,
            far: config.far,
            start,
            end: Vec3::from_array(config.end),
        }
    }

    /// Place the camera along the start -> end path; progress is clamped
    pub fn follow_path(&mut self, progress: f32) {
        let t = progress.clamp(0.0, 1.0);
        self.position = Vec3::new(
            lerp(self.start.x, self.end.x, t),
            lerp(self.start.y, self.end.y, t),
            lerp(self.start.z, self.end.z, t),
        );
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = sanitize_aspect(width as f32 / height as f32);
        }
    }

    pub fn path(&self) -> (Vec3, Vec3) {
        (self.start, self.end)
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn to_uniform(&self, time: f32) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            position: self.position.to_array(),
            time,
            right: self.right().to_array(),
            _pad0: 0.0,
            up: self.up().to_array(),
            _pad1: 0.0,
        }
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_endpoints() {
        let config = CameraConfig::default();
        let mut camera = Camera::new(&config, 16.0 / 9.0);
        camera.follow_path(0.0);
        assert_eq!(camera.position, Vec3::new(0.0, -5.0, 120.0));
        camera.follow_path(1.0);
        assert_eq!(camera.position, Vec3::new(0.0, 60.0, 20.0));
        camera.follow_path(2.0);
        assert_eq!(camera.position, Vec3::new(0.0, 60.0, 20.0));
    }

    #[test]
    fn look_at_target_is_centered() {
        let camera = Camera::new(&CameraConfig::default(), 1.5);
        let clip = camera.view_projection() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    }

    #[test]
    fn degenerate_aspect_is_ignored() {
        let mut camera = Camera::new(&CameraConfig::default(), f32::NAN);
        assert_eq!(camera.aspect, 1.0);
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, 1.0);
        camera.set_aspect(800, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
