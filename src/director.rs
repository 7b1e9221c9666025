// director.rs - Per-frame choreography of everything progress drives
use rand::RngCore;

use crate::camera::Camera;
use crate::math::clamp01;
use crate::overlay::OverlayState;
use crate::particles::Particles;
use crate::progress::{PhaseProgress, PhaseTable};
use crate::scene::SceneGraph;

/// Horizontal sky UV drift per second
pub const SKY_DRIFT: f32 = 0.01;

/// Signals one frame is driven by
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    pub time: f32,
    pub delta: f32,
    /// Smoothed overall progress in [0, 1]
    pub smoothed: f32,
    /// Raw scroll offset in pixels
    pub raw: f32,
    /// Scrollable range in pixels
    pub range: f32,
}

impl FrameInput {
    pub fn smoothed_px(&self) -> f32 {
        clamp01(self.smoothed) * self.range.max(0.0)
    }
}

/// Turns progress into scene, camera and overlay state
#[derive(Debug, Clone, Default)]
pub struct AnimationDirector {
    phases: PhaseTable,
    progress: PhaseProgress,
    overlay: OverlayState,
}

impl AnimationDirector {
    pub fn new(phases: PhaseTable) -> Self {
        Self {
            phases,
            progress: PhaseProgress::default(),
            overlay: OverlayState::default(),
        }
    }

    /// Mutate driven objects, particles, camera, sky and overlay for one frame
    pub fn frame(
        &mut self,
        input: FrameInput,
        graph: &mut SceneGraph,
        particles: &mut Particles,
        camera: &mut Camera,
        rng: &mut dyn RngCore,
    ) {
        let smoothed = clamp01(input.smoothed);

        self.progress = self.phases.evaluate(input.raw, input.smoothed_px());

        for object in graph.driven_mut() {
            object.drive(smoothed);
        }

        particles.update(input.time, input.delta, rng);

        camera.follow_path(smoothed);

        graph.sky_offset = (input.time * SKY_DRIFT).rem_euclid(1.0);
        self.overlay = OverlayState::from_phases(&self.progress);

        let cloud = graph.materials.cloud;
        if let Some(material) = graph.materials.get_mut(cloud) {
            material.opacity = self.overlay.clouds;
        }
    }

    pub fn phases(&self) -> &PhaseTable {
        &self.phases
    }

    pub fn progress(&self) -> &PhaseProgress {
        &self.progress
    }

    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }
}
