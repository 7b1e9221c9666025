// context.rs - Everything one running scene instance owns
use rand::rngs::StdRng;

use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::core::{FrameInfo, Viewport};
use crate::director::{AnimationDirector, FrameInput};
use crate::particles::Particles;
use crate::progress::{PhaseTable, ProgressMapper};
use crate::scene::{self, SceneGraph};
use crate::textures::TextureSet;

/// Scene state for one start/stop cycle; dropped as a whole on stop
pub struct SceneContext {
    pub config: SceneConfig,
    pub textures: TextureSet,
    pub graph: SceneGraph,
    pub particles: Particles,
    pub mapper: ProgressMapper,
    pub director: AnimationDirector,
    pub camera: Camera,
    viewport: Viewport,
    rng: StdRng,
    frames: u64,
    time: f32,
}

impl SceneContext {
    /// Generate textures, build the graph and scatter particles
    pub fn new(config: SceneConfig, viewport: Viewport, mut rng: StdRng) -> Self {
        let textures = TextureSet::generate(&config.textures, &mut rng);
        let graph = scene::build(&config, &textures);
        let particles = Particles::new(&config, &mut rng);
        let mapper = ProgressMapper::from_config(&config.progress);
        let camera = Camera::new(&config.camera, viewport.aspect());

        log::info!(
            "Scene context ready: {} objects, {} particles, {} texture bytes",
            graph.object_count(),
            particles.total(),
            textures.byte_size()
        );

        Self {
            config,
            textures,
            graph,
            particles,
            mapper,
            director: AnimationDirector::new(PhaseTable::landing()),
            camera,
            viewport,
            rng,
            frames: 0,
            time: 0.0,
        }
    }

    /// Swap the phase windows the director evaluates
    pub fn with_phases(mut self, phases: PhaseTable) -> Self {
        self.director = AnimationDirector::new(phases);
        self
    }

    /// Tick the mapper once and run the director
    pub fn advance(&mut self, time: f32, delta: f32) -> FrameInfo {
        let smoothed = self.mapper.tick();
        let input = FrameInput {
            time,
            delta,
            smoothed,
            raw: self.mapper.raw(),
            range: self.mapper.range(),
        };
        self.director.frame(
            input,
            &mut self.graph,
            &mut self.particles,
            &mut self.camera,
            &mut self.rng,
        );

        self.frames += 1;
        self.time = time;
        FrameInfo::new(self.frames, time, delta, smoothed, input.raw)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.width, viewport.height);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}
