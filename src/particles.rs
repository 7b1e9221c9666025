// particles.rs - Dust, smoke and cloud point systems
use glam::Vec3;
use rand::{Rng, RngCore};

use crate::config::SceneConfig;

/// Fixed-size particle storage; lengths never change after construction
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    speed: Vec<f32>,
    phase: Vec<f32>,
}

impl ParticleBuffer {
    pub fn new(count: usize) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            speed: vec![0.0; count],
            phase: vec![0.0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.speed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speed.is_empty()
    }

    /// Flat xyz triples
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn speeds(&self) -> &[f32] {
        &self.speed
    }

    pub fn phases(&self) -> &[f32] {
        &self.phase
    }

    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    pub fn set_position(&mut self, i: usize, p: Vec3) {
        self.positions[i * 3..i * 3 + 3].copy_from_slice(&p.to_array());
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.chunks_exact(3).map(Vec3::from_slice)
    }
}

/// A point system advanced once per frame
pub trait ParticleSystem {
    fn label(&self) -> &'static str;
    fn buffer(&self) -> &ParticleBuffer;
    /// Mutate positions in place; must not allocate
    fn update(&mut self, time: f32, dt: f32, rng: &mut dyn RngCore);
}

/// Axis-aligned region a system scatters into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: Vec3,
    pub max: Vec3,
}

impl Region {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let mut axis = |lo: f32, hi: f32| if hi > lo { rng.gen_range(lo..hi) } else { lo };
        Vec3::new(
            axis(self.min.x, self.max.x),
            axis(self.min.y, self.max.y),
            axis(self.min.z, self.max.z),
        )
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Gold motes rising through the whole scene and wrapping to the floor
#[derive(Debug, Clone)]
pub struct DustField {
    buffer: ParticleBuffer,
    region: Region,
}

impl DustField {
    pub const REGION: Region = Region {
        min: Vec3::new(-100.0, -20.0, -75.0),
        max: Vec3::new(100.0, 80.0, 75.0),
    };
    pub const SPEED: (f32, f32) = (1.2, 4.2);

    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let region = Self::REGION;
        let mut buffer = ParticleBuffer::new(count);
        for i in 0..count {
            buffer.set_position(i, region.sample(rng));
            buffer.speed[i] = rng.gen_range(Self::SPEED.0..Self::SPEED.1);
        }
        Self { buffer, region }
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

impl ParticleSystem for DustField {
    fn label(&self) -> &'static str {
        "dust"
    }

    fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    fn update(&mut self, _time: f32, dt: f32, _rng: &mut dyn RngCore) {
        let (floor, ceiling) = (self.region.min.y, self.region.max.y);
        for (i, speed) in self.buffer.speed.iter().enumerate() {
            let y = &mut self.buffer.positions[i * 3 + 1];
            *y += speed * dt;
            if *y > ceiling {
                *y = floor;
            }
        }
    }
}

/// Smoke rising from the altar top, respawning at the footprint when too high
#[derive(Debug, Clone)]
pub struct SmokeColumn {
    buffer: ParticleBuffer,
    /// Centre of the altar top in world space
    anchor: Vec3,
    ceiling: f32,
}

impl SmokeColumn {
    pub const FOOTPRINT: f32 = 5.0;
    pub const SPAWN_LIFT: f32 = 1.0;
    pub const INITIAL_SPREAD: f32 = 20.0;
    pub const RISE: f32 = 35.0;
    pub const SWAY: f32 = 1.2;
    pub const SPEED: (f32, f32) = (3.0, 9.0);

    pub fn new<R: Rng + ?Sized>(count: usize, anchor: Vec3, rng: &mut R) -> Self {
        let mut buffer = ParticleBuffer::new(count);
        for i in 0..count {
            let mut p = Self::footprint_point(anchor, rng);
            p.y += rng.gen_range(0.0..Self::INITIAL_SPREAD);
            buffer.set_position(i, p);
            buffer.speed[i] = rng.gen_range(Self::SPEED.0..Self::SPEED.1);
            buffer.phase[i] = rng.gen_range(0.0..100.0);
        }
        Self {
            buffer,
            anchor,
            ceiling: anchor.y + Self::RISE,
        }
    }

    /// Build from config: anchor is the altar top with the complex origin applied
    pub fn from_config<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        let origin = Vec3::from_array(config.complex_origin);
        let anchor = origin + Vec3::new(0.0, config.altar.height, config.altar.z);
        Self::new(config.particles.smoke_count, anchor, rng)
    }

    fn footprint_point<R: Rng + ?Sized>(anchor: Vec3, rng: &mut R) -> Vec3 {
        let half = Self::FOOTPRINT / 2.0;
        Vec3::new(
            anchor.x + rng.gen_range(-half..half),
            anchor.y + Self::SPAWN_LIFT,
            anchor.z + rng.gen_range(-half..half),
        )
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }
}

impl ParticleSystem for SmokeColumn {
    fn label(&self) -> &'static str {
        "smoke"
    }

    fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    fn update(&mut self, time: f32, dt: f32, rng: &mut dyn RngCore) {
        for i in 0..self.buffer.len() {
            let mut p = self.buffer.position(i);
            p.y += self.buffer.speed[i] * dt;
            p.x += (time + self.buffer.phase[i]).sin() * Self::SWAY * dt;
            if p.y > self.ceiling {
                p = Self::footprint_point(self.anchor, rng);
            }
            self.buffer.set_position(i, p);
        }
    }
}

/// Large soft billboards drifting side to side in front of the camera path
#[derive(Debug, Clone)]
pub struct CloudBank {
    buffer: ParticleBuffer,
    base_x: Vec<f32>,
    amplitude: Vec<f32>,
}

impl CloudBank {
    pub const REGION: Region = Region {
        min: Vec3::new(-150.0, 10.0, -20.0),
        max: Vec3::new(150.0, 90.0, 110.0),
    };
    pub const RATE: (f32, f32) = (0.05, 0.2);
    pub const AMPLITUDE: (f32, f32) = (5.0, 20.0);

    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut buffer = ParticleBuffer::new(count);
        let mut base_x = Vec::with_capacity(count);
        let mut amplitude = Vec::with_capacity(count);
        for i in 0..count {
            let p = Self::REGION.sample(rng);
            buffer.set_position(i, p);
            buffer.speed[i] = rng.gen_range(Self::RATE.0..Self::RATE.1);
            buffer.phase[i] = rng.gen_range(0.0..std::f32::consts::TAU);
            base_x.push(p.x);
            amplitude.push(rng.gen_range(Self::AMPLITUDE.0..Self::AMPLITUDE.1));
        }
        Self {
            buffer,
            base_x,
            amplitude,
        }
    }

    pub fn base_x(&self, i: usize) -> f32 {
        self.base_x[i]
    }

    pub fn amplitude(&self, i: usize) -> f32 {
        self.amplitude[i]
    }
}

impl ParticleSystem for CloudBank {
    fn label(&self) -> &'static str {
        "clouds"
    }

    fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    fn update(&mut self, time: f32, _dt: f32, _rng: &mut dyn RngCore) {
        for i in 0..self.buffer.len() {
            let wave = (time * self.buffer.speed[i] + self.buffer.phase[i]).sin();
            self.buffer.positions[i * 3] = self.base_x[i] + wave * self.amplitude[i];
        }
    }
}

/// The three systems of one scene instance
#[derive(Debug, Clone)]
pub struct Particles {
    pub dust: DustField,
    pub smoke: SmokeColumn,
    pub clouds: CloudBank,
}

impl Particles {
    pub fn new<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Self {
        Self {
            dust: DustField::new(config.particles.dust_count, rng),
            smoke: SmokeColumn::from_config(config, rng),
            clouds: CloudBank::new(config.particles.cloud_count, rng),
        }
    }

    pub fn update(&mut self, time: f32, dt: f32, rng: &mut dyn RngCore) {
        for system in self.systems_mut() {
            system.update(time, dt, rng);
        }
    }

    pub fn systems(&self) -> [&dyn ParticleSystem; 3] {
        [&self.dust, &self.smoke, &self.clouds]
    }

    fn systems_mut(&mut self) -> [&mut dyn ParticleSystem; 3] {
        [&mut self.dust, &mut self.smoke, &mut self.clouds]
    }

    pub fn total(&self) -> usize {
        self.systems().iter().map(|s| s.buffer().len()).sum()
    }
}
