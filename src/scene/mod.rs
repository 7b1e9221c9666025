// scene/mod.rs - Retained scene graph: static architecture plus per-frame driven objects
pub mod builder;
pub mod geometry;
pub mod materials;

use glam::{Mat4, Quat, Vec3};

use crate::math::{ease_out_cubic, lerp};

pub use builder::build;
pub use geometry::{Mesh, Primitive};
pub use materials::{BlendMode, Material, MaterialId, MaterialLibrary, Side};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn rotated_x(mut self, radians: f32) -> Self {
        self.rotation = Quat::from_rotation_x(radians) * self.rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Geometry that is placed once and never touched by the frame loop
#[derive(Debug, Clone, PartialEq)]
pub struct StaticObject {
    name: &'static str,
    primitive: Primitive,
    transform: Transform,
    material: MaterialId,
}

impl StaticObject {
    pub(crate) fn new(
        name: &'static str,
        primitive: Primitive,
        transform: Transform,
        material: MaterialId,
    ) -> Self {
        Self {
            name,
            primitive,
            transform,
            material,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

/// Objects the frame loop is allowed to reposition
pub trait Driven {
    fn name(&self) -> &str;
    fn primitive(&self) -> &Primitive;
    fn transform(&self) -> &Transform;
    fn material(&self) -> MaterialId;
    /// Apply the overall smoothed progress in [0, 1]
    fn drive(&mut self, progress: f32);
}

/// Multiplier applied to progress before thresholds are compared
const STAIR_PROGRESS_GAIN: f32 = 1.3;
/// How quickly a step goes from resting to placed once past its threshold
const STAIR_POP_RATE: f32 = 4.0;

/// One terrace step rising from its resting height into place
#[derive(Debug, Clone, PartialEq)]
pub struct StairSegment {
    index: usize,
    resting_height: f32,
    target_height: f32,
    activation_threshold: f32,
    primitive: Primitive,
    transform: Transform,
    material: MaterialId,
}

impl StairSegment {
    pub(crate) fn new(
        index: usize,
        count: usize,
        size: Vec3,
        z: f32,
        resting_height: f32,
        target_height: f32,
        material: MaterialId,
    ) -> Self {
        Self {
            index,
            resting_height,
            target_height,
            activation_threshold: index as f32 / (count + 8) as f32,
            primitive: Primitive::Box { size },
            transform: Transform::at(Vec3::new(0.0, resting_height, z)),
            material,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn resting_height(&self) -> f32 {
        self.resting_height
    }

    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    pub fn activation_threshold(&self) -> f32 {
        self.activation_threshold
    }

    pub fn height(&self) -> f32 {
        self.transform.position.y
    }

    /// Linear activation in [0, 1] before easing
    pub fn activation(&self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        ((progress * STAIR_PROGRESS_GAIN - self.activation_threshold) * STAIR_POP_RATE)
            .clamp(0.0, 1.0)
    }

    pub fn height_at(&self, progress: f32) -> f32 {
        let t = ease_out_cubic(self.activation(progress));
        lerp(self.resting_height, self.target_height, t)
    }

    /// Smallest progress at which this step is fully placed
    pub fn placed_at(&self) -> f32 {
        ((self.activation_threshold + 1.0 / STAIR_POP_RATE) / STAIR_PROGRESS_GAIN).min(1.0)
    }
}

impl Driven for StairSegment {
    fn name(&self) -> &str {
        "stair"
    }

    fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn material(&self) -> MaterialId {
        self.material
    }

    fn drive(&mut self, progress: f32) {
        self.transform.position.y = self.height_at(progress);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: [f32; 3],
    pub ambient_intensity: f32,
    pub key: DirectionalLight,
    pub back: DirectionalLight,
    pub temple: PointLight,
}

/// Exponential-squared distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub density: f32,
}

impl Fog {
    /// Fraction of the surface colour kept at `distance`
    pub fn visibility(&self, distance: f32) -> f32 {
        let d = self.density * distance.max(0.0);
        (-d * d).exp().clamp(0.0, 1.0)
    }
}

/// Everything one scene instance renders
#[derive(Debug, Clone)]
pub struct SceneGraph {
    statics: Vec<StaticObject>,
    stairs: Vec<StairSegment>,
    pub materials: MaterialLibrary,
    pub lighting: Lighting,
    pub fog: Fog,
    /// Horizontal UV offset of the sky texture
    pub sky_offset: f32,
}

impl SceneGraph {
    pub(crate) fn new(
        statics: Vec<StaticObject>,
        stairs: Vec<StairSegment>,
        materials: MaterialLibrary,
        lighting: Lighting,
        fog: Fog,
    ) -> Self {
        Self {
            statics,
            stairs,
            materials,
            lighting,
            fog,
            sky_offset: 0.0,
        }
    }

    pub fn statics(&self) -> &[StaticObject] {
        &self.statics
    }

    pub fn stairs(&self) -> &[StairSegment] {
        &self.stairs
    }

    /// Only driven objects are reachable mutably
    pub fn driven_mut(&mut self) -> impl Iterator<Item = &mut dyn Driven> {
        self.stairs.iter_mut().map(|s| s as &mut dyn Driven)
    }

    pub fn find(&self, name: &str) -> Option<&StaticObject> {
        self.statics.iter().find(|o| o.name == name)
    }

    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a StaticObject> + 'a {
        self.statics.iter().filter(move |o| o.name == name)
    }

    pub fn object_count(&self) -> usize {
        self.statics.len() + self.stairs.len()
    }
}
