use crate::config::PaletteConfig;
use crate::math::hex_to_rgb;
use crate::textures::{TextureKind, TextureSet};

/// Index into a [`MaterialLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Opaque,
    Alpha,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: &'static str,
    pub base_color: [f32; 3],
    pub texture: Option<TextureKind>,
    pub uv_repeat: [f32; 2],
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub blend: BlendMode,
    pub side: Side,
    /// Whether scene fog tints this material
    pub fog: bool,
    /// Point size in world units for particle materials
    pub point_size: Option<f32>,
    /// Set when the referenced texture was substituted with a flat fallback
    pub fallback: bool,
}

impl Material {
    fn solid(name: &'static str, color: u32) -> Self {
        Self {
            name,
            base_color: hex_to_rgb(color),
            texture: None,
            uv_repeat: [1.0, 1.0],
            roughness: 0.5,
            metalness: 0.0,
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            opacity: 1.0,
            blend: BlendMode::Opaque,
            side: Side::Front,
            fog: true,
            point_size: None,
            fallback: false,
        }
    }

    fn textured(self, kind: TextureKind, textures: &TextureSet) -> Self {
        let texture = textures.get(kind);
        Self {
            texture: Some(kind),
            uv_repeat: texture.repeat,
            fallback: texture.fallback,
            ..self
        }
    }

    fn surface(self, roughness: f32, metalness: f32) -> Self {
        Self {
            roughness,
            metalness,
            ..self
        }
    }

    fn glow(self, color: u32, intensity: f32) -> Self {
        Self {
            emissive: hex_to_rgb(color),
            emissive_intensity: intensity,
            ..self
        }
    }

    fn points(self, size: f32, opacity: f32, blend: BlendMode) -> Self {
        Self {
            point_size: Some(size),
            opacity,
            blend,
            ..self
        }
    }
}

/// Materials shared by every object in one scene
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    pub marble: MaterialId,
    pub stone: MaterialId,
    pub gold: MaterialId,
    pub entrance: MaterialId,
    pub floor: MaterialId,
    pub sky: MaterialId,
    pub smoke: MaterialId,
    pub dust: MaterialId,
    pub cloud: MaterialId,
}

impl MaterialLibrary {
    pub fn new(palette: &PaletteConfig, textures: &TextureSet) -> Self {
        let mut materials = Vec::new();
        let mut add = |material: Material| {
            materials.push(material);
            MaterialId(materials.len() - 1)
        };

        let marble = add(
            Material::solid("marble", 0xffffff)
                .textured(TextureKind::Marble, textures)
                .surface(0.1, 0.1)
                .glow(0xffeebb, 0.25),
        );
        let stone = add(
            Material::solid("stone", 0xebebeb)
                .textured(TextureKind::Stone, textures)
                .surface(0.95, 0.05),
        );
        let gold = add(
            Material::solid("gold", palette.gold)
                .surface(0.1, 0.8)
                .glow(0xffaa00, 0.6),
        );
        let entrance = add(
            Material::solid("entrance", palette.entrance)
                .surface(0.8, 0.0)
                .glow(0x331100, 0.2),
        );
        let floor = add(Material {
            opacity: 0.9,
            blend: BlendMode::Alpha,
            ..Material::solid("floor", palette.floor).surface(0.1, 0.2)
        });
        let sky = add(Material {
            side: Side::Back,
            fog: false,
            ..Material::solid("sky", 0xffffff).textured(TextureKind::Sky, textures)
        });
        let smoke = add(Material {
            fog: false,
            ..Material::solid("smoke", 0xdddddd)
                .textured(TextureKind::Smoke, textures)
                .points(8.0, 0.4, BlendMode::Additive)
        });
        let dust = add(Material::solid("dust", palette.gold).points(0.3, 0.6, BlendMode::Additive));
        let cloud = add(Material {
            fog: false,
            ..Material::solid("cloud", 0xffffff)
                .textured(TextureKind::Smoke, textures)
                .points(160.0, 0.0, BlendMode::Alpha)
        });

        Self {
            materials,
            marble,
            stone,
            gold,
            entrance,
            floor,
            sky,
            smoke,
            dust,
            cloud,
        }
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().enumerate().map(|(i, m)| (MaterialId(i), m))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
