// config.rs - Immutable scene constants, loadable from JSON
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Terraced staircase leading up to the temple complex
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StairConfig {
    pub count: usize,
    pub width: f32,
    /// Extra width added to the bottom step, tapering to zero at the top
    pub taper: f32,
    pub depth: f32,
    pub height: f32,
    pub top_y: f32,
    pub top_z: f32,
    /// Height the lowest resting step waits at before activation
    pub resting_base: f32,
    /// Each further step rests this much lower than the previous one
    pub resting_spacing: f32,
}

impl Default for StairConfig {
    fn default() -> Self {
        Self {
            count: 80,
            width: 20.0,
            taper: 20.0,
            depth: 2.0,
            height: 0.5,
            top_y: 40.0,
            top_z: -45.0,
            resting_base: -30.0,
            resting_spacing: 2.0,
        }
    }
}

/// Main temple hall with roof spikes, doorway and flanking columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StructureConfig {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub z: f32,
    pub spike_rows: usize,
    pub spikes_per_row: usize,
    pub spike_radius: f32,
    pub spike_height: f32,
    pub door_width: f32,
    pub door_height: f32,
    pub frame_thickness: f32,
    pub column_x: f32,
    pub column_z: f32,
    pub column_radius: f32,
    pub column_height: f32,
    pub capital_radius: f32,
    pub capital_height: f32,
    pub platform_width: f32,
    pub platform_depth: f32,
    pub back_wall_height: f32,
    pub back_wall_depth: f32,
    pub back_wall_z: f32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            width: 44.0,
            height: 35.0,
            depth: 20.0,
            z: -50.0,
            spike_rows: 4,
            spikes_per_row: 30,
            spike_radius: 0.3,
            spike_height: 2.5,
            door_width: 10.0,
            door_height: 22.0,
            frame_thickness: 1.5,
            column_x: 14.0,
            column_z: -35.0,
            column_radius: 2.0,
            column_height: 22.0,
            capital_radius: 2.5,
            capital_height: 2.0,
            platform_width: 160.0,
            platform_depth: 140.0,
            back_wall_height: 12.0,
            back_wall_depth: 4.0,
            back_wall_z: -120.0,
        }
    }
}

/// Raised altar block with plinth, corner horns and a single ramp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AltarConfig {
    pub size: f32,
    pub height: f32,
    pub z: f32,
    /// Plinth thickness; the ramp apex stops this far below the altar top
    pub step_thickness: f32,
    pub horn_size: f32,
    pub ramp_run: f32,
    pub ramp_width: f32,
}

impl Default for AltarConfig {
    fn default() -> Self {
        Self {
            size: 22.0,
            height: 9.0,
            z: -15.0,
            step_thickness: 1.0,
            horn_size: 1.5,
            ramp_run: 35.0,
            ramp_width: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub dust_count: usize,
    pub smoke_count: usize,
    pub cloud_count: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            dust_count: 400,
            smoke_count: 100,
            cloud_count: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub start: [f32; 3],
    pub end: [f32; 3],
    pub look_at: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 55.0,
            near: 0.1,
            far: 3000.0,
            start: [0.0, -5.0, 120.0],
            end: [0.0, 60.0, 20.0],
            look_at: [0.0, 30.0, -50.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressConfig {
    /// Fraction of the remaining gap closed per frame
    pub damping: f32,
    /// Total scrollable page height in pixels
    pub scroll_range: f32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            damping: 0.05,
            scroll_range: 38_000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    pub marble_size: u32,
    pub marble_veins: usize,
    pub stone_size: u32,
    pub stone_dots: usize,
    pub stone_banding: bool,
    pub smoke_size: u32,
    pub sky_width: u32,
    pub sky_height: u32,
    pub sky_stars: usize,
    pub sky_nebulae: usize,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            marble_size: 1024,
            marble_veins: 15,
            stone_size: 512,
            stone_dots: 8000,
            stone_banding: true,
            smoke_size: 64,
            sky_width: 2048,
            sky_height: 1024,
            sky_stars: 600,
            sky_nebulae: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    pub gold: u32,
    pub entrance: u32,
    pub floor: u32,
    pub fog: u32,
    pub fog_density: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            gold: 0xffd700,
            entrance: 0x221100,
            floor: 0xa1c4fd,
            fog: 0x8fa3c0,
            fog_density: 0.006,
        }
    }
}

/// Scene constants - created once per scene instance, never mutated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub stairs: StairConfig,
    pub structure: StructureConfig,
    pub altar: AltarConfig,
    /// World offset applied to the whole temple/altar group
    pub complex_origin: [f32; 3],
    pub sky_radius: f32,
    pub ground_size: f32,
    pub ground_y: f32,
    pub particles: ParticleConfig,
    pub camera: CameraConfig,
    pub progress: ProgressConfig,
    pub textures: TextureConfig,
    pub palette: PaletteConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            stairs: StairConfig::default(),
            structure: StructureConfig::default(),
            altar: AltarConfig::default(),
            complex_origin: [0.0, 40.0, -50.0],
            sky_radius: 1000.0,
            ground_size: 1000.0,
            ground_y: -5.0,
            particles: ParticleConfig::default(),
            camera: CameraConfig::default(),
            progress: ProgressConfig::default(),
            textures: TextureConfig::default(),
            palette: PaletteConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Load from a JSON file; missing fields fall back to defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would build degenerate geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("stairs.width", self.stairs.width),
            ("stairs.depth", self.stairs.depth),
            ("stairs.height", self.stairs.height),
            ("structure.width", self.structure.width),
            ("structure.height", self.structure.height),
            ("structure.depth", self.structure.depth),
            ("altar.size", self.altar.size),
            ("altar.height", self.altar.height),
            ("altar.ramp_run", self.altar.ramp_run),
            ("altar.ramp_width", self.altar.ramp_width),
            ("sky_radius", self.sky_radius),
            ("ground_size", self.ground_size),
            ("camera.fov_degrees", self.camera.fov_degrees),
            ("camera.near", self.camera.near),
            ("progress.scroll_range", self.progress.scroll_range),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
        }

        if self.stairs.count == 0 {
            return Err(ConfigError::Invalid("stairs.count must be > 0".into()));
        }
        if self.structure.spike_rows < 2 || self.structure.spikes_per_row < 2 {
            return Err(ConfigError::Invalid(
                "roof spike grid needs at least 2 rows and 2 spikes per row".into(),
            ));
        }
        if !(0.0..self.altar.height).contains(&self.altar.step_thickness) {
            return Err(ConfigError::Invalid(format!(
                "altar.step_thickness must be in [0, {}), got {}",
                self.altar.height, self.altar.step_thickness
            )));
        }
        if self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid("camera.far must exceed camera.near".into()));
        }
        if !(self.progress.damping > 0.0 && self.progress.damping <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "progress.damping must be in (0, 1], got {}",
                self.progress.damping
            )));
        }
        Ok(())
    }

    /// Altar top measured in world space
    pub fn altar_top_world(&self) -> f32 {
        self.complex_origin[1] + self.altar.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_sky_radius_is_rejected() {
        let mut config = SceneConfig::default();
        config.sky_radius = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sky_radius"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "stairs": { "count": 12 },
            "sky_radius": 500.0
        }"#;
        let config = SceneConfig::from_json(json).unwrap();
        assert_eq!(config.stairs.count, 12);
        assert_eq!(config.stairs.width, 20.0);
        assert_eq!(config.altar.height, 9.0);
        assert_eq!(config.sky_radius, 500.0);
        assert_eq!(config.ground_y, -5.0);
    }

    #[test]
    fn rejects_step_thickness_above_altar() {
        let mut config = SceneConfig::default();
        config.altar.step_thickness = config.altar.height;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_nan_dimension() {
        let mut config = SceneConfig::default();
        config.stairs.depth = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let config = SceneConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let back = SceneConfig::from_json(&text).unwrap();
        assert_eq!(back, config);
    }
}
