pub mod camera;
pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod director;
pub mod math;
pub mod overlay;
pub mod particles;
pub mod progress;
pub mod render;
pub mod scene;
pub mod textures;

pub use config::SceneConfig;
pub use context::SceneContext;
pub use core::{EventBus, HostEvent, SceneLifecycle, Viewport};
