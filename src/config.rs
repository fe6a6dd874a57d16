//! Scene configuration, read from a JSON file with every field optional.

use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::controller::input::KeyBindings;
use crate::model::{Axis, CameraPose};

/// Environment variable naming the JSON config file.
pub const CONFIG_ENV: &str = "FLYSCENE_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// World units per tick
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub home_eye: [f32; 3],
    pub home_yaw: f32,
    pub home_pitch: f32,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub background: [u8; 3],
    pub billboard: BillboardConfig,
    pub particles: ParticleConfig,
    pub models: Vec<ModelConfig>,
    pub bindings: KeyBindings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BillboardConfig {
    pub radius: f32,
    pub height: f32,
    pub angular_speed: f32,
    pub video: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub spread: f32,
    pub drift_speed: f32,
    pub seed: u64,
}

/// One mesh to load and spin once it arrives.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub path: String,
    pub position: [f32; 3],
    #[serde(default = "default_model_color")]
    pub color: [u8; 3],
    pub axis: Axis,
    pub speed: f32,
}

fn default_model_color() -> [u8; 3] {
    [0x77, 0x77, 0xff]
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.5,
            look_sensitivity: 0.002,
            home_eye: [0.0, 1.6, 5.0],
            home_yaw: -FRAC_PI_2,
            home_pitch: 0.0,
            fov_y_degrees: 75.0,
            z_near: 0.1,
            z_far: 5000.0,
            background: [0x0a, 0x0a, 0x0a],
            billboard: BillboardConfig::default(),
            particles: ParticleConfig::default(),
            models: vec![
                ModelConfig {
                    name: "leafScan".into(),
                    path: "STLs/leafScan.stl".into(),
                    position: [0.0, 0.0, -3.0],
                    color: [0x77, 0x77, 0xff],
                    axis: Axis::Y,
                    speed: 0.01,
                },
                ModelConfig {
                    name: "pineCone".into(),
                    path: "STLs/pineCone.stl".into(),
                    position: [300.0, 100.0, -3.0],
                    color: [0xff, 0x77, 0x77],
                    axis: Axis::Z,
                    speed: 1.0,
                },
                ModelConfig {
                    name: "waterBird".into(),
                    path: "STLs/waterBird.stl".into(),
                    position: [-300.0, -1000.0, -3.0],
                    color: [0x77, 0xff, 0x77],
                    axis: Axis::X,
                    speed: 0.1,
                },
            ],
            bindings: KeyBindings::default(),
        }
    }
}

impl Default for BillboardConfig {
    fn default() -> Self {
        Self {
            radius: 1000.0,
            height: 60.0,
            angular_speed: 0.0005,
            video: Some("video/screen.mp4".into()),
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            spread: 5000.0,
            drift_speed: 0.0001,
            seed: 0x5eed,
        }
    }
}

impl SceneConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Load from `$FLYSCENE_CONFIG` if set, otherwise use defaults. A broken
    /// file is logged and replaced by defaults.
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => match Self::load(&path) {
                Ok(config) => {
                    tracing::info!(%path, models = config.models.len(), "loaded scene config");
                    config
                }
                Err(e) => {
                    tracing::warn!("{e}; using default scene config");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn home_pose(&self) -> CameraPose {
        CameraPose {
            eye: Vec3::from_array(self.home_eye),
            yaw: self.home_yaw,
            pitch: self.home_pitch,
        }
    }
}
