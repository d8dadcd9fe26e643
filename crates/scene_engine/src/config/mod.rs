//! Configuration system
//!
//! Settings are plain serde structs. Files are read and written as TOML or RON,
//! picked by extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::{Point3, Vec3};
use crate::render::camera::{Camera, Frustum};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match Format::of(path)? {
            Format::Toml => Self::from_toml_str(&contents),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Parse configuration from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Camera placement and perspective frustum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Camera position in world space
    pub location: Point3,
    /// Direction the camera looks in; need not be normalized
    pub direction: Vec3,
    /// Approximate up vector
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub up_fov_degrees: f32,
    /// Width over height
    pub aspect_ratio: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            location: Point3::origin(),
            direction: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::y(),
            up_fov_degrees: 60.0,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl ViewConfig {
    /// Frustum extents described by this view
    pub fn frustum(&self) -> Frustum {
        Frustum::from_fov(self.up_fov_degrees, self.aspect_ratio, self.near, self.far)
    }

    /// Camera placed and shaped by this view
    pub fn build_camera(&self) -> Camera {
        let mut camera = Camera::new(self.frustum());
        camera.look_at(self.location, self.location + self.direction, self.up);
        camera
    }
}

impl Config for ViewConfig {}

/// Settings for a headless scene run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Camera setup
    pub view: ViewConfig,
    /// Log filter: off, error, warn, info, debug or trace
    pub log_level: String,
    /// Frames to simulate
    pub frame_count: u32,
    /// Fixed time step in seconds
    pub time_step: f64,
    /// Number of group nodes under the root
    pub group_count: usize,
    /// Visuals attached to each group
    pub visuals_per_group: usize,
    /// Seed for scene placement
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            log_level: "info".to_string(),
            frame_count: 120,
            time_step: 1.0 / 60.0,
            group_count: 4,
            visuals_per_group: 16,
            seed: 7,
        }
    }
}

impl Config for SceneConfig {}
