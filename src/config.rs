// config.rs - Viewer configuration, defaults and validation
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_MODEL_PATH: &str = "./assets/photorealistic_plant.glb";

/// Complete viewer setup, loadable from JSON with every field optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
    /// RGBA clear color, components in 0..=1
    pub clear_color: [f64; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Initial aspect ratio, replaced by the viewport's on the first resize
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// 0xRRGGBB
    pub sky_color: u32,
    /// 0xRRGGBB
    pub ground_color: u32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
    pub scale: f32,
    /// Radians added to the model's Y rotation when it is attached
    pub rotation_offset: f32,
    /// Radians added to the model's Y rotation every frame
    pub rotation_per_frame: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Model Viewer".to_string(),
            viewport: ViewportConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 440,
            height: 248,
            pixel_ratio: 1.0,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 1.2, 3.0),
            target: Vec3::ZERO,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            sky_color: 0xffffff,
            ground_color: 0x444444,
            intensity: 1.2,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_MODEL_PATH.to_string(),
            scale: 1.4,
            rotation_offset: std::f32::consts::PI,
            rotation_per_frame: 0.003,
        }
    }
}

impl ViewerConfig {
    /// Read a JSON config file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;
        self.camera.validate()?;

        let intensity = self.light.intensity;
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(ConfigError::InvalidIntensity(intensity));
        }

        let scale = self.model.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }

        Ok(())
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(ConfigError::InvalidPixelRatio(self.pixel_ratio));
        }
        Ok(())
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN fails both comparisons
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.fov));
        }
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            return Err(ConfigError::InvalidAspect(self.aspect));
        }
        if !(self.near > 0.0 && self.near < self.far && self.far.is_finite()) {
            return Err(ConfigError::InvalidClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        Ok(())
    }
}
