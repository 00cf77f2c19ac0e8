// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::config::ViewerConfig;
use crate::error::ConfigError;

#[derive(Parser, Debug, Clone)]
#[command(name = "model-viewer")]
#[command(about = "Display a glTF model with a slow turntable rotation", long_about = None)]
pub struct Cli {
    /// Model to load (.glb or .gltf); overrides the config file
    pub model: Option<String>,

    /// JSON config file; unspecified fields keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Viewport width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,

    /// Hemisphere light intensity
    #[arg(long)]
    pub intensity: Option<f32>,

    /// Uniform model scale
    #[arg(long)]
    pub scale: Option<f32>,

    /// Model rotation per frame in radians
    #[arg(long = "rotation-speed")]
    pub rotation_speed: Option<f32>,

    /// Render this many frames without a window, then exit
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u64>,
}

impl Cli {
    /// Defaults, then the config file, then command-line overrides
    pub fn resolve_config(&self) -> Result<ViewerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_file(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(model) = &self.model {
            config.model.path = model.clone();
        }
        if let Some(width) = self.width {
            config.viewport.width = width;
        }
        if let Some(height) = self.height {
            config.viewport.height = height;
        }
        if let Some(fov) = self.fov {
            config.camera.fov = fov;
        }
        if let Some(intensity) = self.intensity {
            config.light.intensity = intensity;
        }
        if let Some(scale) = self.scale {
            config.model.scale = scale;
        }
        if let Some(speed) = self.rotation_speed {
            config.model.rotation_per_frame = speed;
        }

        config.validate()?;
        Ok(config)
    }
}
