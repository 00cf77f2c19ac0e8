pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod loaders;
pub mod render;
pub mod scene;
pub mod types;
pub mod viewer;

pub use config::ViewerConfig;
pub use error::{AssetLoadFailure, ViewerError};
pub use viewer::{Viewer, ViewerState};
