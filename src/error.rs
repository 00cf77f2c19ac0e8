use std::path::PathBuf;
use thiserror::Error;

/// Opaque error coming back from the loading collaborator
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a model asset could not be turned into a model entity
#[derive(Debug, Error)]
pub enum LoadCause {
    #[error("unsupported URI scheme `{0}`")]
    UnsupportedScheme(String),

    #[error(transparent)]
    Import(BoxedCause),

    #[error("loader stopped before delivering a result")]
    LoaderDisconnected,

    #[error("malformed file URI")]
    MalformedUri,
}

/// The single failure kind of a model load
#[derive(Debug, Error)]
#[error("failed to load model `{uri}`")]
pub struct AssetLoadFailure {
    pub uri: String,
    #[source]
    pub cause: LoadCause,
}

impl AssetLoadFailure {
    pub fn new(uri: impl Into<String>, cause: LoadCause) -> Self {
        Self {
            uri: uri.into(),
            cause,
        }
    }

    /// Wrap any error from the loading collaborator without interpreting it
    pub fn import(uri: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        Self::new(uri, LoadCause::Import(cause.into()))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("viewport dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel ratio must be a positive number, got {0}")]
    InvalidPixelRatio(f64),

    #[error("field of view must lie strictly between 0 and 180 degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },

    #[error("aspect ratio must be a positive number, got {0}")]
    InvalidAspect(f32),

    #[error("light intensity must be a non-negative number, got {0}")]
    InvalidIntensity(f32),

    #[error("model scale must be a positive number, got {0}")]
    InvalidScale(f32),

    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create render surface")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    Adapter(String),

    #[error("failed to create graphics device")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface does not support any texture format")]
    NoSurfaceFormat,

    #[error("failed to acquire the next frame")]
    Surface(#[from] wgpu::SurfaceError),
}

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid viewer configuration")]
    Config(#[from] ConfigError),

    #[error("renderer failure")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Load(#[from] AssetLoadFailure),

    #[error("a model load is already in progress")]
    LoadInProgress,

    #[error("a model is already loaded")]
    ModelAlreadyLoaded,

    #[error("no model load is pending")]
    NoPendingLoad,

    #[error("failed to spawn the asset loader thread")]
    SpawnLoader(#[source] std::io::Error),
}
