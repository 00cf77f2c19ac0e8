mod gpu;
mod headless;

pub use gpu::GpuRenderer;
pub use headless::HeadlessRenderer;

use crate::camera::PerspectiveCamera;
use crate::config::ViewportConfig;
use crate::error::RenderError;
use crate::scene::SceneGraph;

/// Display surface dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels
    pub width: u32,
    /// Height in logical pixels
    pub height: u32,
    /// Physical pixels per logical pixel
    pub pixel_ratio: f64,
    /// Exact backing size reported by the host, if it reported one
    surface_size: Option<(u32, u32)>,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
            surface_size: None,
        }
    }

    /// Pin the backing surface to the host's physical size instead of deriving it
    pub fn with_surface_size(mut self, width: u32, height: u32) -> Self {
        self.surface_size = Some((width, height));
        self
    }

    pub fn from_config(config: &ViewportConfig) -> Self {
        Self::new(config.width, config.height, config.pixel_ratio)
    }

    /// Size of the backing surface, never smaller than 1x1
    pub fn physical_size(&self) -> (u32, u32) {
        if let Some((width, height)) = self.surface_size {
            return (width.max(1), height.max(1));
        }
        let scale = |v: u32| ((v as f64 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    /// Width over height of the logical size
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Rendering backend the viewer drives
pub trait Renderer {
    /// Bind to the display surface. Attaching again with the same viewport is a no-op.
    fn attach(&mut self, viewport: &Viewport) -> Result<(), RenderError>;

    /// Match the backing surface to a new viewport
    fn resize(&mut self, viewport: &Viewport);

    /// Draw the scene once through the camera
    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn attach(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        (**self).attach(viewport)
    }

    fn resize(&mut self, viewport: &Viewport) {
        (**self).resize(viewport)
    }

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        (**self).render(scene, camera)
    }
}
