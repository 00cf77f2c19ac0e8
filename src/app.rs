use log::{error, info};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::frame::FrameIterator;
use crate::loaders::GltfLoader;
use crate::render::GpuRenderer;
use crate::viewer::Viewer;

/// Hosts a viewer in a window. winit's redraw cycle is the frame driver.
pub struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    viewer: Option<Viewer<GpuRenderer>>,
    frames: FrameIterator,
}

impl App {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            viewer: None,
            frames: FrameIterator::new(),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
        let viewport = &self.config.viewport;
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(self.config.title.clone())
                    .with_transparent(viewport.clear_color[3] < 1.0)
                    .with_inner_size(LogicalSize::new(viewport.width, viewport.height)),
            )?,
        );

        let mut config = self.config.clone();
        config.viewport.pixel_ratio = window.scale_factor();

        let renderer = pollster::block_on(GpuRenderer::new(window.clone(), config.viewport.clear_color))?;
        let mut viewer = Viewer::initialize(&config, renderer, GltfLoader::new())?;

        // The window may not get exactly the requested size
        let size = window.inner_size();
        viewer.resize_surface(size.width, size.height);

        // A failed load is logged by the viewer and never stops the window
        viewer.load_model(&config.model.path)?;

        self.window = Some(window);
        self.viewer = Some(viewer);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            error!("Failed to start viewer: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(viewer) = &mut self.viewer else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Closing after {} frames", viewer.frames_rendered());
                self.frames.handle().cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                viewer.resize_surface(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                viewer.set_pixel_ratio(scale_factor);
            }
            WindowEvent::RedrawRequested => {
                if self.frames.next().is_none() {
                    if self.frames.handle().is_cancelled() {
                        event_loop.exit();
                    }
                    return;
                }
                if let Err(e) = viewer.render_frame() {
                    error!("Render error: {}", e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
