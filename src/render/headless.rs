use log::trace;

use super::{Renderer, Viewport};
use crate::camera::PerspectiveCamera;
use crate::error::RenderError;
use crate::scene::SceneGraph;

/// Renderer without a GPU. Records what it was asked to do.
#[derive(Debug, Default, Clone)]
pub struct HeadlessRenderer {
    viewport: Option<Viewport>,
    attach_count: usize,
    resize_count: usize,
    draw_count: u64,
    last_node_count: usize,
    last_aspect: Option<f32>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Attaches that actually bound a surface
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    /// Scene size seen by the most recent draw
    pub fn last_node_count(&self) -> usize {
        self.last_node_count
    }

    /// Camera aspect seen by the most recent draw
    pub fn last_aspect(&self) -> Option<f32> {
        self.last_aspect
    }
}

impl Renderer for HeadlessRenderer {
    fn attach(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        if self.viewport.as_ref() == Some(viewport) {
            return Ok(());
        }
        self.viewport = Some(*viewport);
        self.attach_count += 1;
        Ok(())
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.viewport = Some(*viewport);
        self.resize_count += 1;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        self.draw_count += 1;
        self.last_node_count = scene.len();
        self.last_aspect = Some(camera.aspect);
        trace!("headless draw {} with {} nodes", self.draw_count, scene.len());
        Ok(())
    }
}
