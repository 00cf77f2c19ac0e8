//! The model viewer: one scene, one camera, one light, at most one model.
//!
//! Model loads run on a background thread and hand their result back over a
//! oneshot channel. The viewer applies that result on its own thread, so the
//! scene graph only ever has one writer.

use futures::channel::oneshot;
use log::{error, info, trace};
use std::sync::Arc;

use crate::camera::PerspectiveCamera;
use crate::config::{ModelConfig, ViewerConfig};
use crate::error::{AssetLoadFailure, LoadCause, RenderError, ViewerError};
use crate::frame::FrameSource;
use crate::loaders::AssetLoader;
use crate::render::{Renderer, Viewport};
use crate::scene::{HemisphereLight, ModelEntity, NodeId, SceneGraph};
use crate::types::ModelAsset;

type LoadResult = Result<ModelAsset, AssetLoadFailure>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    /// Light-only scene, no load attempted yet
    Initialized,
    ModelLoading,
    ModelLoaded,
    /// Last load failed; the viewer keeps rendering and may load again
    LoadFailed,
}

struct PendingLoad {
    uri: String,
    receiver: oneshot::Receiver<LoadResult>,
}

pub struct Viewer<R: Renderer> {
    renderer: R,
    loader: Arc<dyn AssetLoader>,
    viewport: Viewport,
    camera: PerspectiveCamera,
    scene: SceneGraph,
    model_config: ModelConfig,
    state: ViewerState,
    pending: Option<PendingLoad>,
    model: Option<NodeId>,
    frames_rendered: u64,
    load_failures: u32,
}

impl<R: Renderer> Viewer<R> {
    /// Validate `config`, build the light-only scene and attach the renderer
    pub fn initialize(
        config: &ViewerConfig,
        mut renderer: R,
        loader: impl AssetLoader,
    ) -> Result<Self, ViewerError> {
        config.validate()?;

        let viewport = Viewport::from_config(&config.viewport);
        let camera = PerspectiveCamera::from_config(&config.camera);

        let mut scene = SceneGraph::new();
        scene.add_light(HemisphereLight::from_config(&config.light));

        renderer.attach(&viewport)?;

        info!(
            "Viewer initialized: {}x{} @{}x, fov {}",
            viewport.width, viewport.height, viewport.pixel_ratio, camera.fov
        );

        Ok(Self {
            renderer,
            loader: Arc::new(loader),
            viewport,
            camera,
            scene,
            model_config: config.model.clone(),
            state: ViewerState::Initialized,
            pending: None,
            model: None,
            frames_rendered: 0,
            load_failures: 0,
        })
    }

    /// Start loading `uri` in the background. Returns immediately.
    pub fn load_model(&mut self, uri: &str) -> Result<(), ViewerError> {
        match self.state {
            ViewerState::ModelLoading => return Err(ViewerError::LoadInProgress),
            ViewerState::ModelLoaded => return Err(ViewerError::ModelAlreadyLoaded),
            ViewerState::Initialized | ViewerState::LoadFailed => {}
        }

        let (sender, receiver) = oneshot::channel();
        let loader = Arc::clone(&self.loader);
        let thread_uri = uri.to_string();

        std::thread::Builder::new()
            .name("asset-loader".to_string())
            .spawn(move || {
                let result = loader.load(&thread_uri);
                // Receiver gone means the viewer was dropped; nothing left to tell
                let _ = sender.send(result);
            })
            .map_err(ViewerError::SpawnLoader)?;

        info!("Loading model {}", uri);
        self.pending = Some(PendingLoad {
            uri: uri.to_string(),
            receiver,
        });
        self.state = ViewerState::ModelLoading;
        Ok(())
    }

    /// Apply a finished load, if any, without blocking
    pub fn poll_load(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        let result = match pending.receiver.try_recv() {
            Ok(Some(result)) => result,
            Ok(None) => return,
            Err(oneshot::Canceled) => Err(AssetLoadFailure::new(
                pending.uri.clone(),
                LoadCause::LoaderDisconnected,
            )),
        };

        self.pending = None;
        // Outcome already logged and reflected in the state
        let _ = self.complete_load(result);
    }

    /// Block until the pending load finishes and apply it
    pub fn wait_for_load(&mut self) -> Result<NodeId, ViewerError> {
        let pending = self.pending.take().ok_or(ViewerError::NoPendingLoad)?;

        let result = futures::executor::block_on(pending.receiver).unwrap_or_else(|_| {
            Err(AssetLoadFailure::new(
                pending.uri,
                LoadCause::LoaderDisconnected,
            ))
        });

        Ok(self.complete_load(result)?)
    }

    /// The only place a model enters the scene
    fn complete_load(&mut self, result: LoadResult) -> Result<NodeId, AssetLoadFailure> {
        match result {
            Ok(asset) => {
                let name = asset.name.clone();
                let entity = ModelEntity::new(asset)
                    .with_scale(self.model_config.scale)
                    .with_rotation_y(self.model_config.rotation_offset);

                let id = self.scene.add_model(entity);
                self.model = Some(id);
                self.state = ViewerState::ModelLoaded;
                info!("Model {:?} attached as node {}", name, id.index());
                Ok(id)
            }
            Err(failure) => {
                self.load_failures += 1;
                self.state = ViewerState::LoadFailed;
                let report: Vec<String> = anyhow::Chain::new(&failure).map(ToString::to_string).collect();
                error!("{}", report.join(": "));
                Err(failure)
            }
        }
    }

    /// Advance the animation by one step and draw once
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        self.poll_load();

        let delta = self.model_config.rotation_per_frame;
        if let Some(model) = self.model.and_then(|id| self.scene.model_mut(id)) {
            model.rotate_y(delta);
        }

        self.renderer.render(&self.scene, &self.camera)?;
        self.frames_rendered += 1;
        trace!("Rendered frame {}", self.frames_rendered);
        Ok(())
    }

    /// Render one frame per item of `frames` until it runs out
    pub fn run<S: FrameSource>(&mut self, frames: &mut S) -> Result<u64, RenderError> {
        let mut rendered = 0;
        for _frame in frames {
            self.render_frame()?;
            rendered += 1;
        }
        Ok(rendered)
    }

    /// Resize to `width`x`height` logical pixels. Returns false when neither the
    /// viewport nor the camera aspect changed. Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            trace!("Ignoring resize to {}x{}", width, height);
            return false;
        }
        self.apply_viewport(Viewport::new(width, height, self.viewport.pixel_ratio))
    }

    /// Resize from the host's physical pixel size. The surface keeps that exact
    /// size; the logical size is derived from the current pixel ratio.
    pub fn resize_surface(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            trace!("Ignoring surface resize to {}x{}", width, height);
            return false;
        }
        let ratio = self.viewport.pixel_ratio;
        let logical = |v: u32| ((v as f64 / ratio).round() as u32).max(1);
        let viewport = Viewport::new(logical(width), logical(height), ratio).with_surface_size(width, height);
        self.apply_viewport(viewport)
    }

    /// Host DPI change. Returns false when nothing changed.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) -> bool {
        if !(pixel_ratio > 0.0 && pixel_ratio.is_finite()) || pixel_ratio == self.viewport.pixel_ratio {
            return false;
        }
        // Any pinned surface size belonged to the old ratio; the host follows up with a resize
        self.apply_viewport(Viewport::new(self.viewport.width, self.viewport.height, pixel_ratio))
    }

    fn apply_viewport(&mut self, viewport: Viewport) -> bool {
        let aspect = viewport.aspect();
        let aspect_changed = self.camera.aspect != aspect;
        self.camera.aspect = aspect;

        if viewport == self.viewport {
            return aspect_changed;
        }

        self.viewport = viewport;
        self.renderer.resize(&self.viewport);

        let (physical_width, physical_height) = viewport.physical_size();
        info!(
            "Resized to {}x{} ({}x{} physical)",
            viewport.width, viewport.height, physical_width, physical_height
        );
        true
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn model(&self) -> Option<&ModelEntity> {
        self.model.and_then(|id| self.scene.model(id))
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Number of load failures reported so far
    pub fn load_failures(&self) -> u32 {
        self.load_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;
    use std::f32::consts::PI;

    fn loader_ok(uri: &str) -> LoadResult {
        Ok(ModelAsset::new(uri, vec![]))
    }

    fn loader_err(uri: &str) -> LoadResult {
        Err(AssetLoadFailure::import(
            uri,
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        ))
    }

    #[test]
    fn initialize_builds_light_only_scene() {
        let viewer =
            Viewer::initialize(&ViewerConfig::default(), HeadlessRenderer::new(), loader_ok).unwrap();

        assert_eq!(viewer.state(), ViewerState::Initialized);
        assert_eq!(viewer.scene().len(), 1);
        assert!(viewer.scene().light().is_some());
        assert!(viewer.model().is_none());
        assert_eq!(viewer.renderer().attach_count(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ViewerConfig::default();
        config.camera.fov = 180.0;
        let result = Viewer::initialize(&config, HeadlessRenderer::new(), loader_ok);
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }

    #[test]
    fn successful_load_attaches_transformed_model() {
        let mut viewer =
            Viewer::initialize(&ViewerConfig::default(), HeadlessRenderer::new(), loader_ok).unwrap();

        viewer.load_model("plant.glb").unwrap();
        assert_eq!(viewer.state(), ViewerState::ModelLoading);

        let id = viewer.wait_for_load().unwrap();
        let model = viewer.scene().model(id).unwrap();

        assert_eq!(viewer.state(), ViewerState::ModelLoaded);
        assert_eq!(model.transform.rotation.y, PI);
        assert_eq!(model.transform.scale, glam::Vec3::splat(1.4));
        assert_eq!(model.asset.name, "plant.glb");
    }

    #[test]
    fn second_load_is_rejected() {
        let mut viewer =
            Viewer::initialize(&ViewerConfig::default(), HeadlessRenderer::new(), loader_ok).unwrap();

        viewer.load_model("a.glb").unwrap();
        assert!(matches!(viewer.load_model("b.glb"), Err(ViewerError::LoadInProgress)));

        viewer.wait_for_load().unwrap();
        assert!(matches!(viewer.load_model("b.glb"), Err(ViewerError::ModelAlreadyLoaded)));
        assert_eq!(viewer.scene().model_count(), 1);
    }

    #[test]
    fn failed_load_leaves_scene_alone() {
        let mut viewer =
            Viewer::initialize(&ViewerConfig::default(), HeadlessRenderer::new(), loader_err).unwrap();

        viewer.load_model("missing.glb").unwrap();
        let err = viewer.wait_for_load().unwrap_err();

        assert!(matches!(err, ViewerError::Load(ref f) if f.uri == "missing.glb"));
        assert_eq!(viewer.state(), ViewerState::LoadFailed);
        assert_eq!(viewer.scene().len(), 1);
        assert_eq!(viewer.load_failures(), 1);
        assert!(viewer.render_frame().is_ok());
    }

    #[test]
    fn wait_without_load_is_an_error() {
        let mut viewer =
            Viewer::initialize(&ViewerConfig::default(), HeadlessRenderer::new(), loader_ok).unwrap();
        assert!(matches!(viewer.wait_for_load(), Err(ViewerError::NoPendingLoad)));
    }

    #[test]
    fn panicking_loader_reports_disconnect() {
        let loader = |_: &str| -> LoadResult { panic!("loader blew up") };
        let mut viewer =
            Viewer::initialize(&ViewerConfig::default(), HeadlessRenderer::new(), loader).unwrap();

        viewer.load_model("boom.glb").unwrap();
        let err = viewer.wait_for_load().unwrap_err();

        assert!(matches!(
            err,
            ViewerError::Load(AssetLoadFailure { cause: LoadCause::LoaderDisconnected, .. })
        ));
        assert_eq!(viewer.load_failures(), 1);
    }
}
