use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use winit::event_loop::EventLoop;

use model_viewer::app::App;
use model_viewer::cli::Cli;
use model_viewer::frame::FixedStep;
use model_viewer::loaders::GltfLoader;
use model_viewer::render::HeadlessRenderer;
use model_viewer::{Viewer, ViewerConfig};

const HEADLESS_FPS: f32 = 60.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.resolve_config().context("Invalid configuration")?;

    match cli.headless {
        Some(frames) => run_headless(&config, frames),
        None => run_windowed(config),
    }
}

fn run_windowed(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    info!("Model Viewer - close the window to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}

fn run_headless(config: &ViewerConfig, frames: u64) -> Result<()> {
    let mut viewer = Viewer::initialize(config, HeadlessRenderer::new(), GltfLoader::new())?;

    viewer.load_model(&config.model.path)?;
    // Failure is already logged; the light-only scene still renders
    let _ = viewer.wait_for_load();

    let rendered = viewer.run(&mut FixedStep::new(HEADLESS_FPS).with_limit(frames))?;

    println!("State:   {:?}", viewer.state());
    println!("Frames:  {}", rendered);
    println!("Nodes:   {}", viewer.scene().len());
    if let Some(model) = viewer.model() {
        println!("Model:   {}", model.asset.name);
        println!("  Meshes:    {}", model.asset.meshes.len());
        println!("  Triangles: {}", model.asset.triangle_count());
        println!("  Rotation:  {:.4} rad", model.transform.rotation.y);
    }

    Ok(())
}
