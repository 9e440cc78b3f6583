//! The winit application: window, event routing and the frame loop.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::AppConfig;
use crate::gpu::GpuError;
use crate::input::Input;
use crate::loader::{AssetLoader, LoadResult};
use crate::mesh::Transform;
use crate::renderer::SurfaceRenderer;
use crate::scene::{SceneSlot, TransitionStatus};
use crate::viewer::{ClickOutcome, Viewer};

/// Fatal application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error("rendering failed: {0}")]
    Render(wgpu::SurfaceError),
}

/// Open the window and run until it is closed.
///
/// # Example
/// ```no_run
/// use vantage::AppConfig;
///
/// vantage::run(AppConfig::new().title("Billboards").size(1280, 720))?;
/// # Ok::<(), vantage::AppError>(())
/// ```
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = VantageApp {
        config,
        state: AppState::Pending,
        failure: None,
    };
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct VantageApp {
    config: AppConfig,
    state: AppState,
    /// First fatal error; the loop exits as soon as it is set.
    failure: Option<AppError>,
}

enum AppState {
    Pending,
    Running(Box<Running>),
}

struct Running {
    window: Arc<Window>,
    renderer: SurfaceRenderer,
    viewer: Viewer,
    input: Input,
    loader: AssetLoader,
    last_frame: Instant,
}

impl VantageApp {
    fn start(&self, event_loop: &ActiveEventLoop) -> Result<Running, AppError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width,
                self.config.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let renderer = SurfaceRenderer::new(window.clone())?;

        let mut viewer = Viewer::from_config(&self.config);
        let (width, height) = renderer.gpu.size();
        viewer.resize(width, height);

        let mut loader = AssetLoader::new();
        for slot in [SceneSlot::First, SceneSlot::Second] {
            loader.request(slot, &self.config.scene_config(slot).model);
        }

        log::info!("window ready at {width}x{height}");

        Ok(Running {
            window,
            renderer,
            viewer,
            input: Input::new(),
            loader,
            last_frame: Instant::now(),
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{err}");
        self.failure.get_or_insert(err);
        event_loop.exit();
    }
}

impl Running {
    /// Place every model that finished loading since the last frame.
    fn place_loaded_models(&mut self, config: &AppConfig) {
        for LoadResult { slot, path, result } in self.loader.poll() {
            let scene = config.scene_config(slot);
            match result {
                Ok(model) => {
                    let renderer = &mut self.renderer;
                    self.viewer.place_model(
                        slot,
                        &scene.label,
                        Transform::from_position(scene.offset),
                        model,
                        |name, geometry, material| Some(renderer.upload(name, geometry, material)),
                    );
                }
                Err(err) => {
                    log::error!("failed to load {} for {slot}: {err}", path.display());
                }
            }
        }
    }

    fn handle_clicks(&mut self) {
        let viewport = self.renderer.gpu.size();
        for pointer in self.input.take_clicks() {
            match self.viewer.click(pointer, viewport) {
                ClickOutcome::Started { label, target } => {
                    log::info!("{label} clicked, moving to {target}");
                }
                ClickOutcome::Busy { label } => {
                    log::debug!("{label} clicked during a transition, ignored");
                }
                ClickOutcome::NoHit => {}
            }
        }
    }
}

impl ApplicationHandler for VantageApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Pending) {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.state = AppState::Running(Box::new(running));
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(running) = &mut self.state else {
            return;
        };
        let running = &mut **running;

        running.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.renderer.resize(size.width, size.height);
                running.viewer.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now.duration_since(running.last_frame);
                running.last_frame = now;

                running.place_loaded_models(&self.config);
                running.handle_clicks();

                let result = running
                    .viewer
                    .tick(&running.input, dt, &mut running.renderer);
                running.input.begin_frame();
                running.window.request_redraw();

                match result {
                    Ok(TransitionStatus::Completed { new_active }) => {
                        log::debug!("now showing {new_active}");
                    }
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        log::warn!("surface lost or outdated, reconfiguring");
                        running.renderer.gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        self.fail(event_loop, AppError::Render(wgpu::SurfaceError::OutOfMemory));
                    }
                    Err(err) => {
                        log::warn!("skipping frame: {err}");
                    }
                }
            }
            _ => {}
        }
    }
}
