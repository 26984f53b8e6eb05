//! Window, event handling, and the per-redraw frame loop.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use orrery_config::Config;
use orrery_debug::{DebugCommand, DebugState};
use orrery_input::{Command, KeyboardState, MouseState, OrbitControl};
use orrery_orbit::{OrbitalAnimator, SolarSystem, SystemError};
use orrery_render::{
    Camera, RenderContext, RenderContextError, RenderError, Renderer, SurfaceError,
    init_render_context_blocking,
};
use orrery_scene::{BindError, Scene, SceneBinding};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::frame_clock::FrameClock;
use crate::setup;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    System(#[from] SystemError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Render(#[from] RenderContextError),

    #[error("failed to build scene: {0}")]
    Scene(#[from] BindError<RenderError>),
}

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Whatever exists only once a window and GPU are up.
struct Gpu {
    window: Arc<Window>,
    ctx: RenderContext,
    renderer: Renderer,
    scene: Scene,
    binding: SceneBinding,
}

/// Owns the solar system and everything that animates, shows, or steers it.
pub struct Viewer {
    config: Config,
    system: SolarSystem,
    animator: OrbitalAnimator,
    clock: FrameClock,
    paused: bool,
    camera: Camera,
    control: OrbitControl,
    keyboard: KeyboardState,
    mouse: MouseState,
    gpu: Option<Gpu>,
    debug_state: Arc<Mutex<DebugState>>,
    #[cfg(debug_assertions)]
    debug_server: Option<orrery_debug::DebugServer>,
    start_time: Instant,
    last_fps_report: Instant,
    fatal: Option<AppError>,
}

impl Viewer {
    /// Builds the solar system and camera. The window and GPU come later, in `resumed`.
    pub fn new(config: Config) -> Result<Self, SystemError> {
        let system = setup::build_system(&config)?;
        let control = setup::orbit_control(&config);
        let camera = setup::camera(&config, &control, config.window.width, config.window.height);
        let now = Instant::now();

        #[cfg(debug_assertions)]
        let debug_server = if config.debug.debug_api {
            orrery_debug::create_debug_server(orrery_debug::get_debug_port())
        } else {
            None
        };

        info!(
            bodies = system.len(),
            earth_day = config.animation.earth_day,
            timestep = ?config.animation.timestep,
            "Solar system ready"
        );

        Ok(Self {
            clock: FrameClock::new(config.animation.timestep),
            paused: config.animation.start_paused,
            system,
            animator: OrbitalAnimator::new(),
            camera,
            control,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            gpu: None,
            debug_state: Arc::new(Mutex::new(DebugState::default())),
            #[cfg(debug_assertions)]
            debug_server,
            start_time: now,
            last_fps_report: now,
            fatal: None,
            config,
        })
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frames_advanced(&self) -> u64 {
        self.animator.frames_advanced()
    }

    /// Shared with the debug server.
    pub fn debug_state(&self) -> Arc<Mutex<DebugState>> {
        self.debug_state.clone()
    }

    /// Applies a command. Returns `false` when the viewer should close.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::TogglePause => self.set_paused(!self.paused),
            Command::Reset => {
                self.system.reset();
                self.animator.reset();
            }
            Command::Quit => {
                info!("Quit requested");
                return false;
            }
        }
        true
    }

    fn handle_debug_command(&mut self, command: DebugCommand) -> bool {
        match command {
            DebugCommand::Quit => self.handle_command(Command::Quit),
            DebugCommand::Reset => self.handle_command(Command::Reset),
            DebugCommand::Pause => {
                self.set_paused(true);
                true
            }
            DebugCommand::Resume => {
                self.set_paused(false);
                true
            }
        }
    }

    fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            info!(paused, "Animation {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Runs everything a redraw needs except drawing. Returns `false` when
    /// the viewer should close.
    pub fn update(&mut self, frames: u32) -> bool {
        let keyed: Vec<Command> = self.keyboard.commands().collect();
        let remote = lock_debug_state(&self.debug_state).take_commands();
        for command in keyed {
            if !self.handle_command(command) {
                return false;
            }
        }
        for command in remote {
            debug!(?command, "Debug API command");
            if !self.handle_debug_command(command) {
                return false;
            }
        }

        if !self.paused && frames > 0 {
            self.animator.advance(&mut self.system, frames);
        }

        let height = self
            .gpu
            .as_ref()
            .map_or(self.config.window.height, |gpu| gpu.ctx.size().1);
        if self.control.update(&self.mouse, height as f32) {
            setup::aim(&mut self.camera, &self.control);
        }

        self.keyboard.end_frame();
        self.mouse.clear_transients();
        true
    }

    fn publish_debug_state(&self) {
        let (width, height) = self
            .gpu
            .as_ref()
            .map_or((self.config.window.width, self.config.window.height), |gpu| {
                gpu.ctx.size()
            });
        let mut state = lock_debug_state(&self.debug_state);
        state.frame_count = self.clock.frame_count();
        state.frames_advanced = self.animator.frames_advanced();
        state.frame_time_ms = self.clock.last_frame_time() * 1000.0;
        state.fps = self.clock.fps();
        state.window_width = width;
        state.window_height = height;
        state.uptime_seconds = self.start_time.elapsed().as_secs_f64();
        state.paused = self.paused;
        state.bodies = setup::snapshot_bodies(&self.system);
    }

    fn report_fps(&mut self) {
        if self.config.debug.show_fps && self.last_fps_report.elapsed().as_secs_f64() >= 1.0 {
            info!(
                "{:.1} fps, {} frames advanced",
                self.clock.fps(),
                self.animator.frames_advanced()
            );
            self.last_fps_report = Instant::now();
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu, AppError> {
        let window = Arc::new(
            event_loop.create_window(window_attributes_from_config(&self.config))?,
        );
        let ctx = init_render_context_blocking(window.clone(), self.config.window.vsync)?;
        let mut renderer = Renderer::new(&ctx, self.config.render.clear_color);
        let (scene, binding) = SceneBinding::build(
            &self.system,
            &mut renderer.uploader(&ctx),
            &setup::scene_options(&self.config),
        )?;
        let (width, height) = ctx.size();
        self.camera.set_aspect_ratio(width as f32, height as f32);
        info!(
            width,
            height,
            meshes = renderer.mesh_count(),
            nodes = scene.len(),
            "Renderer ready"
        );
        Ok(Gpu {
            window,
            ctx,
            renderer,
            scene,
            binding,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.ctx.resize(width, height);
            gpu.renderer.resize(&gpu.ctx.device, width, height);
        }
        self.camera.set_aspect_ratio(width as f32, height as f32);
        info!("Window resized to {}x{}", width, height);
    }

    /// Returns `false` on an unrecoverable GPU failure.
    fn draw(&mut self) -> bool {
        let Some(gpu) = &mut self.gpu else {
            return true;
        };
        if let Err(e) = gpu.binding.sync(&self.system, &mut gpu.scene) {
            error!("Scene sync failed: {e}");
            return true;
        }
        match gpu.renderer.render(&gpu.ctx, &gpu.scene, &self.camera) {
            Ok(()) => true,
            Err(RenderError::Surface(SurfaceError::Lost)) => {
                let (w, h) = gpu.ctx.size();
                gpu.ctx.resize(w, h);
                true
            }
            Err(RenderError::Surface(SurfaceError::OutOfMemory)) => {
                error!("GPU out of memory");
                false
            }
            Err(RenderError::Surface(SurfaceError::Timeout)) => {
                warn!("Surface timeout, skipping frame");
                true
            }
            Err(e) => {
                error!("Render failed: {e}");
                true
            }
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                error!("{e}");
                self.fatal = Some(e);
                event_loop.exit();
                return;
            }
        }

        #[cfg(debug_assertions)]
        if let Some(server) = &mut self.debug_server
            && let Err(e) = server.start(self.debug_state.clone())
        {
            warn!("Failed to start debug server: {e}");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(gpu) = &self.gpu {
                    let size = gpu.window.inner_size();
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => self.mouse.on_button(button, state),
            WindowEvent::MouseWheel { delta, .. } => self.mouse.on_scroll(delta),
            WindowEvent::RedrawRequested => {
                let frames = self.clock.tick();
                if !self.update(frames) || !self.draw() {
                    event_loop.exit();
                    return;
                }
                self.publish_debug_state();
                self.report_fps();
                if let Some(gpu) = &self.gpu {
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Opens the window and blocks until it closes.
#[instrument(skip_all)]
/// Locks the shared debug state. A panic on the server thread poisons the
/// lock; the state is plain data, so it is recovered rather than dropped.
fn lock_debug_state(state: &Mutex<DebugState>) -> MutexGuard<'_, DebugState> {
    state.lock().unwrap_or_else(|poisoned| {
        warn!("debug state lock was poisoned, recovering");
        state.clear_poison();
        poisoned.into_inner()
    })
}

/// Opens the window and runs until it closes or a fatal error occurs.
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut viewer = Viewer::new(config)?;
    event_loop.run_app(&mut viewer)?;
    match viewer.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
