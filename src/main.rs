use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use scene_sync::cli::Cli;
use scene_sync::controls::{KeyAction, KeyBindings};
use scene_sync::core::{Controller, DisplayContext, GpuContext, WinitController};
use scene_sync::frame::FrameIterator;
use scene_sync::renderer::WgpuBackend;
use scene_sync::scenes::ScenePreset;
use scene_sync::{ConfigChange, SceneError, Session, TickOutcome};

const HEADLESS_STEP: f32 = 1.0 / 60.0;

// === Application ===

struct App {
    cli: Cli,
    preset: ScenePreset,
    window: Option<Arc<Window>>,
    session: Option<Session<WgpuBackend>>,
    frames: FrameIterator,
    controller: WinitController,
    bindings: KeyBindings,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(cli: Cli, preset: ScenePreset) -> Self {
        Self {
            cli,
            preset,
            window: None,
            session: None,
            frames: FrameIterator::new(),
            controller: WinitController::new(),
            bindings: KeyBindings::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(format!("scene-sync: {}", self.preset.name))
                    .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
            )
            .map(Arc::new)
            .map_err(|e| SceneError::MissingMountPoint(e.to_string()))?;

        let (gpu, surface) = pollster::block_on(GpuContext::with_window(window.clone()))?;
        let backend = WgpuBackend::for_window(gpu, surface, &window, !self.cli.no_ui)?;

        let size = window.inner_size();
        let viewport = DisplayContext::new(size.width.max(1), size.height.max(1));
        let (session, _handle) = Session::new(
            self.preset.config,
            self.preset.lights.clone(),
            viewport,
            backend,
        )
        .context("failed to build the initial scene")?;

        self.window = Some(window);
        self.session = Some(session);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(session) = self.session.take() {
            let (stats, _backend) = session.teardown();
            log::info!("{} frames rendered", stats.frames);
        }
        event_loop.exit();
    }

    fn apply(session: &mut Session<WgpuBackend>, change: ConfigChange) {
        if let Err(e) = session.apply(change) {
            log::error!("failed to apply {}: {}", change, e);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(session)) = (&self.window, &mut self.session) else {
            return;
        };
        session.follow_handle();

        let mut quit = false;
        for action in self.bindings.update(&self.controller, session.config()) {
            match action {
                KeyAction::Change(change) => Self::apply(session, change),
                KeyAction::Quit => quit = true,
            }
        }
        if quit {
            self.shutdown(event_loop);
            return;
        }

        let config = *session.config();
        let fps = session.fps();
        for change in session.backend_mut().prepare_overlay(window, &config, fps) {
            Self::apply(session, change);
        }

        let frame = self.frames.advance();
        let result = match session.tick(&frame) {
            Ok(TickOutcome::Idle) => session.redraw().map(|_| TickOutcome::Idle),
            other => other,
        };

        match result {
            Ok(TickOutcome::Terminated) => self.shutdown(event_loop),
            Ok(_) => {}
            Err(e) => self.fail(event_loop, e.into()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Let egui handle the event first
        let consumed = self
            .session
            .as_mut()
            .is_some_and(|s| s.backend_mut().overlay_event(&window, &event));

        match &event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(session) = &mut self.session {
                    session.resize(DisplayContext::new(size.width, size.height));
                }
                window.request_redraw();
            }
            WindowEvent::Focused(false) => self.controller.clear(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            WindowEvent::KeyboardInput { .. } if !consumed => {
                if self.controller.process_event(&event) {
                    window.request_redraw();
                }
            }
            _ if consumed => window.request_redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(session)) = (&self.window, &self.session) else {
            return;
        };

        // Paused scenes only repaint on input
        if session.handle().is_running() || !self.controller.get_down_keys().is_empty() {
            event_loop.set_control_flow(ControlFlow::Poll);
            window.request_redraw();
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}

fn run_headless(cli: &Cli, preset: ScenePreset) -> anyhow::Result<()> {
    let gpu = pollster::block_on(GpuContext::new()).context("no adapter for offscreen rendering")?;
    let viewport = cli.viewport();
    let backend = WgpuBackend::offscreen(gpu, viewport)?;
    let (mut session, _handle) = Session::new(preset.config, preset.lights, viewport, backend)?;

    for frame in FrameIterator::fixed_step(HEADLESS_STEP).take(cli.frames as usize) {
        if session.tick(&frame)? == TickOutcome::Terminated {
            break;
        }
    }

    let rotation = session.state().rotation().unwrap_or_default();
    let object = session.state().object_id();
    let (stats, _backend) = session.teardown();
    log::info!(
        "headless run finished: {} frames, object {:?}, final rotation ({:.3}, {:.3}, {:.3})",
        stats.frames,
        object,
        rotation.x,
        rotation.y,
        rotation.z
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let preset = cli.resolve().context("invalid scene configuration")?;

    if cli.headless {
        return run_headless(&cli, preset).inspect_err(|e| log::error!("{:#}", e));
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, preset);

    log::info!("controls: Space pause, Q/E geometry, A/D material, W/S zoom, C color, Escape quit");
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
