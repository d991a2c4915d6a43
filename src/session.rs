use crate::config::{ConfigChange, SceneConfig};
use crate::core::{DisplayContext, GraphicsBackend};
use crate::error::{Result, SceneError};
use crate::frame::FrameInfo;
use crate::light::LightRig;
use crate::render_loop::{LoopHandle, LoopState, RenderLoop, StopReason, TickOutcome};
use crate::scene::SceneState;
use crate::sync::{SyncOutcome, SyncReport, Synchronizer};

/// Counters reported when a session is torn down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks: u64,
    pub frames: u64,
    /// Objects built, first build included
    pub builds: u64,
}

/// Scene state, synchronizer, render loop and backend wired together
pub struct Session<B: GraphicsBackend> {
    state: SceneState,
    sync: Synchronizer,
    render_loop: RenderLoop,
    backend: B,
}

impl<B: GraphicsBackend> Session<B> {
    /// Build the first object and start the loop; paused configs start stopped
    pub fn new(
        config: SceneConfig,
        lights: LightRig,
        viewport: DisplayContext,
        mut backend: B,
    ) -> Result<(Self, LoopHandle)> {
        let mut state = SceneState::new(config, lights, viewport);
        let mut sync = Synchronizer::new();

        backend.resize(viewport);
        let id = sync.build(&mut state, &mut backend)?;

        let (render_loop, handle) = RenderLoop::start();
        if state.config.paused {
            handle.pause();
        }

        log::info!(
            "session started: {} {} {}, {} material",
            id,
            state.config.geometry,
            state.config.color,
            state.config.material
        );

        let session = Self {
            state,
            sync,
            render_loop,
            backend,
        };
        Ok((session, handle))
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn config(&self) -> &SceneConfig {
        &self.state.config
    }

    pub fn handle(&self) -> &LoopHandle {
        self.render_loop.handle()
    }

    pub fn fps(&self) -> f32 {
        self.render_loop.fps()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn ensure_live(&self) -> Result<()> {
        if self.handle().is_torn_down() {
            Err(SceneError::TornDown)
        } else {
            Ok(())
        }
    }

    /// Copy pauses made through any handle into `config.paused`
    pub fn follow_handle(&mut self) {
        match self.handle().state() {
            LoopState::Running => self.state.config.paused = false,
            LoopState::Stopped(StopReason::Paused) => self.state.config.paused = true,
            LoopState::Stopped(StopReason::Teardown) => {}
        }
    }

    pub fn apply(&mut self, change: ConfigChange) -> Result<SyncOutcome> {
        self.ensure_live()?;
        self.follow_handle();
        let outcome = self.sync.apply(&mut self.state, &mut self.backend, change)?;
        if let ConfigChange::Paused(paused) = change {
            self.handle().set_paused(paused);
        }
        Ok(outcome)
    }

    pub fn sync_to(&mut self, target: &SceneConfig) -> Result<SyncReport> {
        self.ensure_live()?;
        self.follow_handle();
        let report = self.sync.sync_to(&mut self.state, &mut self.backend, target)?;
        self.handle().set_paused(self.state.config.paused);
        Ok(report)
    }

    pub fn tick(&mut self, frame: &FrameInfo) -> Result<TickOutcome> {
        self.follow_handle();
        self.render_loop.tick(&mut self.state, &mut self.backend, frame)
    }

    /// Draw the current state without advancing animation
    pub fn redraw(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.render_loop.draw(&self.state, &mut self.backend)
    }

    /// Track a new viewport; zero-sized (minimized) viewports are ignored
    pub fn resize(&mut self, viewport: DisplayContext) {
        if viewport.is_empty() || viewport == self.state.viewport {
            return;
        }
        self.state.viewport = viewport;
        self.state.camera.set_aspect(viewport.aspect());
        self.backend.resize(viewport);
    }

    /// Stop the loop, release the object, dispose the overlay
    pub fn teardown(mut self) -> (SessionStats, B) {
        self.handle().teardown();
        self.sync.release(&mut self.state, &mut self.backend);
        self.backend.dispose_overlay();

        let stats = SessionStats {
            ticks: self.render_loop.ticks(),
            frames: self.render_loop.frames(),
            builds: self.sync.builder().built(),
        };
        log::info!(
            "session torn down after {} ticks, {} frames, {} builds",
            stats.ticks,
            stats.frames,
            stats.builds
        );
        (stats, self.backend)
    }
}
