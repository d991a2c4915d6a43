use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::{FpsCounter, GraphicsBackend};
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::scene::SceneState;

const FPS_LOG_INTERVAL: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Paused,
    /// Terminal
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped(StopReason),
}

/// Start/stop control of a render loop, shareable with UI code
#[derive(Debug, Clone)]
pub struct LoopHandle {
    state: Arc<Mutex<LoopState>>,
}

impl LoopHandle {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LoopState::Running)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LoopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> LoopState {
        *self.lock()
    }

    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    pub fn is_torn_down(&self) -> bool {
        self.state() == LoopState::Stopped(StopReason::Teardown)
    }

    /// Running -> Paused; returns whether the state changed
    pub fn pause(&self) -> bool {
        let mut state = self.lock();
        if *state == LoopState::Running {
            *state = LoopState::Stopped(StopReason::Paused);
            true
        } else {
            false
        }
    }

    /// Paused -> Running; a torn-down loop stays down
    pub fn resume(&self) -> bool {
        let mut state = self.lock();
        if *state == LoopState::Stopped(StopReason::Paused) {
            *state = LoopState::Running;
            true
        } else {
            false
        }
    }

    pub fn set_paused(&self, paused: bool) -> bool {
        if paused {
            self.pause()
        } else {
            self.resume()
        }
    }

    /// Stop for good; returns false if already torn down
    pub fn teardown(&self) -> bool {
        let mut state = self.lock();
        if *state == LoopState::Stopped(StopReason::Teardown) {
            false
        } else {
            *state = LoopState::Stopped(StopReason::Teardown);
            true
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered,
    /// Paused, nothing advanced or drawn
    Idle,
    /// Torn down, the caller should stop ticking
    Terminated,
}

/// Per-frame driver: advance animation, move lights, submit one draw
#[derive(Debug)]
pub struct RenderLoop {
    handle: LoopHandle,
    ticks: u64,
    frames: u64,
    fps: FpsCounter,
    last_fps: f32,
}

impl RenderLoop {
    /// New loop in the running state and a handle controlling it
    pub fn start() -> (Self, LoopHandle) {
        let handle = LoopHandle::new();
        let render_loop = Self {
            handle: handle.clone(),
            ticks: 0,
            frames: 0,
            fps: FpsCounter::new(FPS_LOG_INTERVAL),
            last_fps: 0.0,
        };
        (render_loop, handle)
    }

    pub fn handle(&self) -> &LoopHandle {
        &self.handle
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Rate measured over the last completed window
    pub fn fps(&self) -> f32 {
        self.last_fps
    }

    pub fn tick<B: GraphicsBackend>(
        &mut self,
        state: &mut SceneState,
        backend: &mut B,
        frame: &FrameInfo,
    ) -> Result<TickOutcome> {
        self.ticks += 1;

        match self.handle.state() {
            LoopState::Stopped(StopReason::Teardown) => return Ok(TickOutcome::Terminated),
            LoopState::Stopped(StopReason::Paused) => return Ok(TickOutcome::Idle),
            LoopState::Running => {}
        }

        // Read fresh every tick so speed changes apply without restarting
        let speed = state.config.rotation_speed;
        if let Some(object) = state.object.as_mut() {
            object.transform.rotation.x += speed;
            object.transform.rotation.y += speed;
        }

        state.elapsed = frame.time;
        state.lights.update(frame.time);

        self.draw(state, backend)?;

        if let Some(fps) = self.fps.frame(frame.delta) {
            self.last_fps = fps;
            log::debug!("{:.1} fps ({} frames)", fps, self.frames);
        }
        Ok(TickOutcome::Rendered)
    }

    /// Submit a draw without advancing animation
    pub fn draw<B: GraphicsBackend>(&mut self, state: &SceneState, backend: &mut B) -> Result<()> {
        backend.render(state)?;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let (_, handle) = RenderLoop::start();
        assert_eq!(handle.state(), LoopState::Running);
    }

    #[test]
    fn pause_resume_transitions() {
        let (_, handle) = RenderLoop::start();
        assert!(handle.pause());
        assert!(!handle.pause());
        assert_eq!(handle.state(), LoopState::Stopped(StopReason::Paused));
        assert!(handle.resume());
        assert!(!handle.resume());
        assert!(handle.is_running());
    }

    #[test]
    fn teardown_is_terminal() {
        let (render_loop, handle) = RenderLoop::start();
        handle.pause();
        assert!(handle.teardown());
        assert!(!handle.teardown());
        assert!(!handle.resume());
        assert!(!handle.set_paused(false));
        assert!(render_loop.handle().is_torn_down());
    }

    #[test]
    fn clones_share_state() {
        let (render_loop, handle) = RenderLoop::start();
        let ui_handle = handle.clone();
        ui_handle.pause();
        assert_eq!(render_loop.handle().state(), LoopState::Stopped(StopReason::Paused));
    }
}
