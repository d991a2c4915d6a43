use std::time::Instant;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the first frame
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

#[derive(Debug, Clone, Copy)]
enum Clock {
    Wall { start: Instant, last: Instant },
    Fixed { step: f32 },
}

/// Infinite iterator that yields frame information
///
/// The wall clock drives the window; a fixed step drives headless runs and
/// tests so that animation is reproducible.
#[derive(Debug, Clone)]
pub struct FrameIterator {
    frame_number: u64,
    time: f32,
    clock: Clock,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            time: 0.0,
            clock: Clock::Wall { start: now, last: now },
        }
    }

    pub fn fixed_step(step: f32) -> Self {
        Self {
            frame_number: 0,
            time: 0.0,
            clock: Clock::Fixed { step },
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameIterator {
    /// Step the clock and return the new frame
    pub fn advance(&mut self) -> FrameInfo {
        let delta = match &mut self.clock {
            Clock::Wall { start, last } => {
                let now = Instant::now();
                let delta = now.duration_since(*last).as_secs_f32();
                self.time = now.duration_since(*start).as_secs_f32();
                *last = now;
                delta
            }
            Clock::Fixed { step } => {
                let delta = if self.frame_number == 0 { 0.0 } else { *step };
                self.time += delta;
                delta
            }
        };

        let info = FrameInfo::new(self.frame_number, self.time, delta);
        self.frame_number += 1;
        info
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        Some(self.advance())
    }
}
