/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    /// Create throttled timer; the first fire waits a full interval
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
        }
    }

    /// Attempt to fire, returns true if enough time has passed
    pub fn try_tick(&mut self, delta: f32) -> bool {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            self.time_since_last = 0.0;
            true
        } else {
            false
        }
    }
}

/// Frames-per-second estimate reported once per window
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    window: Throttled,
    frames: u32,
    elapsed: f32,
}

impl FpsCounter {
    pub fn new(window_secs: f32) -> Self {
        Self {
            window: Throttled::new(window_secs),
            frames: 0,
            elapsed: 0.0,
        }
    }

    /// Count one frame; returns the rate when the window closes
    pub fn frame(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if !self.window.try_tick(delta) {
            return None;
        }

        let fps = if self.elapsed > 0.0 {
            self.frames as f32 / self.elapsed
        } else {
            0.0
        };
        self.frames = 0;
        self.elapsed = 0.0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttled_enforces_minimum() {
        let mut timer = Throttled::new(0.1);

        assert!(!timer.try_tick(0.05)); // Half an interval
        assert!(timer.try_tick(0.06));  // Enough time
        assert!(!timer.try_tick(0.05)); // Too soon again
    }

    #[test]
    fn fps_reported_once_per_window() {
        let mut fps = FpsCounter::new(1.0);
        let reports: Vec<f32> = (0..120).filter_map(|_| fps.frame(1.0 / 60.0)).collect();

        assert_eq!(reports.len(), 1);
        assert!((reports[0] - 60.0).abs() < 1.0);
    }

    #[test]
    fn fps_zero_delta_never_divides_by_zero() {
        let mut fps = FpsCounter::new(0.0);
        assert_eq!(fps.frame(0.0), Some(0.0));
    }
}
