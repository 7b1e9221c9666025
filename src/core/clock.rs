use std::time::Instant;

/// Longest step the animation will take in one frame, in seconds
pub const MAX_DELTA: f32 = 0.1;

/// Minimal scene clock - elapsed and delta time from host timestamps
/// Timestamps are seconds on any monotonic base; the first tick defines zero
#[derive(Debug, Default, Clone)]
pub struct Clock {
    start: Option<f64>,
    last: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` and return (elapsed, delta) in seconds
    /// Delta is capped so a stalled window does not fling particles
    pub fn tick(&mut self, now: f64) -> (f32, f32) {
        let start = *self.start.get_or_insert(now);
        let delta = match self.last {
            Some(last) => ((now - last).max(0.0) as f32).min(MAX_DELTA),
            None => 0.0,
        };
        self.last = Some(now);
        (((now - start).max(0.0)) as f32, delta)
    }

    /// Forget all timestamps; the next tick restarts at zero
    pub fn reset(&mut self) {
        self.start = None;
        self.last = None;
    }
}

/// Host-side monotonic time source
#[derive(Debug, Clone, Copy)]
pub struct HostTime {
    origin: Instant,
}

impl HostTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Seconds since this source was created
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Default for HostTime {
    fn default() -> Self {
        Self::new()
    }
}
