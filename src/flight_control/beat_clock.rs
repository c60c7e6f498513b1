/// Pausable game time. Only advances by what the frame loop feeds it,
/// scaled by the current time scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameTime {
    time: f64,
    time_scale: f64,
    delta: f64,
}

impl Default for GameTime {
    fn default() -> Self { Self { time: 0.0, time_scale: 1.0, delta: 0.0 } }
}

impl GameTime {
    /// Advances by `real_dt` seconds of wall time. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, real_dt: f64) {
        self.delta = if real_dt.is_finite() && real_dt > 0.0 { real_dt * self.time_scale } else { 0.0 };
        self.time += self.delta;
    }

    pub fn pause(&mut self) { self.time_scale = 0.0; }
    pub fn resume(&mut self) { self.time_scale = 1.0; }
    pub fn is_paused(&self) -> bool { self.time_scale <= 1e-6 }

    /// Scaled seconds since start.
    pub fn time(&self) -> f64 { self.time }
    /// Scaled length of the last step.
    pub fn delta(&self) -> f64 { self.delta }
}

/// Converts game time to beats and tracks the beat a level started at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatClock {
    time: GameTime,
    /// Seconds per beat.
    time_ratio: f64,
    base_time: f64,
}

impl BeatClock {
    pub fn new(time_ratio: f64) -> Self {
        Self { time: GameTime::default(), time_ratio, base_time: 0.0 }
    }

    pub fn advance(&mut self, real_dt: f64) { self.time.advance(real_dt); }
    pub fn pause(&mut self) { self.time.pause(); }
    pub fn resume(&mut self) { self.time.resume(); }
    pub fn is_paused(&self) -> bool { self.time.is_paused() }
    pub fn game_time(&self) -> &GameTime { &self.time }

    /// Scaled frame delta in seconds.
    #[allow(clippy::cast_possible_truncation)]
    pub fn delta(&self) -> f32 { self.time.delta() as f32 }

    pub fn current_beat(&self) -> f64 { self.time.time() / self.time_ratio }

    pub fn base_time(&self) -> f64 { self.base_time }

    /// Marks the current beat as the start of a new level.
    pub fn reset_base_time(&mut self) { self.base_time = self.current_beat(); }

    /// Beats since the last reset, never negative.
    pub fn elapsed(&self) -> f64 { (self.current_beat() - self.base_time).max(0.0) }
}
