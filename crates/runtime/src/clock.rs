use foundation::time::Time;

/// Deterministic frame metadata.
///
/// Transition completion is driven from frames rather than wall-clock timers,
/// so a recorded sequence of frames replays to the same camera states.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time of this frame (seconds).
    pub dt_s: f64,
    /// Session time at the end of the frame.
    pub time: Time,
}

/// Monotonic session clock.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Clock {
    frames: u64,
    now: Time,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Time {
        self.now
    }

    /// Advances the clock by `dt_s` seconds. Negative deltas are treated as zero.
    pub fn tick(&mut self, dt_s: f64) -> Frame {
        let dt_s = dt_s.max(0.0);
        self.now = Time(self.now.0 + dt_s);
        let frame = Frame {
            index: self.frames,
            dt_s,
            time: self.now,
        };
        self.frames += 1;
        frame
    }

    pub fn tick_ms(&mut self, ms: u32) -> Frame {
        self.tick(f64::from(ms) / 1000.0)
    }
}
