/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn after_ms(self, ms: u32) -> Time {
        Time(self.0 + f64::from(ms) / 1000.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    /// Span starting at `start` and lasting `duration_ms` milliseconds.
    pub fn starting_at(start: Time, duration_ms: u32) -> Self {
        Self {
            start,
            end: start.after_ms(duration_ms),
        }
    }

    pub fn instant(t: Time) -> Self {
        Self { start: t, end: t }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// True once `now` has reached the end of the span.
    pub fn is_elapsed(&self, now: Time) -> bool {
        now.0 >= self.end.0
    }
}
