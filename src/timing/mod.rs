//! Time scaling.
//!
//! A host loop ticks at a fixed step (usually 60 Hz). Each [`ScaledClock`]
//! turns one host step into zero or more simulation sub-steps according to
//! its [`Rate`], so a timeline can run faster, slower, frozen or backwards
//! while rendering stays locked to the host frame rate.
//!
//! All durations are integer ticks of 100 ns, matching the usual
//! `TimeSpan` resolution of fixed-step engines.
//!
//! - [`rate`] – exact rate ratio and its sign
//! - [`scaledclock`] – the sub-step decomposition and update callback

pub mod rate;
pub mod scaledclock;

pub use rate::{Rate, RateSign};
pub use scaledclock::{ClockSnapshot, ScaledClock, StepPlan, UpdateCallback};

/// Signed duration in 100 ns ticks.
pub type Ticks = i64;

pub const TICKS_PER_MILLISECOND: Ticks = 10_000;
pub const TICKS_PER_SECOND: Ticks = 10_000_000;

/// One 60 Hz host frame, rounded to the nearest tick.
pub const DEFAULT_HOST_STEP: Ticks = 166_667;

/// One frame reported by the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostFrame {
    /// Ticks the host measured for this frame.
    pub delta: Ticks,
    /// The fixed-step loop is running behind and will catch up.
    pub is_lagging: bool,
}

impl HostFrame {
    /// A frame of exactly `host_step` ticks that is on schedule.
    pub fn fixed(host_step: Ticks) -> Self {
        HostFrame {
            delta: host_step,
            is_lagging: false,
        }
    }

    pub fn lagging(mut self, is_lagging: bool) -> Self {
        self.is_lagging = is_lagging;
        self
    }
}

/// Convert ticks to seconds.
pub fn ticks_to_seconds(ticks: Ticks) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}

/// Convert milliseconds to ticks. Saturates instead of overflowing.
pub fn millis_to_ticks(millis: i64) -> Ticks {
    millis.saturating_mul(TICKS_PER_MILLISECOND)
}
