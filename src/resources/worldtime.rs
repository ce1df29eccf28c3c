//! Simulation time of the sub-step being run.
//!
//! A [`Timeline`](crate::game::Timeline) overwrites [`WorldTime`] before each
//! of its sub-steps, so systems always read the delta of the step they are
//! simulating and the name of the timeline that scheduled them.

use bevy_ecs::prelude::Resource;

use crate::timing::{ClockSnapshot, Rate, RateSign, Ticks};

#[derive(Resource, Clone, Debug)]
pub struct WorldTime {
    /// Timeline currently running systems.
    pub timeline: String,
    pub snapshot: ClockSnapshot,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            timeline: String::new(),
            snapshot: ClockSnapshot::idle(Rate::normal(crate::timing::DEFAULT_HOST_STEP)),
        }
    }
}

impl WorldTime {
    pub fn new(timeline: impl Into<String>, snapshot: ClockSnapshot) -> Self {
        WorldTime {
            timeline: timeline.into(),
            snapshot,
        }
    }

    /// Signed ticks simulated by this sub-step.
    pub fn delta(&self) -> Ticks {
        self.snapshot.delta
    }

    /// Signed seconds simulated by this sub-step.
    pub fn delta_seconds(&self) -> f32 {
        self.snapshot.delta_seconds()
    }

    pub fn elapsed(&self) -> Ticks {
        self.snapshot.elapsed_total
    }

    /// Sub-step size relative to one host step at 1x.
    pub fn step_scale(&self) -> f32 {
        self.snapshot.step_scale
    }

    pub fn sign(&self) -> RateSign {
        self.snapshot.sign()
    }

    /// The configured rate of the running timeline.
    pub fn rate(&self) -> Rate {
        self.snapshot.rate
    }
}
