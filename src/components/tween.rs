//! Timeline-driven interpolation of position, rotation and scale.
//!
//! [`TweenPosition`], [`TweenRotation`] and [`TweenScale`] each pair a
//! `from`/`to` range with a [`TweenPlayback`] holding the elapsed time,
//! loop mode and easing. Playback follows the sign of the timeline delta,
//! so a timeline running backward rewinds its tweens. The update systems
//! live in [`crate::systems::tween`].

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// What happens when playback crosses an end of the range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once and stop at the target end.
    Once,
    /// Wrap around when either end is crossed.
    Loop,
    /// Reverse direction when reaching either end.
    PingPong,
}

/// Curve applied to normalized progress before interpolating.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed (no easing).
    Linear,
    /// Starts slow, accelerates (quadratic).
    QuadIn,
    /// Starts fast, decelerates (quadratic).
    QuadOut,
    /// Slow start and end (quadratic).
    QuadInOut,
    /// Starts slow, accelerates (cubic).
    CubicIn,
    /// Starts fast, decelerates (cubic).
    CubicOut,
    /// Slow start and end (cubic).
    CubicInOut,
}

/// Time state shared by every tween kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenPlayback {
    /// Duration in seconds.
    pub duration: f32,
    pub easing: Easing,
    pub loop_mode: LoopMode,
    /// Cleared to pause the tween.
    pub playing: bool,
    /// Set when a [`LoopMode::Once`] tween has reached its target end.
    pub finished: bool,
    /// Current time within the tween, in `[0, duration]`.
    pub time: f32,
    /// Direction of playback (true = toward `to`).
    pub forward: bool,
}

impl TweenPlayback {
    pub fn new(duration: f32) -> Self {
        TweenPlayback {
            duration,
            easing: Easing::Linear,
            loop_mode: LoopMode::Once,
            playing: true,
            finished: false,
            time: 0.0,
            forward: true,
        }
    }

    /// Normalized progress from `from` (0.0) to `to` (1.0), before easing.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            self.time / self.duration
        } else {
            1.0
        }
    }

    fn backwards(&mut self) {
        self.time = self.duration;
        self.forward = false;
    }
}

/// Animates an entity's [`MapPosition`](super::mapposition::MapPosition) between two points.
#[derive(Component, Clone, Debug)]
pub struct TweenPosition {
    pub from: Vec2,
    pub to: Vec2,
    pub playback: TweenPlayback,
}

impl TweenPosition {
    pub fn new(from: Vec2, to: Vec2, duration: f32) -> Self {
        TweenPosition {
            from,
            to,
            playback: TweenPlayback::new(duration),
        }
    }
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.playback.easing = easing;
        self
    }
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.playback.loop_mode = loop_mode;
        self
    }
    /// Start at `to` and play toward `from`.
    pub fn with_backwards(mut self) -> Self {
        self.playback.backwards();
        self
    }
}

/// Animates an entity's [`Rotation`](super::rotation::Rotation) between two angles in degrees.
#[derive(Component, Clone, Debug)]
pub struct TweenRotation {
    pub from: f32,
    pub to: f32,
    pub playback: TweenPlayback,
}

impl TweenRotation {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        TweenRotation {
            from,
            to,
            playback: TweenPlayback::new(duration),
        }
    }
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.playback.easing = easing;
        self
    }
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.playback.loop_mode = loop_mode;
        self
    }
    pub fn with_backwards(mut self) -> Self {
        self.playback.backwards();
        self
    }
}

/// Animates an entity's [`Scale`](super::scale::Scale) between two values.
#[derive(Component, Clone, Debug)]
pub struct TweenScale {
    pub from: Vec2,
    pub to: Vec2,
    pub playback: TweenPlayback,
}

impl TweenScale {
    pub fn new(from: Vec2, to: Vec2, duration: f32) -> Self {
        TweenScale {
            from,
            to,
            playback: TweenPlayback::new(duration),
        }
    }
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.playback.easing = easing;
        self
    }
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.playback.loop_mode = loop_mode;
        self
    }
    pub fn with_backwards(mut self) -> Self {
        self.playback.backwards();
        self
    }
}
