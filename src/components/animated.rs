//! Animated entity component.
//!
//! [`Animated`] attaches an [`AnimationClock`] to an entity. Its frame
//! actions receive the [`DeferredActions`] queue, so a frame can schedule
//! world changes (spawning a projectile on the release frame, switching to
//! an idle loop when an attack ends) without touching the entities being
//! iterated.
//!
//! See [`crate::systems::animation`] for the system that advances it.

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;

use crate::animation::{AnimationClock, FrameSequence};
use crate::error::AnimationError;
use crate::resources::deferred::DeferredActions;
use crate::timing::RateSign;

/// Frame sequence whose actions queue deferred world changes.
pub type EntitySequence = FrameSequence<DeferredActions>;

#[derive(Component, Debug)]
pub struct Animated {
    pub clock: AnimationClock<DeferredActions>,
}

impl Animated {
    /// Wrap a table of sequences and start playing `initial`.
    pub fn new(
        sequences: FxHashMap<String, EntitySequence>,
        initial: &str,
        rate_sign: RateSign,
    ) -> Result<Self, AnimationError> {
        Ok(Self {
            clock: AnimationClock::new(sequences, rate_sign).with_active(initial)?,
        })
    }

    /// Switch the playing sequence. Errors leave playback unchanged.
    ///
    /// Playback starts at the last frame only while the entity's timeline
    /// runs backward; [`Game`](crate::game::Game) keeps that sign current.
    pub fn play(&mut self, name: &str) -> Result<(), AnimationError> {
        self.clock.set_active_sequence(name)
    }
}
