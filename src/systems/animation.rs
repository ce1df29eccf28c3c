//! Animation system.
//!
//! [`animation`] advances every [`Animated`] clock by the current sub-step
//! and copies the frame being shown into the entity's
//! [`Drawable::AnimatedSprite`] region.
//!
//! # Animation Flow
//!
//! 1. Sequences are built from [`SequenceDef`](crate::animation::SequenceDef)s
//!    or by hand and handed to [`Animated::new`]
//! 2. A timeline sets [`WorldTime`] and runs the schedule once per sub-step
//! 3. This system advances each clock, which fires the frame actions of
//!    every frame it enters; those actions queue work on [`DeferredActions`]
//! 4. [`Game::tick`](crate::game::Game::tick) drains the queue after all
//!    timelines have advanced

use bevy_ecs::prelude::*;

use crate::components::animated::Animated;
use crate::components::drawable::Drawable;
use crate::components::ontimeline::{OnTimeline, runs_now};
use crate::resources::deferred::DeferredActions;
use crate::resources::worldtime::WorldTime;

/// Advance animation playback and sync the sprite frame.
///
/// Contract
/// - Reads [`WorldTime`] for the signed sub-step delta.
/// - Frame actions get mutable access to [`DeferredActions`].
/// - Entities on another timeline are skipped.
/// - Entities without a [`Drawable`], or with a non-sprite one, are still
///   advanced.
pub fn animation(
    mut query: Query<(&mut Animated, Option<&mut Drawable>, Option<&OnTimeline>)>,
    time: Res<WorldTime>,
    mut deferred: ResMut<DeferredActions>,
) {
    for (mut animated, drawable, member) in query.iter_mut() {
        if !runs_now(member, &time) {
            continue;
        }
        animated.clock.advance_snapshot(&time.snapshot, &mut deferred);

        let Some(mut drawable) = drawable else {
            continue;
        };
        let Some(current) = animated.clock.current_region() else {
            continue;
        };
        // read first so unchanged frames do not trip change detection
        if !matches!(&*drawable, Drawable::AnimatedSprite { region, .. } if *region != current) {
            continue;
        }
        if let Drawable::AnimatedSprite { region, .. } = &mut *drawable {
            *region = current;
        }
    }
}
