//! Tween animation systems.
//!
//! These systems update entity properties from tween components:
//! - [`tween_mapposition_system`] – animates [`MapPosition`](crate::components::mapposition::MapPosition)
//! - [`tween_rotation_system`] – animates [`Rotation`](crate::components::rotation::Rotation)
//! - [`tween_scale_system`] – animates [`Scale`](crate::components::scale::Scale)
//!
//! The systems read the signed sub-step delta from
//! [`WorldTime`](crate::resources::worldtime::WorldTime). A negative delta
//! moves every tween back toward where it came from.

use crate::components::mapposition::MapPosition;
use crate::components::ontimeline::{OnTimeline, runs_now};
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::tween::{Easing, LoopMode, TweenPlayback, TweenPosition, TweenRotation, TweenScale};
use crate::resources::worldtime::WorldTime;
use bevy_ecs::prelude::*;

/// Map linear progress through an easing curve.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub(crate) fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::QuadIn => t * t,
        Easing::QuadOut => t * (2.0 - t),
        Easing::QuadInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }
        Easing::CubicIn => t * t * t,
        Easing::CubicOut => {
            let p = t - 1.0;
            p * p * p + 1.0
        }
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let p = 2.0 * t - 2.0;
                0.5 * p * p * p + 1.0
            }
        }
    }
}

/// Linearly interpolate between two floats.
pub(crate) fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Advance tween time by a signed timeline delta.
///
/// Returns false when the tween did not move.
pub(crate) fn advance(pb: &mut TweenPlayback, dt: f32) -> bool {
    if !pb.playing || dt == 0.0 || pb.duration <= 0.0 {
        return false;
    }
    // a positive dt always moves toward the target end
    let step = if pb.forward { dt } else { -dt };
    if pb.finished {
        if dt > 0.0 {
            return false;
        }
        // rewound out of its end state
        pb.finished = false;
    }
    pb.time += step;

    let duration = pb.duration;
    if (0.0..=duration).contains(&pb.time) {
        // an exact landing on the target still finishes a one-shot tween
        if pb.loop_mode == LoopMode::Once && dt > 0.0 && reached_target(pb) {
            pb.finished = true;
        }
        return true;
    }

    match pb.loop_mode {
        LoopMode::Once => {
            if dt > 0.0 {
                pb.finished = true;
            }
            pb.time = pb.time.clamp(0.0, duration);
        }
        LoopMode::Loop => {
            pb.time = pb.time.rem_euclid(duration);
        }
        LoopMode::PingPong => {
            pb.time = if pb.time > duration {
                2.0 * duration - pb.time
            } else {
                -pb.time
            }
            .clamp(0.0, duration);
            pb.forward = !pb.forward;
        }
    }
    true
}

fn reached_target(pb: &TweenPlayback) -> bool {
    if pb.forward {
        pb.time >= pb.duration
    } else {
        pb.time <= 0.0
    }
}

fn eased(pb: &TweenPlayback) -> f32 {
    ease(pb.easing, pb.progress())
}

/// Drive [`MapPosition`] from [`TweenPosition`] by the signed sub-step delta.
pub fn tween_mapposition_system(
    world_time: Res<WorldTime>,
    mut query: Query<(&mut MapPosition, &mut TweenPosition, Option<&OnTimeline>)>,
) {
    let dt = world_time.delta_seconds();
    for (mut mp, mut tw, member) in query.iter_mut() {
        if runs_now(member, &world_time) && advance(&mut tw.playback, dt) {
            mp.pos = tw.from.lerp(tw.to, eased(&tw.playback));
        }
    }
}

/// Drive [`Rotation`] from [`TweenRotation`] by the signed sub-step delta.
pub fn tween_rotation_system(
    world_time: Res<WorldTime>,
    mut query: Query<(&mut Rotation, &mut TweenRotation, Option<&OnTimeline>)>,
) {
    let dt = world_time.delta_seconds();
    for (mut rot, mut tw, member) in query.iter_mut() {
        if runs_now(member, &world_time) && advance(&mut tw.playback, dt) {
            rot.degrees = lerp_f32(tw.from, tw.to, eased(&tw.playback));
        }
    }
}

/// Drive [`Scale`] from [`TweenScale`] by the signed sub-step delta.
pub fn tween_scale_system(
    world_time: Res<WorldTime>,
    mut query: Query<(&mut Scale, &mut TweenScale, Option<&OnTimeline>)>,
) {
    let dt = world_time.delta_seconds();
    for (mut scale, mut tw, member) in query.iter_mut() {
        if runs_now(member, &world_time) && advance(&mut tw.playback, dt) {
            scale.scale = tw.from.lerp(tw.to, eased(&tw.playback));
        }
    }
}
