use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::ontimeline::{OnTimeline, runs_now};
use crate::components::rigidbody::RigidBody;
use crate::resources::worldtime::WorldTime;

/// Integrate velocity over the current sub-step.
///
/// Velocity is per host step, so it is scaled by the sub-step size; a
/// negative step retraces the path.
pub fn movement(
    mut query: Query<(&mut MapPosition, &RigidBody, Option<&OnTimeline>)>,
    time: Res<WorldTime>,
) {
    let scale = time.step_scale();
    if scale == 0.0 {
        return;
    }
    for (mut position, rigidbody, member) in query.iter_mut() {
        if rigidbody.frozen || !runs_now(member, &time) {
            continue;
        }
        position.pos += rigidbody.velocity * scale;
    }
}
