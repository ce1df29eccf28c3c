//! Timeline membership.
//!
//! Every timeline runs its schedule over the whole world, so the
//! per-sub-step systems skip entities that belong to another timeline.
//! Entities without an [`OnTimeline`] belong to
//! [`WORLD_TIMELINE`](crate::game::WORLD_TIMELINE).

use bevy_ecs::prelude::Component;

use crate::game::WORLD_TIMELINE;
use crate::resources::worldtime::WorldTime;

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct OnTimeline(pub String);

impl OnTimeline {
    pub fn new(name: impl Into<String>) -> Self {
        OnTimeline(name.into())
    }
}

/// Whether an entity with `member` belongs to `timeline`.
pub fn belongs_to(member: Option<&OnTimeline>, timeline: &str) -> bool {
    member.map_or(WORLD_TIMELINE, |m| m.0.as_str()) == timeline
}

/// Whether an entity with `member` is simulated by the running timeline.
pub fn runs_now(member: Option<&OnTimeline>, time: &WorldTime) -> bool {
    belongs_to(member, &time.timeline)
}
