//! Kinematic body component.
//!
//! Velocity is expressed in world units per host step at a rate of 1x, so
//! the [`movement`](crate::systems::movement::movement) system scales it by
//! each sub-step's size. Under a negative rate bodies retrace their path.
//!
//! The `frozen` flag skips movement while the position is driven
//! externally.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct RigidBody {
    /// World units per host step at 1x.
    pub velocity: Vec2,
    /// When true, the movement system leaves this entity alone.
    pub frozen: bool,
}

impl RigidBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            frozen: false,
        }
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}
