use bevy_ecs::prelude::Component;

/// Rotation around the entity pivot.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}

impl Rotation {
    pub fn from_degrees(degrees: f32) -> Self {
        Self { degrees }
    }

    pub fn radians(&self) -> f32 {
        self.degrees.to_radians()
    }
}
