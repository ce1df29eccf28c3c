//! Z-index component for render ordering.

use bevy_ecs::prelude::Component;

/// Rendering order hint. Higher values are drawn later (on top);
/// entities without one draw at 0.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);
