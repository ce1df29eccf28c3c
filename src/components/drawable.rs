//! What an entity looks like on screen.
//!
//! [`Drawable`] is a closed set of visual kinds. The renderer dispatches on
//! the variant; there is no per-kind trait object. Positions come from the
//! entity's [`MapPosition`](super::mapposition::MapPosition), which is the
//! pivot for sprites, the anchor for text and the start point for lines.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::animation::FrameRegion;

#[derive(Component, Clone, Debug, PartialEq)]
pub enum Drawable {
    /// A whole texture.
    StaticSprite {
        tex_key: String,
        width: f32,
        height: f32,
        /// Pivot in pixels from the texture's top-left.
        origin: Vec2,
    },
    /// One frame of an atlas, kept in sync with the entity's
    /// [`Animated`](super::animated::Animated) clock.
    AnimatedSprite {
        tex_key: String,
        region: FrameRegion,
        origin: Vec2,
    },
    Text {
        content: String,
        font_size: f32,
    },
    /// Segment from the entity position to `to` (world space).
    Line { to: Vec2, thickness: f32 },
}

impl Drawable {
    /// Animated sprite with its pivot at the frame center.
    pub fn animated(tex_key: impl Into<String>, region: FrameRegion) -> Self {
        Drawable::AnimatedSprite {
            tex_key: tex_key.into(),
            origin: Vec2::new(region.width as f32 / 2.0, region.height as f32 / 2.0),
            region,
        }
    }

    pub fn text(content: impl Into<String>, font_size: f32) -> Self {
        Drawable::Text {
            content: content.into(),
            font_size,
        }
    }
}
