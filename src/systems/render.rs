//! Draw dispatch.
//!
//! The crate has no graphics backend. [`render_pass`] walks every entity
//! with a [`Drawable`] and a [`MapPosition`], orders them by [`ZIndex`] and
//! hands each one to a [`Renderer`] the host application implements.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::animation::FrameRegion;
use crate::components::drawable::Drawable;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::zindex::ZIndex;

/// Placement shared by every draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    /// World position of the entity pivot.
    pub position: Vec2,
    pub rotation_degrees: f32,
    pub scale: Vec2,
}

/// Backend receiving draw calls.
pub trait Renderer {
    /// `source` is `None` for a whole texture of `size` pixels.
    fn draw_sprite(
        &mut self,
        tex_key: &str,
        source: Option<FrameRegion>,
        size: Vec2,
        origin: Vec2,
        params: &DrawParams,
    );
    fn draw_text(&mut self, content: &str, font_size: f32, params: &DrawParams);
    fn draw_line(&mut self, from: Vec2, to: Vec2, thickness: f32);
}

/// Draw every visible entity, lowest [`ZIndex`] first.
///
/// Entities without a `ZIndex` draw at 0. Equal layers keep query order.
pub fn render_pass(world: &mut World, renderer: &mut impl Renderer) {
    let mut to_draw: Vec<(Drawable, DrawParams, ZIndex)> = {
        let mut q = world.query::<(
            &Drawable,
            &MapPosition,
            Option<&ZIndex>,
            Option<&Rotation>,
            Option<&Scale>,
        )>();
        q.iter(world)
            .map(|(drawable, pos, z, rot, scale)| {
                let params = DrawParams {
                    position: pos.pos,
                    rotation_degrees: rot.map_or(0.0, |r| r.degrees),
                    scale: scale.map_or(Vec2::ONE, |s| s.scale),
                };
                (drawable.clone(), params, z.copied().unwrap_or_default())
            })
            .collect()
    };

    to_draw.sort_by_key(|(_, _, z)| *z);

    for (drawable, params, _z) in &to_draw {
        match drawable {
            Drawable::StaticSprite {
                tex_key,
                width,
                height,
                origin,
            } => renderer.draw_sprite(tex_key, None, Vec2::new(*width, *height), *origin, params),
            Drawable::AnimatedSprite {
                tex_key,
                region,
                origin,
            } => renderer.draw_sprite(
                tex_key,
                Some(*region),
                Vec2::new(region.width as f32, region.height as f32),
                *origin,
                params,
            ),
            Drawable::Text { content, font_size } => renderer.draw_text(content, *font_size, params),
            Drawable::Line { to, thickness } => renderer.draw_line(params.position, *to, *thickness),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Renderer for Recorder {
        fn draw_sprite(
            &mut self,
            tex_key: &str,
            source: Option<FrameRegion>,
            _size: Vec2,
            _origin: Vec2,
            params: &DrawParams,
        ) {
            let kind = if source.is_some() { "frame" } else { "sprite" };
            self.calls
                .push(format!("{kind}:{tex_key}@{}", params.position.x));
        }

        fn draw_text(&mut self, content: &str, _font_size: f32, _params: &DrawParams) {
            self.calls.push(format!("text:{content}"));
        }

        fn draw_line(&mut self, from: Vec2, to: Vec2, _thickness: f32) {
            self.calls.push(format!("line:{}->{}", from.x, to.x));
        }
    }

    #[test]
    fn test_render_pass_sorts_by_zindex() {
        let mut world = World::new();
        world.spawn((
            Drawable::text("hud", 12.0),
            MapPosition::new(0.0, 0.0),
            ZIndex(10),
        ));
        world.spawn((
            Drawable::StaticSprite {
                tex_key: "bg".into(),
                width: 320.0,
                height: 240.0,
                origin: Vec2::ZERO,
            },
            MapPosition::new(1.0, 0.0),
            ZIndex(-5),
        ));
        world.spawn((
            Drawable::Line {
                to: Vec2::new(9.0, 0.0),
                thickness: 1.0,
            },
            MapPosition::new(2.0, 0.0),
        ));

        let mut recorder = Recorder::default();
        render_pass(&mut world, &mut recorder);
        assert_eq!(recorder.calls, vec!["sprite:bg@1", "line:2->9", "text:hud"]);
    }

    #[test]
    fn test_render_pass_skips_entities_without_position() {
        let mut world = World::new();
        world.spawn(Drawable::text("floating", 8.0));
        world.spawn((
            Drawable::animated("hero", FrameRegion { x: 0, y: 0, width: 16, height: 16 }),
            MapPosition::new(4.0, 4.0),
        ));

        let mut recorder = Recorder::default();
        render_pass(&mut world, &mut recorder);
        assert_eq!(recorder.calls, vec!["frame:hero@4"]);
    }
}
