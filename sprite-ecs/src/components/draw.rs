// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Drawing components
//!
//! Each component here issues exactly one primitive or texture copy per
//! `draw_2d`, against the renderer published on its [`RenderContext`].

use glam::IVec2;

use crate::components::Color;
use crate::ecs::{Component, EntityMut, HookResult};
use crate::render::{RenderContext, Rect};

/// How a [`GeometryRenderer`] interprets its rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawMode {
    /// Filled rectangle
    #[default]
    Fill,
    /// Rectangle outline
    Wireframe,
    /// Line from `(x, y)` to `(w, h)`
    Line,
    /// Single pixel at `(x, y)`
    Point,
}

/// Draws a rectangle, outline, line or point in the sibling `Color`
///
/// A white `Color` is attached if the entity has none.
#[derive(Debug)]
pub struct GeometryRenderer {
    ctx: RenderContext,
    rect: Rect,
    mode: DrawMode,
}

impl GeometryRenderer {
    /// Draw `rect` in `mode`
    pub fn new(ctx: RenderContext, rect: Rect, mode: DrawMode) -> Self {
        GeometryRenderer { ctx, rect, mode }
    }

    /// Current rectangle
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Replace the rectangle
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Current mode
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Replace the mode
    pub fn set_mode(&mut self, mode: DrawMode) {
        self.mode = mode;
    }
}

impl Component for GeometryRenderer {
    fn initialize(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        entity.ensure_data::<Color>()?;
        Ok(())
    }

    fn draw_2d(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        let renderer = self.ctx.renderer()?;
        let color = entity.get::<Color>()?.0;
        let Rect { x, y, w, h } = self.rect;
        let mode = self.mode;
        self.ctx.with_backend(|backend| {
            backend.set_draw_color(renderer, color)?;
            match mode {
                DrawMode::Fill => backend.fill_rect(renderer, self.rect),
                DrawMode::Wireframe => backend.draw_rect(renderer, self.rect),
                DrawMode::Line => backend.draw_line(renderer, IVec2::new(x, y), IVec2::new(w, h)),
                DrawMode::Point => backend.draw_point(renderer, IVec2::new(x, y)),
            }
        })?;
        Ok(())
    }
}

/// Copies a region of a named texture onto the screen
#[derive(Debug)]
pub struct Sprite {
    ctx: RenderContext,
    texture: String,
    src: Rect,
    dst: Rect,
}

impl Sprite {
    /// Draw the `src` region of `texture` into `dst`
    pub fn new(ctx: RenderContext, texture: impl Into<String>, src: Rect, dst: Rect) -> Self {
        Sprite {
            ctx,
            texture: texture.into(),
            src,
            dst,
        }
    }

    /// Name of the texture drawn
    pub fn texture(&self) -> &str {
        &self.texture
    }

    /// Region read from the texture
    pub fn src(&self) -> Rect {
        self.src
    }

    /// Region written on screen
    pub fn dst(&self) -> Rect {
        self.dst
    }

    /// Replace the source region
    pub fn set_src(&mut self, src: Rect) {
        self.src = src;
    }

    /// Replace the destination region
    pub fn set_dst(&mut self, dst: Rect) {
        self.dst = dst;
    }
}

impl Component for Sprite {
    fn draw_2d(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        let renderer = self.ctx.renderer()?;
        let texture = self.ctx.texture(&self.texture)?;
        self.ctx
            .with_backend(|backend| backend.copy_texture(renderer, texture, self.src, self.dst))?;
        Ok(())
    }
}

/// Steps the sibling [`Sprite`] through a horizontal strip of clips
///
/// The clip shown during an update is
/// `frames / key_frame % clip_count`, where `frames` counts the updates
/// completed before it. The sprite's source rectangle moves to
/// `origin_x + clip * width`, with `origin_x` captured when the animation is
/// initialized. `key_frame` and `clip_count` are at least 1.
#[derive(Debug)]
pub struct SpriteAnimation {
    key_frame: u64,
    clip_count: u64,
    frames: u64,
    origin_x: Option<i32>,
}

impl SpriteAnimation {
    /// Advance one clip every `key_frame` updates, cycling over `clip_count`
    pub fn new(key_frame: u32, clip_count: u32) -> Self {
        SpriteAnimation {
            key_frame: u64::from(key_frame.max(1)),
            clip_count: u64::from(clip_count.max(1)),
            frames: 0,
            origin_x: None,
        }
    }

    /// Completed updates
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Clip the next update will show
    pub fn clip(&self) -> u64 {
        self.frames / self.key_frame % self.clip_count
    }
}

impl Component for SpriteAnimation {
    fn initialize(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        let src = entity.get::<Sprite>()?.src();
        self.origin_x.get_or_insert(src.x);
        Ok(())
    }

    fn update(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        let clip = self.clip() as i32;
        let sprite = entity.get_mut::<Sprite>()?;
        let origin_x = *self.origin_x.get_or_insert(sprite.src.x);
        sprite.src.x = origin_x + clip * sprite.src.w;
        self.frames += 1;
        Ok(())
    }
}

#[cfg(all(test, feature = "headless"))]
mod tests {
    use super::*;
    use crate::components::{Renderer, Screen, Window};
    use crate::ecs::{EcsError, Entity, Missing, TypeRegistry};
    use crate::render::headless::{CommandLog, DrawCommand, HeadlessBackend};
    use crate::render::Rgba;
    use std::path::Path;
    use std::rc::Rc;

    struct Fixture {
        ctx: RenderContext,
        log: CommandLog,
        kinds: Rc<TypeRegistry>,
        _engine: Entity,
    }

    fn fixture() -> Fixture {
        let backend = HeadlessBackend::new();
        let log = backend.log();
        let ctx = RenderContext::new(backend);
        let kinds = Rc::new(TypeRegistry::new());
        let mut engine = Entity::new(Rc::clone(&kinds));
        engine.add_data(Screen::new("test", 320, 240)).unwrap();
        engine.add_component(Window::new(ctx.clone())).unwrap();
        engine.add_component(Renderer::new(ctx.clone())).unwrap();
        log.clear();
        Fixture {
            ctx,
            log,
            kinds,
            _engine: engine,
        }
    }

    #[test]
    fn test_geometry_modes() {
        let fx = fixture();
        let renderer = fx.ctx.renderer().unwrap();
        let rect = Rect::new(1, 2, 3, 4);
        let expected = [
            (DrawMode::Fill, DrawCommand::FillRect { renderer, rect }),
            (DrawMode::Wireframe, DrawCommand::DrawRect { renderer, rect }),
            (
                DrawMode::Line,
                DrawCommand::DrawLine {
                    renderer,
                    from: IVec2::new(1, 2),
                    to: IVec2::new(3, 4),
                },
            ),
            (
                DrawMode::Point,
                DrawCommand::DrawPoint {
                    renderer,
                    at: IVec2::new(1, 2),
                },
            ),
        ];

        for (mode, command) in expected {
            let mut entity = Entity::new(Rc::clone(&fx.kinds));
            entity
                .add_component(GeometryRenderer::new(fx.ctx.clone(), rect, mode))
                .unwrap();
            fx.log.clear();
            assert!(entity.draw_2d().is_ok());
            assert_eq!(
                fx.log.snapshot(),
                vec![
                    DrawCommand::SetDrawColor {
                        renderer,
                        color: Rgba::WHITE
                    },
                    command
                ]
            );
        }
    }

    #[test]
    fn test_geometry_uses_sibling_color() {
        let fx = fixture();
        let mut entity = Entity::new(Rc::clone(&fx.kinds));
        entity.add_data(Color(Rgba::rgb(200, 0, 0))).unwrap();
        entity
            .add_component(GeometryRenderer::new(fx.ctx.clone(), Rect::default(), DrawMode::Fill))
            .unwrap();
        entity.draw_2d();

        assert_eq!(
            fx.log.count(|cmd| matches!(
                cmd,
                DrawCommand::SetDrawColor { color, .. } if *color == Rgba::rgb(200, 0, 0)
            )),
            1
        );
    }

    #[test]
    fn test_sprite_copies_registered_texture() {
        let fx = fixture();
        let texture = fx
            .ctx
            .with_backend(|backend| {
                backend.load_texture(fx.ctx.renderer().unwrap(), Path::new("hero.png"), None)
            })
            .unwrap();
        fx.ctx.textures_mut().register("hero", texture);

        let src = Rect::new(0, 0, 16, 16);
        let dst = Rect::new(40, 40, 32, 32);
        let mut entity = Entity::new(Rc::clone(&fx.kinds));
        entity
            .add_component(Sprite::new(fx.ctx.clone(), "hero", src, dst))
            .unwrap();
        assert!(entity.draw_2d().is_ok());

        assert_eq!(
            fx.log.count(|cmd| *cmd
                == DrawCommand::CopyTexture {
                    renderer: fx.ctx.renderer().unwrap(),
                    texture,
                    src,
                    dst
                }),
            1
        );
    }

    #[test]
    fn test_sprite_missing_texture_is_reported() {
        let fx = fixture();
        let mut entity = Entity::new(Rc::clone(&fx.kinds));
        entity
            .add_component(Sprite::new(fx.ctx.clone(), "ghost", Rect::default(), Rect::default()))
            .unwrap();

        let report = entity.draw_2d();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.failures()[0].error,
            EcsError::NotFound(Missing::Texture("ghost".to_string()))
        );
    }

    #[test]
    fn test_animation_steps_clips() {
        let fx = fixture();
        let mut entity = Entity::new(Rc::clone(&fx.kinds));
        entity
            .add_component(Sprite::new(
                fx.ctx.clone(),
                "sheet",
                Rect::new(32, 0, 16, 16),
                Rect::default(),
            ))
            .unwrap();
        entity.add_component(SpriteAnimation::new(2, 3)).unwrap();

        let xs: Vec<i32> = (0..8)
            .map(|_| {
                entity.update();
                entity.get::<Sprite>().unwrap().src().x
            })
            .collect();
        assert_eq!(xs, vec![32, 32, 48, 48, 64, 64, 32, 32]);
    }

    #[test]
    fn test_animation_clamps_zero_arguments() {
        let animation = SpriteAnimation::new(0, 0);
        assert_eq!(animation.clip(), 0);
    }

    #[test]
    fn test_animation_requires_sprite() {
        let fx = fixture();
        let mut entity = Entity::new(Rc::clone(&fx.kinds));
        assert!(entity.add_component(SpriteAnimation::new(1, 1)).is_err());
    }
}
