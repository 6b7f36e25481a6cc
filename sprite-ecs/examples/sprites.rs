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
//! Sprite example: a sprite sheet animated through five clips
//!
//! Loads a texture through the headless backend, spawns a few animated
//! characters from an archetype and reports which clip each one shows.

use std::rc::Rc;

use sprite_ecs::components::{Position, Renderer, Screen, Sprite, SpriteAnimation, TextureLoader, Window};
use sprite_ecs::ecs::{
    Archetype, ContainerRegistry, EcsError, EntityContainer, EntityId, TypeRegistry,
};
use sprite_ecs::render::headless::{DrawCommand, HeadlessBackend};
use sprite_ecs::render::{Rect, RenderContext, Rgba};

/// A walking character cut from a 128px-tall sprite strip
struct Walker {
    ctx: RenderContext,
    x: i32,
    speed: u32,
}

impl Archetype for Walker {
    fn spawn(&self, container: &mut EntityContainer) -> Result<EntityId, EcsError> {
        let entity = container.add_entity_with_tag("walker");
        entity.add_data(Position::new(self.x as f32, 300.0, 0.0))?;
        entity.add_component(Sprite::new(
            self.ctx.clone(),
            "walker",
            Rect::new(0, 0, 128, 128),
            Rect::new(self.x, 300, 64, 64),
        ))?;
        entity.add_component(SpriteAnimation::new(self.speed, 5))?;
        Ok(entity.id())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("sprite-ecs - Sprite Example");
    println!("===========================\n");

    let backend = HeadlessBackend::new();
    let log = backend.log();
    let ctx = RenderContext::new(backend);
    let kinds = Rc::new(TypeRegistry::new());

    let mut engine = EntityContainer::new(Rc::clone(&kinds));
    let device = engine.add_entity_with_tag("device");
    device.add_data(Screen::new("sprites", 800, 600))?;
    device.add_component(Window::new(ctx.clone()))?;
    device.add_component(Renderer::new(ctx.clone()))?;
    device.add_component(
        TextureLoader::new(ctx.clone(), "walker", "assets/walker.png")
            .with_color_key(Rgba::rgb(0xFF, 0x00, 0xFF)),
    )?;

    let mut game = EntityContainer::new(Rc::clone(&kinds));
    let walkers: Vec<EntityId> = [(100, 4), (300, 8), (500, 16)]
        .into_iter()
        .map(|(x, speed)| {
            game.spawn(&Walker {
                ctx: ctx.clone(),
                x,
                speed,
            })
        })
        .collect::<Result<_, _>>()?;

    let mut registry = ContainerRegistry::new();
    registry.register("game", game);
    registry.register("engine", engine);
    registry.initialize_all().into_result()?;

    for frame in 1..=40 {
        registry.tick().into_result()?;
        if frame % 10 == 0 {
            let game = registry.get("game")?;
            let clips: Vec<i32> = walkers
                .iter()
                .map(|&id| -> Result<i32, EcsError> {
                    Ok(game.entity(id)?.get::<Sprite>()?.src().x / 128)
                })
                .collect::<Result<_, _>>()?;
            println!("frame {:>2}: clips {:?}", frame, clips);
        }
    }

    let copies = log.count(|cmd| matches!(cmd, DrawCommand::CopyTexture { .. }));
    println!("\n{} texture copies issued", copies);

    Ok(())
}
