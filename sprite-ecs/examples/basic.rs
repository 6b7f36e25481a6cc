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
//! Basic example: a window, a renderer and a few rectangles
//!
//! Runs headless and prints what the backend was asked to draw. Set
//! `SPRITE_ECS_CONFIG` to a JSON file to change the window or frame count,
//! and `RUST_LOG=debug` to watch the lifecycle.

use std::rc::Rc;

use sprite_ecs::components::{Color, DrawMode, GeometryRenderer, KillEntity, Renderer, Window};
use sprite_ecs::ecs::{ContainerRegistry, EntityContainer, GroupId, TypeRegistry};
use sprite_ecs::render::headless::{DrawCommand, HeadlessBackend};
use sprite_ecs::render::{Rect, RenderContext, Rgba};
use sprite_ecs::{EngineConfig, Input, InputEvent};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("sprite-ecs - Basic Example");
    println!("==========================\n");

    let config = EngineConfig::from_env()?;
    let frame_limit = config.frame_limit.unwrap_or(5);

    let backend = HeadlessBackend::new();
    let log = backend.log();
    let events = backend.events();
    let ctx = RenderContext::new(backend);
    let kinds = Rc::new(TypeRegistry::new());

    // Engine container: registered last so it presents after the game draws
    let mut engine = EntityContainer::new(Rc::clone(&kinds));
    let device = engine.add_entity_with_tag("device");
    device.add_data(config.screen())?;
    device.add_data(config.clear_color())?;
    device.add_component(Window::new(ctx.clone()))?;
    device.add_component(Renderer::new(ctx.clone()))?;
    device.add_group(GroupId::ENGINE);

    let mut game = EntityContainer::new(Rc::clone(&kinds));
    let floor = game.add_entity_with_tag("floor");
    floor.add_data(Color(Rgba::rgb(40, 40, 40)))?;
    floor.add_component(GeometryRenderer::new(
        ctx.clone(),
        Rect::new(0, 600, 1080, 120),
        DrawMode::Fill,
    ))?;

    let flash = game.add_entity_with_tag("flash");
    flash.add_data(Color(Rgba::rgb(255, 0, 0)))?;
    flash.add_component(GeometryRenderer::new(
        ctx.clone(),
        Rect::new(50, 100, 100, 50),
        DrawMode::Wireframe,
    ))?;
    flash.add_component(KillEntity::new(2))?;

    let mut registry = ContainerRegistry::new();
    registry.register("game", game);
    registry.register("engine", engine);
    registry.initialize_all().into_result()?;

    let mut input = Input::new();
    let mut frame = 0;
    while !input.quit_requested() {
        let report = registry.tick();
        frame += 1;
        println!(
            "frame {:>3}: {} game entities, {} draw calls, {} hook failures",
            frame,
            registry.get("game")?.len(),
            log.len(),
            report.len()
        );
        log.clear();

        if frame >= frame_limit {
            events.push(InputEvent::Quit);
        }
        input.poll(&ctx);
    }

    drop(registry);
    let released = log.count(|cmd| {
        matches!(
            cmd,
            DrawCommand::DestroyRenderer(_) | DrawCommand::DestroyWindow(_)
        )
    });
    println!("\nShut down after {} frames, released {} resources", frame, released);

    Ok(())
}
