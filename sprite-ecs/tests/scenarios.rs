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
//! End-to-end frames against the headless backend

use std::rc::Rc;

use sprite_ecs::components::{DrawMode, GeometryRenderer, Renderer, Sprite, SpriteAnimation, Window};
use sprite_ecs::ecs::{ContainerRegistry, EntityContainer, GroupId, TypeRegistry};
use sprite_ecs::render::headless::{CommandLog, DrawCommand, HeadlessBackend};
use sprite_ecs::render::{Rect, RenderContext};
use sprite_ecs::{EngineConfig, Input, InputEvent};

fn headless() -> (RenderContext, CommandLog) {
    let backend = HeadlessBackend::new();
    let log = backend.log();
    (RenderContext::new(backend), log)
}

fn engine_container(kinds: &Rc<TypeRegistry>, ctx: &RenderContext) -> EntityContainer {
    let config = EngineConfig::default();
    let mut engine = EntityContainer::new(Rc::clone(kinds));
    let device = engine.add_entity_with_tag("device");
    device.add_data(config.screen()).unwrap();
    device.add_data(config.clear_color()).unwrap();
    device.add_component(Window::new(ctx.clone())).unwrap();
    device.add_component(Renderer::new(ctx.clone())).unwrap();
    device.add_group(GroupId::ENGINE);
    engine
}

#[test]
fn test_engine_frame_clears_and_presents_once() {
    let (ctx, log) = headless();
    let kinds = Rc::new(TypeRegistry::new());
    let mut registry = ContainerRegistry::new();
    registry.register("engine", engine_container(&kinds, &ctx));

    assert!(registry.initialize_all().is_ok());
    assert!(registry.tick().is_ok());

    assert_eq!(log.count(|cmd| matches!(cmd, DrawCommand::Clear(_))), 1);
    assert_eq!(log.count(|cmd| matches!(cmd, DrawCommand::Present(_))), 1);
    assert_eq!(log.count(|cmd| matches!(cmd, DrawCommand::CreateWindow { .. })), 1);
    assert_eq!(log.count(|cmd| matches!(cmd, DrawCommand::CreateRenderer { .. })), 1);
}

#[test]
fn test_geometry_in_game_container_draws_on_engine_renderer() {
    let (ctx, log) = headless();
    let kinds = Rc::new(TypeRegistry::new());
    let mut registry = ContainerRegistry::new();

    let mut game = EntityContainer::new(Rc::clone(&kinds));
    let rect = Rect::new(50, 100, 100, 50);
    game.add_entity()
        .add_component(GeometryRenderer::new(ctx.clone(), rect, DrawMode::Fill))
        .unwrap();
    registry.register("game", game);
    registry.register("engine", engine_container(&kinds, &ctx));
    assert!(registry.initialize_all().is_ok());

    let engine_renderer = registry
        .get("engine")
        .unwrap()
        .find_by_tag("device")
        .unwrap()
        .get::<Renderer>()
        .unwrap()
        .handle()
        .unwrap();

    assert!(registry.tick().is_ok());

    let fills: Vec<DrawCommand> = log
        .snapshot()
        .into_iter()
        .filter(|cmd| matches!(cmd, DrawCommand::FillRect { .. }))
        .collect();
    assert_eq!(
        fills,
        vec![DrawCommand::FillRect {
            renderer: engine_renderer,
            rect
        }]
    );

    let commands = log.snapshot();
    let fill_at = commands
        .iter()
        .position(|cmd| matches!(cmd, DrawCommand::FillRect { .. }))
        .unwrap();
    let present_at = commands
        .iter()
        .position(|cmd| matches!(cmd, DrawCommand::Present(_)))
        .unwrap();
    assert!(fill_at < present_at);
}

#[test]
fn test_game_container_after_engine_draws_into_next_frame() {
    let (ctx, log) = headless();
    let kinds = Rc::new(TypeRegistry::new());
    let mut registry = ContainerRegistry::new();
    registry.register("engine", engine_container(&kinds, &ctx));

    let mut game = EntityContainer::new(Rc::clone(&kinds));
    game.add_entity()
        .add_component(GeometryRenderer::new(
            ctx.clone(),
            Rect::new(0, 0, 10, 10),
            DrawMode::Fill,
        ))
        .unwrap();
    registry.register("game", game);
    assert!(registry.initialize_all().is_ok());

    log.clear();
    assert!(registry.tick().is_ok());

    let commands = log.snapshot();
    let fill_at = commands
        .iter()
        .position(|cmd| matches!(cmd, DrawCommand::FillRect { .. }))
        .unwrap();
    let clear_at = commands
        .iter()
        .position(|cmd| matches!(cmd, DrawCommand::Clear(_)))
        .unwrap();
    assert!(matches!(commands[0], DrawCommand::Present(_)));
    assert!(clear_at < fill_at);
}

#[test]
fn test_sprite_animation_reaches_second_clip_after_121_updates() {
    let (ctx, _log) = headless();
    let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
    let id = {
        let entity = container.add_entity();
        entity
            .add_component(Sprite::new(
                ctx.clone(),
                "sheet",
                Rect::new(0, 0, 128, 128),
                Rect::new(0, 0, 128, 128),
            ))
            .unwrap();
        entity.add_component(SpriteAnimation::new(120, 5)).unwrap();
        entity.id()
    };
    container.initialize().unwrap();

    for _ in 0..120 {
        container.update();
    }
    assert_eq!(container.entity(id).unwrap().get::<Sprite>().unwrap().src().x, 0);

    container.update();
    let sprite = container.entity(id).unwrap().get::<Sprite>().unwrap();
    assert_eq!(sprite.src().x, 128);
    assert_eq!(sprite.src().w, 128);
}

#[test]
fn test_host_loop_stops_on_quit() {
    let backend = HeadlessBackend::new();
    let events = backend.events();
    let log = backend.log();
    let ctx = RenderContext::new(backend);
    let kinds = Rc::new(TypeRegistry::new());
    let mut registry = ContainerRegistry::new();
    registry.register("engine", engine_container(&kinds, &ctx));
    registry.initialize_all();

    let mut input = Input::new();
    let mut frames = 0;
    while !input.quit_requested() && frames < 100 {
        registry.tick();
        frames += 1;
        if frames == 3 {
            events.push(InputEvent::Quit);
        }
        input.poll(&ctx);
    }

    assert_eq!(frames, 3);
    assert_eq!(log.count(|cmd| matches!(cmd, DrawCommand::Present(_))), 3);
}
