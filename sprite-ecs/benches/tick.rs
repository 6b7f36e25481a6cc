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
//! Benchmarks for the per-frame tick
//!
//! These benchmarks measure:
//! - A full registry tick over entities with behavior and data components
//! - Component lookup through the kind slots
//! - Refresh throughput when half the entities die every frame

use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sprite_ecs::components::{
    Color, Counter, DrawMode, GeometryRenderer, Position, Renderer, Screen, Transform, Window,
};
use sprite_ecs::ecs::{ContainerRegistry, EntityContainer, TypeRegistry};
use sprite_ecs::render::headless::HeadlessBackend;
use sprite_ecs::render::{Rect, RenderContext};

fn build_registry(entity_count: usize) -> ContainerRegistry {
    let ctx = RenderContext::new(HeadlessBackend::new());
    let kinds = Rc::new(TypeRegistry::new());

    let mut game = EntityContainer::new(Rc::clone(&kinds));
    for i in 0..entity_count {
        let entity = game.add_entity();
        entity.add_component(Transform).unwrap();
        entity.add_component(Counter::new(60)).unwrap();
        entity
            .add_component(GeometryRenderer::new(
                ctx.clone(),
                Rect::new(i as i32 % 640, i as i32 % 480, 8, 8),
                DrawMode::Fill,
            ))
            .unwrap();
    }

    let mut engine = EntityContainer::new(kinds);
    let device = engine.add_entity();
    device.add_data(Screen::new("bench", 640, 480)).unwrap();
    device.add_component(Window::new(ctx.clone())).unwrap();
    device.add_component(Renderer::new(ctx)).unwrap();

    let mut registry = ContainerRegistry::new();
    registry.register("game", game);
    registry.register("engine", engine);
    registry.initialize_all();
    registry
}

/// Benchmark: one full frame
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for entity_count in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*entity_count as u64));
        group.bench_with_input(
            BenchmarkId::new("registry", entity_count),
            entity_count,
            |b, &count| {
                let mut registry = build_registry(count);
                b.iter(|| black_box(registry.tick()));
            },
        );
    }

    group.finish();
}

/// Benchmark: component lookup on every entity
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for entity_count in [100, 1000, 10000].iter() {
        group.throughput(Throughput::Elements(*entity_count as u64));
        group.bench_with_input(
            BenchmarkId::new("get", entity_count),
            entity_count,
            |b, &count| {
                let registry = build_registry(count);
                let game = registry.get("game").unwrap();
                b.iter(|| {
                    let mut sum = 0.0;
                    for entity in game.iter() {
                        sum += entity.get::<Position>().unwrap().0.x;
                        black_box(entity.get::<Color>().unwrap());
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: spawning and killing half the entities each frame
fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");

    for entity_count in [100, 1000].iter() {
        group.throughput(Throughput::Elements(*entity_count as u64));
        group.bench_with_input(
            BenchmarkId::new("refresh", entity_count),
            entity_count,
            |b, &count| {
                let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
                b.iter(|| {
                    for _ in 0..count {
                        container.add_entity().add_data(Position::default()).unwrap();
                    }
                    for entity in container.iter_mut().step_by(2) {
                        entity.destroy();
                    }
                    container.refresh();
                    container.kill_all();
                    container.refresh();
                    black_box(container.len())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(tick_benches, bench_tick, bench_lookup, bench_churn);
criterion_main!(tick_benches);
