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
//! # sprite-ecs
//!
//! A small Entity Component System for 2D games, with components that drive
//! an external window/renderer collaborator to draw rectangles and sprites.
//!
//! ## Features
//!
//! - **ECS Core**: entities own their components; containers own entities;
//!   a registry ticks named containers in order
//! - **Behavior and Data Components**: hooks only where they are needed
//! - **Typed Errors**: missing components, containers and capacity limits are
//!   recoverable errors, and one failing hook never stops its siblings
//! - **Pluggable Rendering**: a narrow [`render::Backend`] trait plus a
//!   recording headless backend for tests and demos
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use sprite_ecs::components::{DrawMode, GeometryRenderer, Renderer, Screen, Window};
//! use sprite_ecs::ecs::{ContainerRegistry, EntityContainer, GroupId, TypeRegistry};
//! use sprite_ecs::render::headless::HeadlessBackend;
//! use sprite_ecs::render::{Rect, RenderContext};
//!
//! let ctx = RenderContext::new(HeadlessBackend::new());
//! let kinds = Rc::new(TypeRegistry::new());
//!
//! let mut game = EntityContainer::new(Rc::clone(&kinds));
//! game.add_entity()
//!     .add_component(GeometryRenderer::new(ctx.clone(), Rect::new(50, 100, 100, 50), DrawMode::Fill))
//!     .unwrap();
//!
//! let mut engine = EntityContainer::new(Rc::clone(&kinds));
//! let device = engine.add_entity_with_tag("device");
//! device.add_data(Screen::new("demo", 640, 480)).unwrap();
//! device.add_component(Window::new(ctx.clone())).unwrap();
//! device.add_component(Renderer::new(ctx.clone())).unwrap();
//! device.add_group(GroupId::ENGINE);
//!
//! let mut registry = ContainerRegistry::new();
//! registry.register("game", game);
//! registry.register("engine", engine);
//! assert!(registry.initialize_all().is_ok());
//! assert!(registry.tick().is_ok());
//! ```

#![warn(missing_docs)]

/// Built-in components
pub mod components;

/// Engine configuration
pub mod config;

/// Entity Component System implementation
pub mod ecs;

/// Keyboard and quit input
pub mod input;

/// Rendering collaborator contract
pub mod render;

pub use config::{ConfigError, EngineConfig};
pub use ecs::{
    Component, ContainerRegistry, EcsError, Entity, EntityContainer, EntityId, EntityMut,
    TypeRegistry,
};
pub use input::{Input, InputEvent, Key};
pub use render::{Backend, RenderContext};
