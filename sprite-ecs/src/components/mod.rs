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
//! Built-in components
//!
//! - [`standard`]: positions, colors, counters, colliders
//! - [`engine`]: window, renderer and texture ownership
//! - [`draw`]: geometry, sprites and sprite-sheet animation
//!
//! All public types are re-exported here.

pub mod draw;
pub mod engine;
pub mod standard;

pub use draw::{DrawMode, GeometryRenderer, Sprite, SpriteAnimation};
pub use engine::{Renderer, TextureLoader, Window};
pub use standard::{
    Collider2D, Color, Counter, Direction, Gravity, KillEntity, Position, Rotation, Scale, Screen,
    Transform,
};
