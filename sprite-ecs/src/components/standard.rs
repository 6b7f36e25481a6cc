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
//! General-purpose data and behavior components

use glam::{IVec2, Vec2, Vec3};

use crate::ecs::{Component, EntityMut, HookResult};
use crate::render::{Rect, Rgba, WindowSpec};

/// World position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position(pub Vec3);

impl Position {
    /// Create a position from its coordinates
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Position(Vec3::new(x, y, z))
    }
}

/// Euler rotation in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation(pub Vec3);

/// Per-axis scale factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(pub Vec3);

impl Default for Scale {
    fn default() -> Self {
        Scale(Vec3::ONE)
    }
}

/// Draw color of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub Rgba);

impl Default for Color {
    fn default() -> Self {
        Color(Rgba::WHITE)
    }
}

/// Axis-aligned facing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// +X
    #[default]
    XForward,
    /// -X
    XBack,
    /// +Y
    YForward,
    /// -Y
    YBack,
    /// +Z
    ZForward,
    /// -Z
    ZBack,
}

impl Direction {
    /// Unit vector pointing along this direction
    pub fn unit(self) -> Vec3 {
        match self {
            Direction::XForward => Vec3::X,
            Direction::XBack => Vec3::NEG_X,
            Direction::YForward => Vec3::Y,
            Direction::YBack => Vec3::NEG_Y,
            Direction::ZForward => Vec3::Z,
            Direction::ZBack => Vec3::NEG_Z,
        }
    }
}

/// Downward acceleration applied per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity(pub f32);

impl Gravity {
    /// 9.8 m/s² at 60 frames per second, 32 pixels per meter, tripled
    pub const DEFAULT: f32 = 9.8 / 60.0 / 60.0 * 32.0 * 3.0;
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity(Gravity::DEFAULT)
    }
}

/// Title, position and size of the window the engine opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Window title
    pub title: String,
    /// Window position
    pub position: IVec2,
    /// Client area size
    pub size: IVec2,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            title: "title".to_string(),
            position: IVec2::ZERO,
            size: IVec2::ZERO,
        }
    }
}

impl Screen {
    /// A screen at the origin
    pub fn new(title: impl Into<String>, width: i32, height: i32) -> Self {
        Screen {
            title: title.into(),
            position: IVec2::ZERO,
            size: IVec2::new(width, height),
        }
    }

    /// Window creation parameters for the backend
    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec {
            title: self.title.clone(),
            position: self.position,
            size: self.size,
        }
    }
}

/// Makes sure the entity has a position, rotation and scale
#[derive(Debug, Default)]
pub struct Transform;

impl Component for Transform {
    fn initialize(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        entity.ensure_data::<Position>()?;
        entity.ensure_data::<Rotation>()?;
        entity.ensure_data::<Scale>()?;
        Ok(())
    }
}

/// Counts updates, starting over once `max` is reached
#[derive(Debug, Default)]
pub struct Counter {
    count: u32,
    max: u32,
}

impl Counter {
    /// A counter wrapping at `max`
    pub fn new(max: u32) -> Self {
        Counter { count: 0, max }
    }

    /// Completed counts since the last wrap or reset
    pub fn count(&self) -> u32 {
        self.count
    }

    /// True once the count has reached the maximum
    pub fn is_max(&self) -> bool {
        self.count >= self.max
    }

    /// Start over from zero
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl Component for Counter {
    fn initialize(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        self.reset();
        Ok(())
    }

    fn update(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        if self.is_max() {
            self.reset();
        }
        self.count += 1;
        Ok(())
    }
}

/// Destroys its entity once the sibling [`Counter`] reaches its maximum
///
/// If the entity has no counter yet, one spanning `span` updates is attached.
/// The counter is checked before it advances, so the entity is destroyed
/// during update `span + 1` and dropped on the following refresh.
#[derive(Debug, Default)]
pub struct KillEntity {
    span: u32,
}

impl KillEntity {
    /// Destroy the entity after `span` updates
    pub fn new(span: u32) -> Self {
        KillEntity { span }
    }
}

impl Component for KillEntity {
    fn initialize(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        entity.add_component(Counter::new(self.span))?;
        Ok(())
    }

    fn update(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        if entity.get::<Counter>()?.is_max() {
            log::trace!("{} expired", entity.id());
            entity.destroy();
        }
        Ok(())
    }
}

/// Axis-aligned box collider anchored at the entity's position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Collider2D {
    /// Box size in pixels
    pub size: Vec2,
}

impl Collider2D {
    /// A collider of the given size
    pub fn new(width: f32, height: f32) -> Self {
        Collider2D {
            size: Vec2::new(width, height),
        }
    }

    /// Screen rectangle covered when anchored at `position`
    pub fn bounds(&self, position: &Position) -> Rect {
        Rect::new(
            position.0.x as i32,
            position.0.y as i32,
            self.size.x as i32,
            self.size.y as i32,
        )
    }

    /// True if this collider at `position` overlaps `other` at `other_position`
    pub fn intersects(&self, position: &Position, other: &Collider2D, other_position: &Position) -> bool {
        self.bounds(position).intersects(&other.bounds(other_position))
    }
}

impl Component for Collider2D {
    fn initialize(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        entity.ensure_data::<Position>()?;
        Ok(())
    }
}
