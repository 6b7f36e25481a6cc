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
//! Component capability surface
//!
//! Components come in two flavours:
//!
//! - **Behavioral** components implement [`Component`] and take part in the
//!   per-frame lifecycle: `initialize`, `update`, `draw_2d` and `draw_3d`.
//!   Every hook has a no-op default, so a component only writes the hooks it
//!   needs.
//! - **Data** components are plain `'static` values attached with
//!   `add_data`. They are stored and looked up like any other component but
//!   never dispatched.
//!
//! Hooks receive the owning entity as an [`EntityMut`](crate::ecs::EntityMut)
//! so they can read and attach siblings, join groups or destroy the entity.

use std::any::Any;

use crate::ecs::{EcsError, EntityMut};

/// Result of a lifecycle hook
pub type HookResult = Result<(), EcsError>;

/// Dynamic access to the concrete type behind a trait object
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A component with per-frame behavior
///
/// Within one entity, hooks run in attachment order. A component that depends
/// on a sibling either relies on the sibling being attached first, or ensures
/// it exists from `initialize` (attaching is idempotent, so "ensure X" is just
/// an attach).
///
/// `initialize` runs once when the component is attached and again when its
/// container is initialized, so it should tolerate repeated calls.
pub trait Component: AsAny {
    /// Prepare the component; resolve or create siblings here
    fn initialize(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        Ok(())
    }

    /// Advance the component by one frame
    fn update(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        Ok(())
    }

    /// Issue 2D draw calls
    fn draw_2d(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        Ok(())
    }

    /// Issue 3D draw calls
    fn draw_3d(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        Ok(())
    }
}

/// Storage for one attached component
pub(crate) enum Stored {
    /// A data component
    Data(Box<dyn Any>),
    /// A behavioral component; `None` while one of its hooks is running
    Behavior(Option<Box<dyn Component>>),
}

impl Stored {
    pub(crate) fn as_any(&self) -> Option<&dyn Any> {
        match self {
            Stored::Data(value) => Some(&**value),
            Stored::Behavior(Some(component)) => Some((**component).as_any()),
            Stored::Behavior(None) => None,
        }
    }

    pub(crate) fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        match self {
            Stored::Data(value) => Some(&mut **value),
            Stored::Behavior(Some(component)) => Some((**component).as_any_mut()),
            Stored::Behavior(None) => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_behavior(&self) -> bool {
        matches!(self, Stored::Behavior(_))
    }
}
