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
//! Entity Component System (ECS) core
//!
//! This module provides the scaffold every game object is built from:
//! - Dense component kind identifiers ([`TypeRegistry`])
//! - Entities owning their components ([`Entity`])
//! - Containers driving entity lifecycles ([`EntityContainer`])
//! - A named registry ticking containers in order ([`ContainerRegistry`])
//!
//! Everything here is single-threaded; lifecycle hooks run synchronously
//! on the thread that ticks the registry.

pub(crate) mod component;
mod container;
pub(crate) mod entity;
mod error;
pub(crate) mod group;
pub(crate) mod kind;
mod registry;

pub use component::{AsAny, Component, HookResult};
pub use container::{Archetype, ContainerState, EntityContainer};
pub use entity::{Entity, EntityId, EntityMut};
pub use error::{Capacity, DispatchReport, EcsError, HookFailure, Missing, Phase};
pub use group::{GroupId, GroupSet, MAX_GROUPS};
pub use kind::{ComponentKindId, KindSet, TypeRegistry, MAX_COMPONENTS};
pub use registry::{with_global, ContainerRegistry};

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_registry_creation() {
        let registry = ContainerRegistry::new();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_entity_creation() {
        let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
        let id = container.add_entity().id();
        assert_eq!(container.len(), 1);
        assert!(container.entity(id).unwrap().is_active());
    }
}
