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
//! Edge case tests for the ECS core
//!
//! Capacity limits, missing lookups, stale handles and failing hooks

use std::cell::Cell;
use std::rc::Rc;

use sprite_ecs::ecs::{
    Capacity, Component, ContainerRegistry, EcsError, Entity, EntityContainer, EntityMut,
    GroupId, HookResult, Missing, Phase, TypeRegistry, MAX_COMPONENTS, MAX_GROUPS,
};
use sprite_ecs::render::headless::HeadlessBackend;
use sprite_ecs::render::RenderContext;

struct Kind<const N: usize>;

macro_rules! register_kinds {
    ($registry:expr; $($n:literal)*) => {
        $( $registry.kind_of::<Kind<$n>>().unwrap(); )*
    };
}

fn full_registry() -> Rc<TypeRegistry> {
    let registry = Rc::new(TypeRegistry::new());
    register_kinds!(registry;
        0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
        16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31
        32 33 34 35 36 37 38 39 40 41 42 43 44 45 46 47
        48 49 50 51 52 53 54 55 56 57 58 59 60 61 62 63
    );
    registry
}

#[test]
fn test_kind_capacity_exceeded() {
    let registry = full_registry();
    assert_eq!(registry.len(), MAX_COMPONENTS);

    let err = registry.kind_of::<Kind<64>>().unwrap_err();
    assert_eq!(
        err,
        EcsError::CapacityExceeded {
            what: Capacity::ComponentKinds,
            limit: 64
        }
    );
    assert_eq!(registry.len(), MAX_COMPONENTS);
    assert!(registry.kind_of::<Kind<0>>().is_ok());
}

#[test]
fn test_attach_beyond_capacity_leaves_entity_intact() {
    let registry = full_registry();
    let mut entity = Entity::new(Rc::clone(&registry));
    entity.add_data(Kind::<7>).unwrap();

    assert!(matches!(
        entity.add_data(Kind::<64>),
        Err(EcsError::CapacityExceeded { .. })
    ));
    assert!(matches!(
        entity.add_component(Noop),
        Err(EcsError::CapacityExceeded { .. })
    ));
    assert_eq!(entity.component_count(), 1);
    assert!(entity.has::<Kind<7>>());
    assert!(!entity.has::<Kind<64>>());
}

#[test]
fn test_group_capacity() {
    assert!(GroupId::new(MAX_GROUPS - 1).is_ok());
    assert_eq!(
        GroupId::new(MAX_GROUPS),
        Err(EcsError::CapacityExceeded {
            what: Capacity::Groups,
            limit: MAX_GROUPS
        })
    );
}

struct Noop;

impl Component for Noop {}

#[test]
fn test_missing_lookups_are_typed() {
    let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
    let id = container.add_entity_with_tag("player").id();

    let entity = container.entity(id).unwrap();
    assert!(matches!(
        entity.get::<Noop>(),
        Err(EcsError::NotFound(Missing::Component(name))) if name.ends_with("Noop")
    ));
    assert!(matches!(
        container.find_by_tag("boss"),
        Err(EcsError::NotFound(Missing::Tag(_)))
    ));

    let registry = ContainerRegistry::new();
    let err = registry.get("engine").unwrap_err();
    assert_eq!(err.to_string(), "container \"engine\" not found");

    let ctx = RenderContext::new(HeadlessBackend::new());
    assert_eq!(
        ctx.texture("player"),
        Err(EcsError::NotFound(Missing::Texture("player".to_string())))
    );
}

#[test]
fn test_stale_handle_does_not_resolve_to_new_entity() {
    let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
    let old = container.add_entity_with_tag("old").id();
    container.kill_all();
    container.refresh();

    let new = container.add_entity_with_tag("new").id();
    assert_eq!(old.index(), new.index());
    assert_eq!(
        container.entity(old).unwrap_err(),
        EcsError::NotFound(Missing::Entity(old))
    );
    assert_eq!(container.entity(new).unwrap().tag(), "new");
}

struct Fails;

impl Component for Fails {
    fn update(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        Err(EcsError::NotFound(Missing::Renderer))
    }
}

struct Ticks(Rc<Cell<u32>>);

impl Component for Ticks {
    fn update(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        self.0.set(self.0.get() + 1);
        Ok(())
    }
}

#[test]
fn test_failing_hook_does_not_stop_other_entities() {
    let ticks = Rc::new(Cell::new(0));
    let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
    let failing = {
        let entity = container.add_entity();
        entity.add_component(Fails).unwrap();
        entity.add_component(Ticks(Rc::clone(&ticks))).unwrap();
        entity.id()
    };
    container
        .add_entity()
        .add_component(Ticks(Rc::clone(&ticks)))
        .unwrap();

    let mut registry = ContainerRegistry::new();
    registry.register("game", container);
    registry.initialize_all();
    let report = registry.tick();

    assert_eq!(ticks.get(), 2);
    assert_eq!(report.len(), 1);
    let failure = &report.failures()[0];
    assert_eq!(failure.phase, Phase::Update);
    assert_eq!(failure.entity, failing);
    assert!(failure.component.ends_with("Fails"));
    assert!(report.into_result().is_err());
}

#[test]
fn test_component_attached_mid_pass_joins_next_pass() {
    struct Spawner(Rc<Cell<u32>>);

    impl Component for Spawner {
        fn update(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
            entity.add_component(Ticks(Rc::clone(&self.0)))?;
            Ok(())
        }
    }

    let ticks = Rc::new(Cell::new(0));
    let mut entity = Entity::new(Rc::new(TypeRegistry::new()));
    entity.add_component(Spawner(Rc::clone(&ticks))).unwrap();

    entity.update();
    assert_eq!(ticks.get(), 0);
    assert!(entity.has::<Ticks>());

    entity.update();
    assert_eq!(ticks.get(), 1);
}

#[test]
fn test_hook_can_remove_itself() {
    struct OneShot(Rc<Cell<u32>>);

    impl Component for OneShot {
        fn update(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
            self.0.set(self.0.get() + 1);
            entity.remove::<OneShot>();
            Ok(())
        }
    }

    let runs = Rc::new(Cell::new(0));
    let mut entity = Entity::new(Rc::new(TypeRegistry::new()));
    entity.add_component(OneShot(Rc::clone(&runs))).unwrap();

    entity.update();
    entity.update();
    entity.update();
    assert_eq!(runs.get(), 1);
    assert_eq!(entity.component_count(), 0);
}

#[test]
fn test_readding_a_group_is_indexed_once() {
    let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
    let group = GroupId::new(1).unwrap();
    let entity = container.add_entity();
    entity.add_group(group);
    entity.add_group(group);
    let id = entity.id();

    assert_eq!(container.entities_by_group(group), vec![id]);
}

#[test]
fn test_regrouping_before_refresh_keeps_membership() {
    let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
    let group = GroupId::new(1).unwrap();
    let id = {
        let entity = container.add_entity();
        entity.add_group(group);
        entity.delete_group(group);
        entity.add_group(group);
        entity.id()
    };

    container.refresh();
    let members = container.entities_by_group(group);
    assert!(members.contains(&id));
}
