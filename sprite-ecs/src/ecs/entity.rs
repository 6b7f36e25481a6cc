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
//! Entities
//!
//! An [`Entity`] is one logical game object: it exclusively owns the
//! components attached to it, keyed by component kind, and records which
//! groups it belongs to.
//!
//! Components live in a dense vector in attachment order, which is also the
//! dispatch order. A fixed per-kind lookup array and a presence set give O(1)
//! `has`/`get`. Removing a component only flags it; the vector is compacted at
//! the start of the next `update`, which is where the component is dropped.

use std::any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::ecs::component::Stored;
use crate::ecs::group::GroupIndex;
use crate::ecs::kind::{KindSet, MAX_COMPONENTS};
use crate::ecs::{
    Component, ComponentKindId, DispatchReport, EcsError, GroupId, GroupSet, HookFailure,
    Missing, Phase, TypeRegistry,
};

/// Generation-checked handle to an entity inside its container
///
/// Indices are reused after an entity is removed; the generation tells a
/// stale handle apart from the entity now living at the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u64,
    generation: u32,
}

impl EntityId {
    /// Create a handle from its raw parts
    pub fn new(index: u64, generation: u32) -> Self {
        EntityId { index, generation }
    }

    /// Slot index inside the owning container
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Generation of the slot when this handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}, gen: {})", self.index, self.generation)
    }
}

struct Entry {
    kind: ComponentKindId,
    name: &'static str,
    active: bool,
    stored: Stored,
}

/// A bag of components forming one game object
pub struct Entity {
    id: EntityId,
    tag: String,
    active: bool,
    kinds: Rc<TypeRegistry>,
    group_index: Weak<RefCell<GroupIndex>>,
    entries: Vec<Entry>,
    slots: [Option<usize>; MAX_COMPONENTS],
    present: KindSet,
    groups: GroupSet,
}

impl Entity {
    /// Create a free-standing entity that belongs to no container
    ///
    /// Group membership is still recorded, but no container indexes it.
    pub fn new(kinds: Rc<TypeRegistry>) -> Self {
        Self::attached(EntityId::new(0, 0), String::new(), kinds, Weak::new())
    }

    pub(crate) fn attached(
        id: EntityId,
        tag: String,
        kinds: Rc<TypeRegistry>,
        group_index: Weak<RefCell<GroupIndex>>,
    ) -> Self {
        Entity {
            id,
            tag,
            active: true,
            kinds,
            group_index,
            entries: Vec::new(),
            slots: [None; MAX_COMPONENTS],
            present: KindSet::new(),
            groups: GroupSet::new(),
        }
    }

    /// Handle of this entity inside its container
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Debug tag, empty if none was given
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// False once `destroy` was called
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the entity for removal
    ///
    /// The owning container drops it, together with all of its components,
    /// on its next `refresh`.
    pub fn destroy(&mut self) {
        self.active = false;
    }

    /// Number of physically stored components, including removed ones
    /// awaiting compaction
    pub fn component_count(&self) -> usize {
        self.entries.len()
    }

    /// Attach a behavioral component and run its `initialize` hook
    ///
    /// If a component of kind `T` is already present, `component` is dropped
    /// and the existing instance is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`EcsError::CapacityExceeded`] if `T` would exceed the kind limit
    /// - [`EcsError::Hook`] if `initialize` fails; the component is detached
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<&mut T, EcsError> {
        let kind = self.kinds.kind_of::<T>()?;
        if !self.present.contains(kind) {
            let index = self.attach(
                kind,
                any::type_name::<T>(),
                Stored::Behavior(Some(Box::new(component))),
            );
            if let Err(failure) = self.run_hook(index, Phase::Initialize) {
                log::warn!("{}", failure);
                self.detach(index);
                return Err(failure.into());
            }
        }
        self.get_mut::<T>()
    }

    /// Attach a data component
    ///
    /// Same idempotent semantics as [`Entity::add_component`]; data components
    /// have no hooks.
    pub fn add_data<T: 'static>(&mut self, value: T) -> Result<&mut T, EcsError> {
        let kind = self.kinds.kind_of::<T>()?;
        if !self.present.contains(kind) {
            self.attach(kind, any::type_name::<T>(), Stored::Data(Box::new(value)));
        }
        self.get_mut::<T>()
    }

    /// Attach `T::default()` as data unless a `T` is already present
    pub fn ensure_data<T: Default + 'static>(&mut self) -> Result<&mut T, EcsError> {
        if !self.has::<T>() {
            return self.add_data(T::default());
        }
        self.get_mut::<T>()
    }

    /// Check whether a live component of kind `T` is attached
    pub fn has<T: 'static>(&self) -> bool {
        self.kinds
            .lookup::<T>()
            .map_or(false, |kind| self.present.contains(kind))
    }

    /// Borrow the component of kind `T`
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NotFound`] if no live `T` is attached.
    pub fn get<T: 'static>(&self) -> Result<&T, EcsError> {
        self.slot_of::<T>()
            .and_then(|index| self.entries[index].stored.as_any())
            .and_then(|value| value.downcast_ref::<T>())
            .ok_or(EcsError::NotFound(Missing::Component(any::type_name::<T>())))
    }

    /// Mutably borrow the component of kind `T`
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NotFound`] if no live `T` is attached.
    pub fn get_mut<T: 'static>(&mut self) -> Result<&mut T, EcsError> {
        match self.slot_of::<T>() {
            Some(index) => self.entries[index]
                .stored
                .as_any_mut()
                .and_then(|value| value.downcast_mut::<T>())
                .ok_or(EcsError::NotFound(Missing::Component(any::type_name::<T>()))),
            None => Err(EcsError::NotFound(Missing::Component(any::type_name::<T>()))),
        }
    }

    /// Flag the component of kind `T` for removal
    ///
    /// It stops receiving hooks immediately and is dropped at the start of the
    /// next `update`. Returns false if no `T` was attached.
    pub fn remove<T: 'static>(&mut self) -> bool {
        match self.slot_of::<T>() {
            Some(index) => {
                self.detach(index);
                true
            }
            None => false,
        }
    }

    /// Join a group and get indexed by the owning container
    pub fn add_group(&mut self, group: GroupId) {
        if !self.groups.insert(group) {
            return;
        }
        if let Some(index) = self.group_index.upgrade() {
            index.borrow_mut().push(group, self.id);
        }
    }

    /// Check group membership
    pub fn has_group(&self, group: GroupId) -> bool {
        self.groups.contains(group)
    }

    /// Leave a group; the container drops the entity from the group list on
    /// its next `refresh`
    pub fn delete_group(&mut self, group: GroupId) {
        self.groups.remove(group);
    }

    /// Run `initialize` on every live behavioral component
    pub fn initialize(&mut self) -> DispatchReport {
        self.dispatch(Phase::Initialize)
    }

    /// Drop removed components, then run `update` on the remaining ones
    pub fn update(&mut self) -> DispatchReport {
        self.compact();
        self.dispatch(Phase::Update)
    }

    /// Run `draw_2d` on every live behavioral component
    pub fn draw_2d(&mut self) -> DispatchReport {
        self.dispatch(Phase::Draw2D)
    }

    /// Run `draw_3d` on every live behavioral component
    pub fn draw_3d(&mut self) -> DispatchReport {
        self.dispatch(Phase::Draw3D)
    }

    fn slot_of<T: 'static>(&self) -> Option<usize> {
        let kind = self.kinds.lookup::<T>()?;
        if !self.present.contains(kind) {
            return None;
        }
        self.slots[kind.index()]
    }

    fn attach(&mut self, kind: ComponentKindId, name: &'static str, stored: Stored) -> usize {
        let index = self.entries.len();
        self.entries.push(Entry {
            kind,
            name,
            active: true,
            stored,
        });
        self.slots[kind.index()] = Some(index);
        self.present.insert(kind);
        index
    }

    fn detach(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.active = false;
            if self.slots[entry.kind.index()] == Some(index) {
                self.present.remove(entry.kind);
            }
        }
    }

    fn compact(&mut self) {
        if self.entries.iter().all(|entry| entry.active) {
            return;
        }
        let before = self.entries.len();
        self.entries.retain(|entry| entry.active);
        self.slots = [None; MAX_COMPONENTS];
        for (index, entry) in self.entries.iter().enumerate() {
            self.slots[entry.kind.index()] = Some(index);
        }
        log::trace!(
            "{} dropped {} removed component(s)",
            self.id,
            before - self.entries.len()
        );
    }

    fn dispatch(&mut self, phase: Phase) -> DispatchReport {
        let mut report = DispatchReport::new();
        // Components attached by a hook join from the next pass
        let count = self.entries.len();
        for index in 0..count {
            if let Err(failure) = self.run_hook(index, phase) {
                log::warn!("{}", failure);
                report.push(failure);
            }
        }
        report
    }

    fn run_hook(&mut self, index: usize, phase: Phase) -> Result<(), HookFailure> {
        let Some(entry) = self.entries.get_mut(index) else {
            return Ok(());
        };
        if !entry.active {
            return Ok(());
        }
        let name = entry.name;
        let Stored::Behavior(slot) = &mut entry.stored else {
            return Ok(());
        };
        let Some(mut component) = slot.take() else {
            return Ok(());
        };

        let result = {
            let mut owner = EntityMut { entity: self };
            match phase {
                Phase::Initialize => component.initialize(&mut owner),
                Phase::Update => component.update(&mut owner),
                Phase::Draw2D => component.draw_2d(&mut owner),
                Phase::Draw3D => component.draw_3d(&mut owner),
            }
        };

        if let Some(Entry {
            stored: Stored::Behavior(slot),
            ..
        }) = self.entries.get_mut(index)
        {
            *slot = Some(component);
        }

        result.map_err(|error| HookFailure {
            phase,
            entity: self.id,
            component: name,
            error,
        })
    }
}

impl Drop for Entity {
    fn drop(&mut self) {
        // Dependents are attached after their dependencies, so release them first
        while let Some(entry) = self.entries.pop() {
            drop(entry);
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components: Vec<&str> = self
            .entries
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.name)
            .collect();
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("active", &self.active)
            .field("groups", &self.groups)
            .field("components", &components)
            .finish()
    }
}

/// The owning entity as seen from inside a lifecycle hook
///
/// Exposes everything but the dispatch methods, so a hook can attach, query
/// and remove siblings without re-entering the pass that is running it.
pub struct EntityMut<'a> {
    entity: &'a mut Entity,
}

impl<'a> EntityMut<'a> {
    /// Handle of the owning entity
    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    /// Debug tag of the owning entity
    pub fn tag(&self) -> &str {
        self.entity.tag()
    }

    /// See [`Entity::is_active`]
    pub fn is_active(&self) -> bool {
        self.entity.is_active()
    }

    /// See [`Entity::destroy`]
    pub fn destroy(&mut self) {
        self.entity.destroy();
    }

    /// See [`Entity::add_component`]
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<&mut T, EcsError> {
        self.entity.add_component(component)
    }

    /// See [`Entity::add_data`]
    pub fn add_data<T: 'static>(&mut self, value: T) -> Result<&mut T, EcsError> {
        self.entity.add_data(value)
    }

    /// See [`Entity::ensure_data`]
    pub fn ensure_data<T: Default + 'static>(&mut self) -> Result<&mut T, EcsError> {
        self.entity.ensure_data()
    }

    /// See [`Entity::has`]
    pub fn has<T: 'static>(&self) -> bool {
        self.entity.has::<T>()
    }

    /// See [`Entity::get`]
    pub fn get<T: 'static>(&self) -> Result<&T, EcsError> {
        self.entity.get()
    }

    /// See [`Entity::get_mut`]
    pub fn get_mut<T: 'static>(&mut self) -> Result<&mut T, EcsError> {
        self.entity.get_mut()
    }

    /// See [`Entity::remove`]
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.entity.remove::<T>()
    }

    /// See [`Entity::add_group`]
    pub fn add_group(&mut self, group: GroupId) {
        self.entity.add_group(group);
    }

    /// See [`Entity::has_group`]
    pub fn has_group(&self, group: GroupId) -> bool {
        self.entity.has_group(group)
    }

    /// See [`Entity::delete_group`]
    pub fn delete_group(&mut self, group: GroupId) {
        self.entity.delete_group(group);
    }
}
