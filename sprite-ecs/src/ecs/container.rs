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
//! Entity containers
//!
//! An [`EntityContainer`] owns a collection of entities, keeps per-group
//! member lists for ordered rendering and drives the frame lifecycle of its
//! entities in insertion order.
//!
//! Entity handles are generation-checked: when `refresh` drops a destroyed
//! entity its slot index is recycled with a bumped generation, so old handles
//! stop resolving.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ecs::group::GroupIndex;
use crate::ecs::{
    DispatchReport, EcsError, Entity, EntityId, GroupId, Missing, TypeRegistry, MAX_GROUPS,
};

/// Lifecycle state of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// Built, entities may be added, `initialize` not called yet
    Constructed,
    /// `initialize` has run; the container is ticking
    Initialized,
}

/// A reusable recipe for spawning a pre-configured entity
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use sprite_ecs::components::Position;
/// use sprite_ecs::ecs::{Archetype, EcsError, EntityContainer, EntityId, TypeRegistry};
///
/// struct Marker(f32, f32);
///
/// impl Archetype for Marker {
///     fn spawn(&self, container: &mut EntityContainer) -> Result<EntityId, EcsError> {
///         let entity = container.add_entity_with_tag("marker");
///         entity.add_data(Position::new(self.0, self.1, 0.0))?;
///         Ok(entity.id())
///     }
/// }
///
/// let mut container = EntityContainer::new(Rc::new(TypeRegistry::new()));
/// let id = container.spawn(&Marker(4.0, 2.0)).unwrap();
/// assert!(container.entity(id).unwrap().has::<Position>());
/// ```
pub trait Archetype {
    /// Create the entity inside `container` and return its handle
    fn spawn(&self, container: &mut EntityContainer) -> Result<EntityId, EcsError>;
}

/// Owning collection of entities plus group indices
pub struct EntityContainer {
    kinds: Rc<TypeRegistry>,
    entities: Vec<Entity>,
    positions: HashMap<EntityId, usize>,
    generations: Vec<u32>,
    free_indices: Vec<u64>,
    groups: Rc<RefCell<GroupIndex>>,
    state: ContainerState,
}

impl EntityContainer {
    /// Create an empty container sharing the given kind registry
    pub fn new(kinds: Rc<TypeRegistry>) -> Self {
        EntityContainer {
            kinds,
            entities: Vec::new(),
            positions: HashMap::new(),
            generations: Vec::new(),
            free_indices: Vec::new(),
            groups: Rc::new(RefCell::new(GroupIndex::new())),
            state: ContainerState::Constructed,
        }
    }

    /// Kind registry shared by this container's entities
    pub fn kinds(&self) -> &Rc<TypeRegistry> {
        &self.kinds
    }

    /// Current lifecycle state
    pub fn state(&self) -> ContainerState {
        self.state
    }

    /// True once `initialize` has run
    pub fn is_initialized(&self) -> bool {
        self.state == ContainerState::Initialized
    }

    /// Create an untagged entity
    pub fn add_entity(&mut self) -> &mut Entity {
        self.add_entity_with_tag(String::new())
    }

    /// Create an entity with a debug tag
    pub fn add_entity_with_tag(&mut self, tag: impl Into<String>) -> &mut Entity {
        let id = self.allocate_id();
        let entity = Entity::attached(
            id,
            tag.into(),
            Rc::clone(&self.kinds),
            Rc::downgrade(&self.groups),
        );
        let position = self.entities.len();
        self.entities.push(entity);
        self.positions.insert(id, position);
        &mut self.entities[position]
    }

    /// Spawn an entity from an archetype
    pub fn spawn<A: Archetype + ?Sized>(&mut self, archetype: &A) -> Result<EntityId, EcsError> {
        archetype.spawn(self)
    }

    /// Put an entity into a group
    ///
    /// Equivalent to calling [`Entity::add_group`] on the entity itself.
    pub fn add_to_group(&mut self, id: EntityId, group: GroupId) -> Result<(), EcsError> {
        self.entity_mut(id)?.add_group(group);
        Ok(())
    }

    /// Members of a group in the order they joined
    ///
    /// This is a snapshot: it is only guaranteed to match the container until
    /// the next mutation or `refresh`.
    pub fn entities_by_group(&self, group: GroupId) -> Vec<EntityId> {
        self.groups.borrow().members(group).to_vec()
    }

    /// Look up an entity by handle
    pub fn entity(&self, id: EntityId) -> Result<&Entity, EcsError> {
        self.positions
            .get(&id)
            .map(|&position| &self.entities[position])
            .ok_or(EcsError::NotFound(Missing::Entity(id)))
    }

    /// Look up an entity by handle, mutably
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EcsError> {
        match self.positions.get(&id) {
            Some(&position) => Ok(&mut self.entities[position]),
            None => Err(EcsError::NotFound(Missing::Entity(id))),
        }
    }

    /// First entity carrying `tag`
    pub fn find_by_tag(&self, tag: &str) -> Result<&Entity, EcsError> {
        self.entities
            .iter()
            .find(|entity| entity.tag() == tag)
            .ok_or_else(|| EcsError::NotFound(Missing::Tag(tag.to_string())))
    }

    /// First entity carrying `tag`, mutably
    pub fn find_by_tag_mut(&mut self, tag: &str) -> Result<&mut Entity, EcsError> {
        self.entities
            .iter_mut()
            .find(|entity| entity.tag() == tag)
            .ok_or_else(|| EcsError::NotFound(Missing::Tag(tag.to_string())))
    }

    /// Number of owned entities, including destroyed ones awaiting `refresh`
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if the container owns no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over the owned entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate mutably over the owned entities in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Drop destroyed entities and stale group memberships
    ///
    /// Group lists are filtered first, keeping only entities that are still
    /// owned, still active and still flagged for the group. Then destroyed
    /// entities are dropped with all their components. Must run before
    /// `update` each frame.
    pub fn refresh(&mut self) {
        let entities = &self.entities;
        let positions = &self.positions;
        self.groups.borrow_mut().retain(|group, id| {
            positions
                .get(&id)
                .map_or(false, |&position| {
                    let entity = &entities[position];
                    entity.is_active() && entity.has_group(group)
                })
        });

        if self.entities.iter().all(Entity::is_active) {
            return;
        }

        for entity in self.entities.iter().filter(|entity| !entity.is_active()) {
            let index = entity.id().index();
            if let Some(generation) = self.generations.get_mut(index as usize) {
                *generation = generation.wrapping_add(1);
            }
            self.free_indices.push(index);
        }

        let before = self.entities.len();
        self.entities.retain(Entity::is_active);
        self.positions = self
            .entities
            .iter()
            .enumerate()
            .map(|(position, entity)| (entity.id(), position))
            .collect();
        log::debug!("refresh removed {} entities", before - self.entities.len());
    }

    /// Run `initialize` on every entity
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::AlreadyInitialized`] on a second call; component
    /// `initialize` hooks are not re-run.
    pub fn initialize(&mut self) -> Result<DispatchReport, EcsError> {
        if self.is_initialized() {
            return Err(EcsError::AlreadyInitialized("entity container".to_string()));
        }
        let report = self.dispatch(Entity::initialize);
        self.state = ContainerState::Initialized;
        Ok(report)
    }

    /// Run `update` on every live entity
    pub fn update(&mut self) -> DispatchReport {
        self.dispatch(Entity::update)
    }

    /// Run `draw_2d` on every live entity
    pub fn draw_2d(&mut self) -> DispatchReport {
        self.dispatch(Entity::draw_2d)
    }

    /// Run `draw_3d` on every live entity
    pub fn draw_3d(&mut self) -> DispatchReport {
        self.dispatch(Entity::draw_3d)
    }

    /// Run `draw_2d` group by group for the first `group_count` groups
    ///
    /// Lower groups draw first; within a group, entities draw in the order
    /// they joined. Entities outside those groups are not drawn.
    pub fn draw_2d_ordered(&mut self, group_count: usize) -> DispatchReport {
        let mut report = DispatchReport::new();
        for group in GroupId::all().take(group_count.min(MAX_GROUPS)) {
            for id in self.entities_by_group(group) {
                if let Some(&position) = self.positions.get(&id) {
                    let entity = &mut self.entities[position];
                    if entity.is_active() {
                        report.merge(entity.draw_2d());
                    }
                }
            }
        }
        report
    }

    /// Destroy every entity; they are dropped on the next `refresh`
    pub fn kill_all(&mut self) {
        for entity in &mut self.entities {
            entity.destroy();
        }
    }

    fn dispatch(&mut self, pass: fn(&mut Entity) -> DispatchReport) -> DispatchReport {
        let mut report = DispatchReport::new();
        for entity in self.entities.iter_mut().filter(|entity| entity.is_active()) {
            report.merge(pass(entity));
        }
        report
    }

    fn allocate_id(&mut self) -> EntityId {
        if let Some(index) = self.free_indices.pop() {
            let generation = self.generations.get(index as usize).copied().unwrap_or(0);
            return EntityId::new(index, generation);
        }
        let index = self.generations.len() as u64;
        self.generations.push(0);
        EntityId::new(index, 0)
    }
}

impl std::fmt::Debug for EntityContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityContainer")
            .field("state", &self.state)
            .field("entities", &self.entities)
            .finish()
    }
}
