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
//! Entity groups
//!
//! Groups partition the entities of one container for ordered rendering
//! passes. An entity records its memberships in a [`GroupSet`]; the container
//! keeps a [`GroupIndex`] of member handles per group that is filtered once
//! per frame during `refresh`.

use std::fmt;

use crate::ecs::{Capacity, EcsError, EntityId};

/// Maximum number of groups per container
pub const MAX_GROUPS: usize = 32;

/// Identifier of a rendering or logical group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u8);

impl GroupId {
    /// The group holding the engine entity (window, renderer, textures)
    pub const ENGINE: GroupId = GroupId(0);

    /// Create a group id
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] if `index >= MAX_GROUPS`.
    pub fn new(index: usize) -> Result<Self, EcsError> {
        if index >= MAX_GROUPS {
            return Err(EcsError::CapacityExceeded {
                what: Capacity::Groups,
                limit: MAX_GROUPS,
            });
        }
        Ok(GroupId(index as u8))
    }

    /// Position of this group in per-group arrays
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every valid group id in ascending order
    pub fn all() -> impl Iterator<Item = GroupId> {
        (0..MAX_GROUPS as u8).map(GroupId)
    }

    fn bit(self) -> u32 {
        1u32 << self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

/// Fixed-size set of group memberships
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GroupSet(u32);

impl GroupSet {
    /// Create an empty set
    pub fn new() -> Self {
        GroupSet(0)
    }

    /// Add a group, returning false if it was already present
    pub fn insert(&mut self, group: GroupId) -> bool {
        let added = !self.contains(group);
        self.0 |= group.bit();
        added
    }

    /// Remove a group
    pub fn remove(&mut self, group: GroupId) {
        self.0 &= !group.bit();
    }

    /// Check membership
    pub fn contains(&self, group: GroupId) -> bool {
        self.0 & group.bit() != 0
    }

    /// True if the set has no members
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Per-group member lists of one container
///
/// Holds entity handles only; the container owns the entities.
#[derive(Debug)]
pub(crate) struct GroupIndex {
    lists: [Vec<EntityId>; MAX_GROUPS],
}

impl GroupIndex {
    pub(crate) fn new() -> Self {
        GroupIndex {
            lists: std::array::from_fn(|_| Vec::new()),
        }
    }

    pub(crate) fn push(&mut self, group: GroupId, entity: EntityId) {
        let list = &mut self.lists[group.index()];
        if !list.contains(&entity) {
            list.push(entity);
        }
    }

    pub(crate) fn members(&self, group: GroupId) -> &[EntityId] {
        &self.lists[group.index()]
    }

    /// Keep only the members for which `keep(group, entity)` holds
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(GroupId, EntityId) -> bool) {
        for (group, list) in GroupId::all().zip(self.lists.iter_mut()) {
            list.retain(|&entity| keep(group, entity));
        }
    }
}
