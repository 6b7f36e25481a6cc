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
//! Component kind identities
//!
//! Every component type attached to an entity gets a dense small integer, its
//! [`ComponentKindId`], the first time it is used. Entities index fixed-size
//! lookup arrays and a 64-bit presence set with it, so the number of distinct
//! kinds is capped at [`MAX_COMPONENTS`].
//!
//! The counter lives in an explicit [`TypeRegistry`] that the host creates once
//! and shares with its containers, rather than in a hidden global. Tests can
//! create as many isolated registries as they like.

use std::any::{self, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::ecs::{Capacity, EcsError};

/// Maximum number of distinct component kinds per registry
pub const MAX_COMPONENTS: usize = 64;

/// Dense identifier of a component kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKindId(u8);

impl ComponentKindId {
    /// Position of this kind in fixed-size per-kind arrays
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn bit(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for ComponentKindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kind({})", self.0)
    }
}

/// Fixed-size set of component kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KindSet(u64);

impl KindSet {
    /// Create an empty set
    pub fn new() -> Self {
        KindSet(0)
    }

    /// Add a kind
    pub fn insert(&mut self, kind: ComponentKindId) {
        self.0 |= kind.bit();
    }

    /// Remove a kind
    pub fn remove(&mut self, kind: ComponentKindId) {
        self.0 &= !kind.bit();
    }

    /// Check membership
    pub fn contains(&self, kind: ComponentKindId) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Number of kinds in the set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no kind is present
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[derive(Default)]
struct Kinds {
    ids: HashMap<TypeId, ComponentKindId>,
    names: Vec<&'static str>,
}

/// Assigns component kind ids on first use
///
/// Ids are handed out from a monotonically increasing counter, are never
/// reused and stay stable for the registry's lifetime. Single-threaded by
/// construction: share it with `Rc`.
#[derive(Default)]
pub struct TypeRegistry {
    kinds: RefCell<Kinds>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the kind id of `T`, assigning the next one on first use
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] when `T` would be the
    /// `MAX_COMPONENTS + 1`-th distinct kind. Nothing is registered then.
    pub fn kind_of<T: 'static>(&self) -> Result<ComponentKindId, EcsError> {
        let type_id = TypeId::of::<T>();
        if let Some(kind) = self.kinds.borrow().ids.get(&type_id) {
            return Ok(*kind);
        }

        let mut kinds = self.kinds.borrow_mut();
        let next = kinds.names.len();
        if next >= MAX_COMPONENTS {
            return Err(EcsError::CapacityExceeded {
                what: Capacity::ComponentKinds,
                limit: MAX_COMPONENTS,
            });
        }

        let kind = ComponentKindId(next as u8);
        kinds.ids.insert(type_id, kind);
        kinds.names.push(any::type_name::<T>());
        log::trace!("registered component kind {} as {}", any::type_name::<T>(), kind);
        Ok(kind)
    }

    /// Get the kind id of `T` without registering it
    pub fn lookup<T: 'static>(&self) -> Option<ComponentKindId> {
        self.kinds.borrow().ids.get(&TypeId::of::<T>()).copied()
    }

    /// Check whether `T` already has a kind id
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.lookup::<T>().is_some()
    }

    /// Type name recorded for a kind
    pub fn name_of(&self, kind: ComponentKindId) -> Option<&'static str> {
        self.kinds.borrow().names.get(kind.index()).copied()
    }

    /// Number of kinds registered so far
    pub fn len(&self) -> usize {
        self.kinds.borrow().names.len()
    }

    /// True if no kind has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("kinds", &self.kinds.borrow().names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;

    #[test]
    fn test_kind_ids_are_stable_and_distinct() {
        let registry = TypeRegistry::new();
        let alpha = registry.kind_of::<Alpha>().unwrap();
        let beta = registry.kind_of::<Beta>().unwrap();

        assert_ne!(alpha, beta);
        assert_eq!(registry.kind_of::<Alpha>().unwrap(), alpha);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.name_of(beta), Some(any::type_name::<Beta>()));
    }

    #[test]
    fn test_lookup_does_not_register() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.lookup::<Alpha>(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registries_are_isolated() {
        let first = TypeRegistry::new();
        let second = TypeRegistry::new();
        first.kind_of::<Alpha>().unwrap();

        assert_eq!(second.kind_of::<Beta>().unwrap().index(), 0);
        assert!(!second.is_registered::<Alpha>());
    }

    #[test]
    fn test_kind_set() {
        let registry = TypeRegistry::new();
        let alpha = registry.kind_of::<Alpha>().unwrap();
        let beta = registry.kind_of::<Beta>().unwrap();

        let mut set = KindSet::new();
        set.insert(alpha);
        assert!(set.contains(alpha));
        assert!(!set.contains(beta));
        set.insert(beta);
        set.remove(alpha);
        assert_eq!(set.len(), 1);
        assert!(set.contains(beta));
    }
}
