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
//! Named container registry
//!
//! The [`ContainerRegistry`] is the top-level frame driver: it owns every
//! [`EntityContainer`] under a unique name and ticks them in registration
//! order. Hosts conventionally register the `"engine"` container (window,
//! renderer, input) last so that it presents the frame after every game
//! container has drawn.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::ecs::{DispatchReport, EcsError, EntityContainer, Missing};

/// Owner of all named entity containers
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    containers: HashMap<String, EntityContainer>,
    order: Vec<String>,
}

impl ContainerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container under `name`
    ///
    /// Registering under an existing name drops the previous container and
    /// moves the name to the end of the tick order.
    ///
    /// Register the container holding the `Renderer` last. It presents and
    /// clears during its own `draw_3d`, so anything drawn by containers ticked
    /// after it reaches the screen one frame late.
    pub fn register(&mut self, name: impl Into<String>, container: EntityContainer) {
        let name = name.into();
        if self.containers.remove(&name).is_some() {
            log::debug!("replacing container {name:?}");
            self.order.retain(|existing| *existing != name);
        }
        self.order.push(name.clone());
        self.containers.insert(name, container);
    }

    /// Remove and drop a container; returns false if the name was unknown
    pub fn remove(&mut self, name: &str) -> bool {
        if self.containers.remove(name).is_none() {
            return false;
        }
        self.order.retain(|existing| existing != name);
        true
    }

    /// Borrow a container by name
    pub fn get(&self, name: &str) -> Result<&EntityContainer, EcsError> {
        self.containers
            .get(name)
            .ok_or_else(|| EcsError::NotFound(Missing::Container(name.to_string())))
    }

    /// Borrow a container by name, mutably
    pub fn get_mut(&mut self, name: &str) -> Result<&mut EntityContainer, EcsError> {
        self.containers
            .get_mut(name)
            .ok_or_else(|| EcsError::NotFound(Missing::Container(name.to_string())))
    }

    /// Check whether a container is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.containers.contains_key(name)
    }

    /// Registered names in tick order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered containers
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if no container is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Initialize every container that has not been initialized yet
    pub fn initialize_all(&mut self) -> DispatchReport {
        let mut report = DispatchReport::new();
        for name in &self.order {
            let Some(container) = self.containers.get_mut(name) else {
                continue;
            };
            if container.is_initialized() {
                continue;
            }
            log::debug!("initializing container {name:?}");
            if let Ok(initialized) = container.initialize() {
                report.merge(initialized);
            }
        }
        report
    }

    /// Run one frame
    ///
    /// Every container, in registration order, is refreshed, updated, then
    /// drawn in 2D and 3D before the next container starts.
    pub fn tick(&mut self) -> DispatchReport {
        let mut report = DispatchReport::new();
        for name in &self.order {
            let Some(container) = self.containers.get_mut(name) else {
                continue;
            };
            container.refresh();
            report.merge(container.update());
            report.merge(container.draw_2d());
            report.merge(container.draw_3d());
        }
        if !report.is_ok() {
            log::warn!("frame finished with {} hook failures", report.len());
        }
        report
    }
}

impl Drop for ContainerRegistry {
    fn drop(&mut self) {
        while let Some(name) = self.order.pop() {
            if let Some(container) = self.containers.remove(&name) {
                log::trace!("dropping container {name:?}");
                drop(container);
            }
        }
    }
}

thread_local! {
    static GLOBAL: RefCell<ContainerRegistry> = RefCell::new(ContainerRegistry::new());
}

/// Run `f` with the thread's process-wide registry
///
/// Hosts that prefer a single well-known registry over passing one around
/// can use this. The registry lives until the thread exits.
///
/// # Panics
///
/// Panics if called re-entrantly from inside `f`.
pub fn with_global<R>(f: impl FnOnce(&mut ContainerRegistry) -> R) -> R {
    GLOBAL.with(|registry| f(&mut registry.borrow_mut()))
}
