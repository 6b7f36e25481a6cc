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
//! Error types for the ECS core
//!
//! Every recoverable failure in the core is an [`EcsError`]. Lifecycle hook
//! failures are wrapped in a [`HookFailure`] that remembers which entity,
//! component and phase produced them, and a whole dispatch pass collects them
//! into a [`DispatchReport`] instead of stopping at the first one.

use std::fmt;

use crate::ecs::EntityId;
use crate::render::BackendError;

/// A bounded identifier space that can run out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capacity {
    /// Distinct component kinds known to a [`TypeRegistry`](crate::ecs::TypeRegistry)
    ComponentKinds,
    /// Group identifiers
    Groups,
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::ComponentKinds => write!(f, "component kinds"),
            Capacity::Groups => write!(f, "groups"),
        }
    }
}

/// What a failed lookup was looking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// A component kind, by type name
    Component(&'static str),
    /// A container registered under this name
    Container(String),
    /// An entity handle (possibly stale)
    Entity(EntityId),
    /// An entity carrying this debug tag
    Tag(String),
    /// A texture registered under this name
    Texture(String),
    /// The render target has not been created yet
    Window,
    /// The renderer has not been created yet
    Renderer,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Component(name) => write!(f, "component `{}`", name),
            Missing::Container(name) => write!(f, "container \"{}\"", name),
            Missing::Entity(id) => write!(f, "{}", id),
            Missing::Tag(tag) => write!(f, "entity tagged \"{}\"", tag),
            Missing::Texture(name) => write!(f, "texture \"{}\"", name),
            Missing::Window => write!(f, "window"),
            Missing::Renderer => write!(f, "renderer"),
        }
    }
}

/// Lifecycle phase a hook was running in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// `Component::initialize`
    Initialize,
    /// `Component::update`
    Update,
    /// `Component::draw_2d`
    Draw2D,
    /// `Component::draw_3d`
    Draw3D,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initialize => "initialize",
            Phase::Update => "update",
            Phase::Draw2D => "draw_2d",
            Phase::Draw3D => "draw_3d",
        };
        f.write_str(name)
    }
}

/// Errors produced by the ECS core and its components
#[derive(Debug, Clone, PartialEq)]
pub enum EcsError {
    /// A component, container, entity, tag or resource is not present
    NotFound(Missing),
    /// A fixed-size identifier space is exhausted
    CapacityExceeded {
        /// Which space ran out
        what: Capacity,
        /// Its fixed maximum
        limit: usize,
    },
    /// A one-shot lifecycle step was requested twice
    AlreadyInitialized(String),
    /// The rendering collaborator reported a failure
    Backend(BackendError),
    /// A lifecycle hook failed
    Hook(Box<HookFailure>),
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::NotFound(missing) => write!(f, "{} not found", missing),
            EcsError::CapacityExceeded { what, limit } => {
                write!(f, "capacity exceeded: at most {} {} are supported", limit, what)
            }
            EcsError::AlreadyInitialized(what) => write!(f, "{} is already initialized", what),
            EcsError::Backend(err) => write!(f, "{}", err),
            EcsError::Hook(failure) => write!(f, "{}", failure),
        }
    }
}

impl std::error::Error for EcsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EcsError::Backend(err) => Some(err),
            EcsError::Hook(failure) => Some(&failure.error),
            _ => None,
        }
    }
}

impl From<BackendError> for EcsError {
    fn from(err: BackendError) -> Self {
        EcsError::Backend(err)
    }
}

impl From<HookFailure> for EcsError {
    fn from(failure: HookFailure) -> Self {
        EcsError::Hook(Box::new(failure))
    }
}

/// A lifecycle hook that returned an error
#[derive(Debug, Clone, PartialEq)]
pub struct HookFailure {
    /// Phase the hook was running in
    pub phase: Phase,
    /// Entity owning the component
    pub entity: EntityId,
    /// Type name of the component
    pub component: &'static str,
    /// The error the hook returned
    pub error: EcsError,
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of `{}` on {} failed: {}",
            self.phase, self.component, self.entity, self.error
        )
    }
}

/// Hook failures collected over one dispatch pass
///
/// A failing hook never stops its siblings, so a pass always runs to the end
/// and hands back everything that went wrong.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DispatchReport {
    failures: Vec<HookFailure>,
}

impl DispatchReport {
    /// Create an empty report
    pub fn new() -> Self {
        DispatchReport { failures: Vec::new() }
    }

    /// Record one failure
    pub fn push(&mut self, failure: HookFailure) {
        self.failures.push(failure);
    }

    /// Append every failure of another report
    pub fn merge(&mut self, other: DispatchReport) {
        self.failures.extend(other.failures);
    }

    /// True if no hook failed
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of failed hooks
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// True if the report holds no failures
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// The recorded failures in dispatch order
    pub fn failures(&self) -> &[HookFailure] {
        &self.failures
    }

    /// Turn the report into a `Result`, keeping the first failure
    pub fn into_result(self) -> Result<(), EcsError> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        }
    }
}

impl IntoIterator for DispatchReport {
    type Item = HookFailure;
    type IntoIter = std::vec::IntoIter<HookFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}
