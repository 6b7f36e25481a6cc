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
//! Named texture handles

use std::collections::HashMap;

use crate::ecs::{EcsError, Missing};
use crate::render::TextureHandle;

/// Map from texture name to loaded handle
///
/// The registry only stores handles; the component that loaded a texture
/// stays responsible for destroying it.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: HashMap<String, TextureHandle>,
}

impl TextureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle under `name`, returning the handle it replaced
    pub fn register(&mut self, name: impl Into<String>, texture: TextureHandle) -> Option<TextureHandle> {
        self.textures.insert(name.into(), texture)
    }

    /// Look up a handle by name
    pub fn get(&self, name: &str) -> Result<TextureHandle, EcsError> {
        self.textures
            .get(name)
            .copied()
            .ok_or_else(|| EcsError::NotFound(Missing::Texture(name.to_string())))
    }

    /// Unregister a name; unknown names are ignored
    pub fn remove(&mut self, name: &str) -> Option<TextureHandle> {
        self.textures.remove(name)
    }

    /// Check whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    /// Number of registered textures
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Registered names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }
}
