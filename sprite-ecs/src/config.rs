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
//! Engine configuration
//!
//! [`EngineConfig`] describes the window the engine opens and how long the
//! demo loop runs. It is plain JSON; every field is optional and falls back
//! to the defaults below.
//!
//! ```json
//! { "title": "my game", "width": 640, "height": 480,
//!   "clear_color": { "r": 0, "g": 0, "b": 0 }, "frame_limit": 600 }
//! ```
//!
//! [`EngineConfig::from_env`] reads the file named by the
//! `SPRITE_ECS_CONFIG` environment variable when it is set.

use std::fmt;
use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::components::{Color, Screen};
use crate::render::Rgba;

/// Environment variable naming a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "SPRITE_ECS_CONFIG";

/// Window and loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Window position in screen coordinates
    pub x: i32,
    /// Window position in screen coordinates
    pub y: i32,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
    /// Color the frame is cleared to
    pub clear_color: Rgba,
    /// Stop after this many ticks; `None` runs until quit
    pub frame_limit: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            title: "sprite-ecs".to_string(),
            x: 0,
            y: 0,
            width: 1080,
            height: 720,
            clear_color: Rgba::CYAN,
            frame_limit: None,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Read and parse a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load the file named by `SPRITE_ECS_CONFIG`, or the defaults if unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                log::debug!("loading configuration from {:?}", path);
                Self::from_file(PathBuf::from(path))
            }
            None => Ok(Self::default()),
        }
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Parse)
    }

    /// `Screen` data component for the engine entity
    pub fn screen(&self) -> Screen {
        Screen {
            title: self.title.clone(),
            position: IVec2::new(self.x, self.y),
            size: IVec2::new(
                i32::try_from(self.width).unwrap_or(i32::MAX),
                i32::try_from(self.height).unwrap_or(i32::MAX),
            ),
        }
    }

    /// `Color` data component for the engine entity
    pub fn clear_color(&self) -> Color {
        Color(self.clear_color)
    }
}

/// Failure to load a configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io {
        /// File that was requested
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
    /// The content is not a valid configuration
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(err) => write!(f, "invalid config: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
        }
    }
}
