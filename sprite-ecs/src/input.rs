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
//! Keyboard and quit input
//!
//! The host polls an [`Input`] once per tick, after the registry has ticked,
//! and stops its loop when [`Input::quit_requested`] turns true.

use std::collections::HashSet;

use crate::render::RenderContext;

/// Keys the engine reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
}

/// A single input event delivered by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The user asked to close the application
    Quit,
    /// A key was pressed
    KeyDown(Key),
    /// A key was released
    KeyUp(Key),
}

/// Accumulated input state
#[derive(Debug, Default)]
pub struct Input {
    quit: bool,
    down: HashSet<Key>,
}

impl Input {
    /// Create an input state with nothing pressed
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the backend's pending events; returns how many were applied
    pub fn poll(&mut self, ctx: &RenderContext) -> usize {
        let events = ctx.with_backend(|backend| backend.poll_events());
        for event in &events {
            self.apply(*event);
        }
        events.len()
    }

    /// Fold one event into the state
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => {
                log::debug!("quit requested");
                self.quit = true;
            }
            InputEvent::KeyDown(key) => {
                self.down.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.down.remove(&key);
            }
        }
    }

    /// True once a quit event has been seen
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// True while `key` is held
    pub fn is_key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }
}
