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
//! Recording backend without a display
//!
//! [`HeadlessBackend`] implements [`Backend`] by appending a [`DrawCommand`]
//! to a shared [`CommandLog`] for every successful call. It tracks which
//! handles are alive so that drawing to a destroyed renderer or copying an
//! unknown texture fails the same way a native backend would.
//!
//! ```rust
//! use sprite_ecs::render::headless::{DrawCommand, HeadlessBackend};
//! use sprite_ecs::render::{Backend, Rect, WindowSpec};
//! use glam::IVec2;
//!
//! let mut backend = HeadlessBackend::new();
//! let log = backend.log();
//! let spec = WindowSpec { title: "demo".into(), position: IVec2::ZERO, size: IVec2::new(64, 64) };
//! let window = backend.create_window(&spec).unwrap();
//! let renderer = backend.create_renderer(window).unwrap();
//! backend.fill_rect(renderer, Rect::new(0, 0, 8, 8)).unwrap();
//!
//! assert_eq!(log.count(|cmd| matches!(cmd, DrawCommand::FillRect { .. })), 1);
//! ```

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::IVec2;

use crate::input::InputEvent;
use crate::render::{
    Backend, BackendError, Rect, RendererHandle, Rgba, TextureHandle, WindowHandle, WindowSpec,
};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// A window was opened
    CreateWindow {
        /// Handle handed out
        window: WindowHandle,
        /// Requested parameters
        spec: WindowSpec,
    },
    /// A window was closed
    DestroyWindow(WindowHandle),
    /// A renderer was created
    CreateRenderer {
        /// Handle handed out
        renderer: RendererHandle,
        /// Target window
        window: WindowHandle,
    },
    /// A renderer was released
    DestroyRenderer(RendererHandle),
    /// The draw color changed
    SetDrawColor {
        /// Target renderer
        renderer: RendererHandle,
        /// New color
        color: Rgba,
    },
    /// The target was cleared
    Clear(RendererHandle),
    /// The frame was presented
    Present(RendererHandle),
    /// A filled rectangle
    FillRect {
        /// Target renderer
        renderer: RendererHandle,
        /// Rectangle drawn
        rect: Rect,
    },
    /// A rectangle outline
    DrawRect {
        /// Target renderer
        renderer: RendererHandle,
        /// Rectangle drawn
        rect: Rect,
    },
    /// A line segment
    DrawLine {
        /// Target renderer
        renderer: RendererHandle,
        /// Start point
        from: IVec2,
        /// End point
        to: IVec2,
    },
    /// A single pixel
    DrawPoint {
        /// Target renderer
        renderer: RendererHandle,
        /// Pixel position
        at: IVec2,
    },
    /// A texture was loaded
    LoadTexture {
        /// Handle handed out
        texture: TextureHandle,
        /// Source file
        path: PathBuf,
        /// Transparent color, if any
        color_key: Option<Rgba>,
    },
    /// A texture was released
    DestroyTexture(TextureHandle),
    /// A texture region was copied onto the target
    CopyTexture {
        /// Target renderer
        renderer: RendererHandle,
        /// Source texture
        texture: TextureHandle,
        /// Region read from the texture
        src: Rect,
        /// Region written on the target
        dst: Rect,
    },
}

/// Shared, cloneable list of recorded commands
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Rc<RefCell<Vec<DrawCommand>>>,
}

impl CommandLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, command: DrawCommand) {
        self.commands.borrow_mut().push(command);
    }

    /// Copy of every command recorded so far
    pub fn snapshot(&self) -> Vec<DrawCommand> {
        self.commands.borrow().clone()
    }

    /// Number of recorded commands
    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    /// Forget every recorded command
    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    /// Count the commands matching `predicate`
    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.borrow().iter().filter(|cmd| predicate(cmd)).count()
    }
}

/// Shared queue of input events the backend hands out on `poll_events`
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<InputEvent>>>,
}

impl EventQueue {
    /// Queue an event for the next poll
    pub fn push(&self, event: InputEvent) {
        self.events.borrow_mut().push_back(event);
    }

    fn drain(&self) -> Vec<InputEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

/// Backend that records calls instead of drawing
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    log: CommandLog,
    events: EventQueue,
    next_handle: u32,
    windows: HashSet<WindowHandle>,
    renderers: HashSet<RendererHandle>,
    textures: HashSet<TextureHandle>,
    fail_window: bool,
    fail_renderer: bool,
    fail_textures: bool,
    fail_draws: bool,
}

impl HeadlessBackend {
    /// Create a backend with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `create_window` call fail
    pub fn failing_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    /// Make every `create_renderer` call fail
    pub fn failing_renderer(mut self) -> Self {
        self.fail_renderer = true;
        self
    }

    /// Make every `load_texture` call fail
    pub fn failing_textures(mut self) -> Self {
        self.fail_textures = true;
        self
    }

    /// Make every draw call on a live renderer fail
    pub fn failing_draws(mut self) -> Self {
        self.fail_draws = true;
        self
    }

    /// Handle to the command log; stays valid after the backend is moved
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    /// Handle to the input queue; stays valid after the backend is moved
    pub fn events(&self) -> EventQueue {
        self.events.clone()
    }

    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn live_renderer(&self, renderer: RendererHandle) -> Result<(), BackendError> {
        if self.renderers.contains(&renderer) {
            Ok(())
        } else {
            Err(BackendError::new(format!("invalid renderer {}", renderer.0)))
        }
    }

    fn record_draw(
        &mut self,
        renderer: RendererHandle,
        command: DrawCommand,
    ) -> Result<(), BackendError> {
        self.live_renderer(renderer)?;
        if self.fail_draws {
            return Err(BackendError::new("draw refused"));
        }
        self.log.push(command);
        Ok(())
    }
}

impl Backend for HeadlessBackend {
    fn create_window(&mut self, spec: &WindowSpec) -> Result<WindowHandle, BackendError> {
        if self.fail_window {
            return Err(BackendError::new("window creation refused"));
        }
        let window = WindowHandle(self.next());
        self.windows.insert(window);
        self.log.push(DrawCommand::CreateWindow {
            window,
            spec: spec.clone(),
        });
        Ok(window)
    }

    fn destroy_window(&mut self, window: WindowHandle) {
        if self.windows.remove(&window) {
            self.log.push(DrawCommand::DestroyWindow(window));
        }
    }

    fn create_renderer(&mut self, window: WindowHandle) -> Result<RendererHandle, BackendError> {
        if self.fail_renderer {
            return Err(BackendError::new("renderer creation refused"));
        }
        if !self.windows.contains(&window) {
            return Err(BackendError::new(format!("invalid window {}", window.0)));
        }
        let renderer = RendererHandle(self.next());
        self.renderers.insert(renderer);
        self.log.push(DrawCommand::CreateRenderer { renderer, window });
        Ok(renderer)
    }

    fn destroy_renderer(&mut self, renderer: RendererHandle) {
        if self.renderers.remove(&renderer) {
            self.log.push(DrawCommand::DestroyRenderer(renderer));
        }
    }

    fn set_draw_color(&mut self, renderer: RendererHandle, color: Rgba) -> Result<(), BackendError> {
        self.record_draw(renderer, DrawCommand::SetDrawColor { renderer, color })
    }

    fn clear(&mut self, renderer: RendererHandle) -> Result<(), BackendError> {
        self.record_draw(renderer, DrawCommand::Clear(renderer))
    }

    fn present(&mut self, renderer: RendererHandle) -> Result<(), BackendError> {
        self.record_draw(renderer, DrawCommand::Present(renderer))
    }

    fn fill_rect(&mut self, renderer: RendererHandle, rect: Rect) -> Result<(), BackendError> {
        self.record_draw(renderer, DrawCommand::FillRect { renderer, rect })
    }

    fn draw_rect(&mut self, renderer: RendererHandle, rect: Rect) -> Result<(), BackendError> {
        self.record_draw(renderer, DrawCommand::DrawRect { renderer, rect })
    }

    fn draw_line(
        &mut self,
        renderer: RendererHandle,
        from: IVec2,
        to: IVec2,
    ) -> Result<(), BackendError> {
        self.record_draw(renderer, DrawCommand::DrawLine { renderer, from, to })
    }

    fn draw_point(&mut self, renderer: RendererHandle, at: IVec2) -> Result<(), BackendError> {
        self.record_draw(renderer, DrawCommand::DrawPoint { renderer, at })
    }

    fn load_texture(
        &mut self,
        renderer: RendererHandle,
        path: &Path,
        color_key: Option<Rgba>,
    ) -> Result<TextureHandle, BackendError> {
        self.live_renderer(renderer)?;
        if self.fail_textures {
            return Err(BackendError::new(format!(
                "cannot load texture {}",
                path.display()
            )));
        }
        let texture = TextureHandle(self.next());
        self.textures.insert(texture);
        self.log.push(DrawCommand::LoadTexture {
            texture,
            path: path.to_path_buf(),
            color_key,
        });
        Ok(texture)
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture) {
            self.log.push(DrawCommand::DestroyTexture(texture));
        }
    }

    fn copy_texture(
        &mut self,
        renderer: RendererHandle,
        texture: TextureHandle,
        src: Rect,
        dst: Rect,
    ) -> Result<(), BackendError> {
        if !self.textures.contains(&texture) {
            return Err(BackendError::new(format!("invalid texture {}", texture.0)));
        }
        self.record_draw(
            renderer,
            DrawCommand::CopyTexture {
                renderer,
                texture,
                src,
                dst,
            },
        )
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.events.drain()
    }
}
