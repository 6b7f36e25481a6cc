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
//! Rendering collaborator contract
//!
//! The engine never talks to a windowing library directly. Components that
//! create windows, clear frames or draw go through the [`Backend`] trait,
//! reached via a shared [`RenderContext`] that is cloned into every
//! component needing it.
//!
//! # Backends
//!
//! - [`headless::HeadlessBackend`]: records every call; used by tests,
//!   benchmarks and the demos (feature `headless`, enabled by default)
//!
//! A native backend implements the same trait and is handed to
//! [`RenderContext::new`].

#[cfg(feature = "headless")]
pub mod headless;
mod texture;

pub use texture::TextureRegistry;

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::ecs::{EcsError, Missing};
use crate::input::InputEvent;

/// Integer screen rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Top-left corner
    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// True if the two rectangles overlap with a non-empty area
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    0xFF
}

impl Rgba {
    /// Opaque white
    pub const WHITE: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0xFF);
    /// Opaque black
    pub const BLACK: Rgba = Rgba::new(0x00, 0x00, 0x00, 0xFF);
    /// Opaque cyan, the default window clear color
    pub const CYAN: Rgba = Rgba::new(0x00, 0xFF, 0xFF, 0xFF);

    /// Create a color from all four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba::new(r, g, b, 0xFF)
    }
}

/// Opaque handle to a backend window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u32);

/// Opaque handle to a backend renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererHandle(pub u32);

/// Opaque handle to a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Parameters for window creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    /// Window title
    pub title: String,
    /// Screen position of the window
    pub position: IVec2,
    /// Client area size in pixels
    pub size: IVec2,
}

/// Failure reported by a rendering backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Create an error with a human-readable message
    pub fn new(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
        }
    }

    /// The backend's message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backend error: {}", self.message)
    }
}

impl std::error::Error for BackendError {}

/// Windowing, drawing and input collaborator
///
/// Every call names the resource it acts on; a backend rejects handles it
/// did not hand out (or already destroyed) with a [`BackendError`].
/// `destroy_*` calls are infallible and must tolerate unknown handles.
pub trait Backend {
    /// Open a window
    fn create_window(&mut self, spec: &WindowSpec) -> Result<WindowHandle, BackendError>;
    /// Close a window
    fn destroy_window(&mut self, window: WindowHandle);
    /// Create a renderer drawing into `window`
    fn create_renderer(&mut self, window: WindowHandle) -> Result<RendererHandle, BackendError>;
    /// Release a renderer
    fn destroy_renderer(&mut self, renderer: RendererHandle);

    /// Set the color used by `clear` and the primitive draws
    fn set_draw_color(&mut self, renderer: RendererHandle, color: Rgba) -> Result<(), BackendError>;
    /// Fill the whole target with the draw color
    fn clear(&mut self, renderer: RendererHandle) -> Result<(), BackendError>;
    /// Show everything drawn since the last present
    fn present(&mut self, renderer: RendererHandle) -> Result<(), BackendError>;
    /// Draw a filled rectangle
    fn fill_rect(&mut self, renderer: RendererHandle, rect: Rect) -> Result<(), BackendError>;
    /// Draw a rectangle outline
    fn draw_rect(&mut self, renderer: RendererHandle, rect: Rect) -> Result<(), BackendError>;
    /// Draw a line segment
    fn draw_line(&mut self, renderer: RendererHandle, from: IVec2, to: IVec2)
        -> Result<(), BackendError>;
    /// Draw a single pixel
    fn draw_point(&mut self, renderer: RendererHandle, at: IVec2) -> Result<(), BackendError>;

    /// Load an image file as a texture for `renderer`
    ///
    /// Pixels matching `color_key`, if given, become transparent.
    fn load_texture(
        &mut self,
        renderer: RendererHandle,
        path: &Path,
        color_key: Option<Rgba>,
    ) -> Result<TextureHandle, BackendError>;
    /// Release a texture
    fn destroy_texture(&mut self, texture: TextureHandle);
    /// Copy the `src` region of a texture onto the `dst` region of the target
    fn copy_texture(
        &mut self,
        renderer: RendererHandle,
        texture: TextureHandle,
        src: Rect,
        dst: Rect,
    ) -> Result<(), BackendError>;

    /// Drain pending input events
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

struct Shared {
    backend: RefCell<Box<dyn Backend>>,
    window: Cell<Option<WindowHandle>>,
    renderer: Cell<Option<RendererHandle>>,
    textures: RefCell<TextureRegistry>,
}

/// Shared access to the backend and the engine's published resources
///
/// Cloning is cheap and every clone refers to the same state. The
/// [`Window`](crate::components::Window) and
/// [`Renderer`](crate::components::Renderer) components publish their
/// handles here; drawing components read them back each frame.
#[derive(Clone)]
pub struct RenderContext {
    shared: Rc<Shared>,
}

impl RenderContext {
    /// Wrap a backend
    pub fn new(backend: impl Backend + 'static) -> Self {
        RenderContext {
            shared: Rc::new(Shared {
                backend: RefCell::new(Box::new(backend)),
                window: Cell::new(None),
                renderer: Cell::new(None),
                textures: RefCell::new(TextureRegistry::new()),
            }),
        }
    }

    /// Run `f` with exclusive access to the backend
    ///
    /// # Panics
    ///
    /// Panics if called from inside another `with_backend` closure.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut dyn Backend) -> R) -> R {
        let mut backend = self.shared.backend.borrow_mut();
        f(&mut **backend)
    }

    /// Like [`with_backend`](Self::with_backend), but returns `None` instead
    /// of panicking when the backend is already borrowed
    pub fn try_with_backend<R>(&self, f: impl FnOnce(&mut dyn Backend) -> R) -> Option<R> {
        let mut backend = self.shared.backend.try_borrow_mut().ok()?;
        Some(f(&mut **backend))
    }

    /// The published window
    pub fn window(&self) -> Result<WindowHandle, EcsError> {
        self.shared
            .window
            .get()
            .ok_or(EcsError::NotFound(Missing::Window))
    }

    /// The published renderer
    pub fn renderer(&self) -> Result<RendererHandle, EcsError> {
        self.shared
            .renderer
            .get()
            .ok_or(EcsError::NotFound(Missing::Renderer))
    }

    /// Publish or retract the window handle
    pub fn set_window(&self, window: Option<WindowHandle>) {
        self.shared.window.set(window);
    }

    /// Publish or retract the renderer handle
    pub fn set_renderer(&self, renderer: Option<RendererHandle>) {
        self.shared.renderer.set(renderer);
    }

    /// Borrow the texture registry
    pub fn textures(&self) -> Ref<'_, TextureRegistry> {
        self.shared.textures.borrow()
    }

    /// Borrow the texture registry mutably
    pub fn textures_mut(&self) -> RefMut<'_, TextureRegistry> {
        self.shared.textures.borrow_mut()
    }

    /// Look up a registered texture by name
    pub fn texture(&self, name: &str) -> Result<TextureHandle, EcsError> {
        self.textures().get(name)
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("window", &self.shared.window.get())
            .field("renderer", &self.shared.renderer.get())
            .field("textures", &self.shared.textures.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(5, 5, 10, 10)));
        assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
        assert!(!a.intersects(&Rect::new(0, 20, 4, 4)));
    }

    #[test]
    fn test_rgba_defaults_alpha() {
        let color: Rgba = serde_json::from_str(r#"{"r": 1, "g": 2, "b": 3}"#).unwrap();
        assert_eq!(color, Rgba::rgb(1, 2, 3));
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::new("no display");
        assert_eq!(err.to_string(), "backend error: no display");
    }
}

#[cfg(all(test, feature = "headless"))]
mod context_tests {
    use super::headless::HeadlessBackend;
    use super::*;

    #[test]
    fn test_unpublished_handles_are_not_found() {
        let ctx = RenderContext::new(HeadlessBackend::new());
        assert_eq!(ctx.window(), Err(EcsError::NotFound(Missing::Window)));
        assert_eq!(ctx.renderer(), Err(EcsError::NotFound(Missing::Renderer)));
        assert!(ctx.texture("player").is_err());
    }

    #[test]
    fn test_try_with_backend_while_borrowed() {
        let ctx = RenderContext::new(HeadlessBackend::new());
        let nested = ctx.with_backend(|_| ctx.try_with_backend(|_| ()));
        assert!(nested.is_none());
        assert!(ctx.try_with_backend(|_| ()).is_some());
    }
}
