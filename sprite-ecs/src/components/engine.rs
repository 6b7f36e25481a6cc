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
//! Window, renderer and texture ownership
//!
//! These components live on the engine entity, attached in this order:
//! [`Window`], [`Renderer`], then any [`TextureLoader`]s. Each creates its
//! backend resource once, publishes it on the shared [`RenderContext`] and
//! releases it when dropped. Entities drop components in reverse attachment
//! order, so textures go first and the window goes last.

use std::path::PathBuf;

use crate::components::{Color, Screen};
use crate::ecs::{Component, EcsError, EntityMut, HookResult, Missing};
use crate::render::{RenderContext, RendererHandle, Rgba, TextureHandle, WindowHandle};

/// Render-target provider: opens the window described by the `Screen` sibling
///
/// Ensures `Screen` and `Color` siblings exist; the default clear color is
/// cyan.
#[derive(Debug)]
pub struct Window {
    ctx: RenderContext,
    handle: Option<WindowHandle>,
}

impl Window {
    /// A window that will be opened through `ctx` on initialize
    pub fn new(ctx: RenderContext) -> Self {
        Window { ctx, handle: None }
    }

    /// The open window, if creation succeeded
    pub fn handle(&self) -> Option<WindowHandle> {
        self.handle
    }
}

impl Component for Window {
    fn initialize(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        entity.ensure_data::<Screen>()?;
        entity.add_data(Color(Rgba::CYAN))?;
        if self.handle.is_some() {
            return Ok(());
        }

        let spec = entity.get::<Screen>()?.window_spec();
        let handle = self.ctx.with_backend(|backend| backend.create_window(&spec))?;
        log::debug!("opened window {:?} {:?}", spec.title, handle);
        self.handle = Some(handle);
        self.ctx.set_window(Some(handle));
        Ok(())
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if self.ctx.window() == Ok(handle) {
                self.ctx.set_window(None);
            }
            if self
                .ctx
                .try_with_backend(|backend| backend.destroy_window(handle))
                .is_none()
            {
                log::warn!("backend busy, leaking window {:?}", handle);
            }
        }
    }
}

/// Renderer-handle provider and frame boundary
///
/// Requires a [`Window`] sibling attached before it. Every `draw_3d`
/// presents the finished frame and then clears the target with the sibling
/// `Color`, so hosts register the container owning it last.
#[derive(Debug)]
pub struct Renderer {
    ctx: RenderContext,
    handle: Option<RendererHandle>,
}

impl Renderer {
    /// A renderer that will be created through `ctx` on initialize
    pub fn new(ctx: RenderContext) -> Self {
        Renderer { ctx, handle: None }
    }

    /// The created renderer, if creation succeeded
    pub fn handle(&self) -> Option<RendererHandle> {
        self.handle
    }
}

impl Component for Renderer {
    fn initialize(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        if self.handle.is_some() {
            return Ok(());
        }
        let window = entity
            .get::<Window>()?
            .handle()
            .ok_or(EcsError::NotFound(Missing::Window))?;
        let color = entity.ensure_data::<Color>()?.0;

        let handle = self.ctx.with_backend(|backend| {
            let handle = backend.create_renderer(window)?;
            if let Err(err) = backend.set_draw_color(handle, color) {
                backend.destroy_renderer(handle);
                return Err(EcsError::from(err));
            }
            Ok::<_, EcsError>(handle)
        })?;
        log::debug!("created renderer {:?} for {:?}", handle, window);
        self.handle = Some(handle);
        self.ctx.set_renderer(Some(handle));
        Ok(())
    }

    fn draw_3d(&mut self, entity: &mut EntityMut<'_>) -> HookResult {
        let Some(handle) = self.handle else {
            return Err(EcsError::NotFound(Missing::Renderer));
        };
        let color = entity.get::<Color>()?.0;
        self.ctx.with_backend(|backend| {
            backend.present(handle)?;
            backend.set_draw_color(handle, color)?;
            backend.clear(handle)
        })?;
        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if self.ctx.renderer() == Ok(handle) {
                self.ctx.set_renderer(None);
            }
            if self
                .ctx
                .try_with_backend(|backend| backend.destroy_renderer(handle))
                .is_none()
            {
                log::warn!("backend busy, leaking renderer {:?}", handle);
            }
        }
    }
}

/// Loads an image as a named texture and owns it
///
/// Needs the renderer to be published, so attach it after [`Renderer`].
#[derive(Debug)]
pub struct TextureLoader {
    ctx: RenderContext,
    name: String,
    path: PathBuf,
    color_key: Option<Rgba>,
    handle: Option<TextureHandle>,
}

impl TextureLoader {
    /// Load `path` and register it as `name`
    pub fn new(ctx: RenderContext, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        TextureLoader {
            ctx,
            name: name.into(),
            path: path.into(),
            color_key: None,
            handle: None,
        }
    }

    /// Treat pixels of `color` as transparent
    pub fn with_color_key(mut self, color: Rgba) -> Self {
        self.color_key = Some(color);
        self
    }

    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The loaded texture, if loading succeeded
    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }
}

impl Component for TextureLoader {
    fn initialize(&mut self, _entity: &mut EntityMut<'_>) -> HookResult {
        if self.handle.is_some() {
            return Ok(());
        }
        let renderer = self.ctx.renderer()?;
        let handle = self
            .ctx
            .with_backend(|backend| backend.load_texture(renderer, &self.path, self.color_key))?;
        log::debug!(
            "loaded texture {:?} from {} as {:?}",
            self.name,
            self.path.display(),
            handle
        );
        self.handle = Some(handle);
        if let Some(previous) = self.ctx.textures_mut().register(self.name.clone(), handle) {
            log::warn!("texture {:?} replaced {:?}", self.name, previous);
        }
        Ok(())
    }
}

impl Drop for TextureLoader {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let mut textures = self.ctx.textures_mut();
            if textures.get(&self.name) == Ok(handle) {
                textures.remove(&self.name);
            }
            drop(textures);
            if self
                .ctx
                .try_with_backend(|backend| backend.destroy_texture(handle))
                .is_none()
            {
                log::warn!("backend busy, leaking texture {:?}", handle);
            }
        }
    }
}
