use std::cell::RefCell;
use std::rc::Rc;

use super::{RenderBackend, RenderError, RenderSurface, SurfaceError};
use crate::context::SceneContext;
use crate::core::Viewport;

/// Counters a [`NullBackend`] keeps across every surface it created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullStats {
    pub surfaces_created: usize,
    pub live_surfaces: usize,
    pub uploads: usize,
    pub frames: usize,
    pub resizes: usize,
    pub releases: usize,
    /// Resources held by live surfaces
    pub resources: usize,
}

/// Backend that draws nothing and only counts resources
#[derive(Debug, Clone, Default)]
pub struct NullBackend {
    stats: Rc<RefCell<NullStats>>,
    fail: bool,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose surface creation always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn stats(&self) -> NullStats {
        *self.stats.borrow()
    }
}

impl RenderBackend for NullBackend {
    type Surface = NullSurface;

    fn create_surface(&mut self, viewport: Viewport) -> Result<NullSurface, SurfaceError> {
        if self.fail {
            return Err(SurfaceError::Unavailable("null backend set to fail".into()));
        }
        if viewport.is_empty() {
            return Err(SurfaceError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let mut stats = self.stats.borrow_mut();
        stats.surfaces_created += 1;
        stats.live_surfaces += 1;
        Ok(NullSurface {
            stats: Rc::clone(&self.stats),
            viewport,
            resources: 0,
            released: false,
        })
    }
}

#[derive(Debug)]
pub struct NullSurface {
    stats: Rc<RefCell<NullStats>>,
    viewport: Viewport,
    resources: usize,
    released: bool,
}

impl NullSurface {
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl RenderSurface for NullSurface {
    fn upload(&mut self, ctx: &SceneContext) -> Result<(), RenderError> {
        // One mesh per object, one texture per kind, one buffer per particle system
        let count = ctx.graph.object_count() + ctx.textures.iter().count() + ctx.particles.systems().len();
        let mut stats = self.stats.borrow_mut();
        stats.uploads += 1;
        stats.resources = stats.resources - self.resources + count;
        self.resources = count;
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.stats.borrow_mut().resizes += 1;
    }

    fn render(&mut self, _ctx: &SceneContext) -> Result<(), RenderError> {
        self.stats.borrow_mut().frames += 1;
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let mut stats = self.stats.borrow_mut();
        stats.live_surfaces -= 1;
        stats.releases += 1;
        stats.resources -= self.resources;
        self.resources = 0;
    }

    fn resource_count(&self) -> usize {
        self.resources
    }
}

impl Drop for NullSurface {
    fn drop(&mut self) {
        self.release();
    }
}
