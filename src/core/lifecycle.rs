use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::clock::Clock;
use super::events::{EventBus, HostEvent, ListenerId, PendingInput};
use super::frame::FrameInfo;
use super::viewport::Viewport;
use crate::config::SceneConfig;
use crate::context::SceneContext;
use crate::progress::PhaseTable;
use crate::render::{RenderBackend, RenderError, RenderSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host-side source of frame callbacks
pub trait FrameScheduler {
    /// Ask the host for one more frame callback
    fn schedule(&mut self) -> FrameHandle;
    /// Withdraw a request that has not fired yet
    fn cancel(&mut self, handle: FrameHandle);
    /// Mark a request as delivered
    fn fired(&mut self, handle: FrameHandle);
    /// Requests neither delivered nor cancelled
    fn pending(&self) -> usize;
}

/// Scheduler driven by hand; used by headless runs and tests
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.pending.push(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }

    fn fired(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }

    fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Resources of one started scene
struct Instance<S> {
    ctx: SceneContext,
    surface: S,
    listeners: Vec<ListenerId>,
    input: Rc<RefCell<PendingInput>>,
    frame: Option<FrameHandle>,
    clock: Clock,
}

/// Owns at most one running scene and its frame loop
pub struct SceneLifecycle<B: RenderBackend, S: FrameScheduler> {
    backend: B,
    scheduler: S,
    bus: Rc<EventBus>,
    config: SceneConfig,
    phases: PhaseTable,
    seed: Option<u64>,
    running: Rc<Cell<bool>>,
    init_failed: bool,
    instance: Option<Instance<B::Surface>>,
}

impl<B: RenderBackend, S: FrameScheduler> SceneLifecycle<B, S> {
    pub fn new(backend: B, scheduler: S, bus: Rc<EventBus>, config: SceneConfig) -> Self {
        Self {
            backend,
            scheduler,
            bus,
            config,
            phases: PhaseTable::landing(),
            seed: None,
            running: Rc::new(Cell::new(false)),
            init_failed: false,
            instance: None,
        }
    }

    /// Fixed seed for every instance this lifecycle starts
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Phase windows for every instance this lifecycle starts
    pub fn with_phases(mut self, phases: PhaseTable) -> Self {
        self.phases = phases;
        self
    }

    /// Build a fresh scene; any running instance is stopped first
    pub fn start(&mut self, viewport: Viewport) -> bool {
        self.stop();

        if let Err(err) = self.config.validate() {
            if !self.init_failed {
                log::error!("Scene disabled, {}", err);
            }
            self.init_failed = true;
            return false;
        }

        let mut surface = match self.backend.create_surface(viewport) {
            Ok(surface) => surface,
            Err(err) => {
                if !self.init_failed {
                    log::error!("Scene disabled, surface creation failed: {}", err);
                }
                self.init_failed = true;
                return false;
            }
        };

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ctx = SceneContext::new(self.config.clone(), viewport, rng).with_phases(self.phases.clone());

        if let Err(err) = surface.upload(&ctx) {
            if !self.init_failed {
                log::error!("Scene disabled, upload failed: {}", err);
            }
            surface.release();
            self.init_failed = true;
            return false;
        }

        let input = Rc::new(RefCell::new(PendingInput::default()));
        let listeners = vec![
            self.listen(&input, |event| matches!(event, HostEvent::Scroll { .. })),
            self.listen(&input, |event| matches!(event, HostEvent::Resize(_))),
        ];

        self.running.set(true);
        self.init_failed = false;
        let frame = Some(self.scheduler.schedule());
        self.instance = Some(Instance {
            ctx,
            surface,
            listeners,
            input,
            frame,
            clock: Clock::new(),
        });

        log::info!("Scene started at {}x{}", viewport.width, viewport.height);
        true
    }

    fn listen(
        &self,
        input: &Rc<RefCell<PendingInput>>,
        accepts: fn(&HostEvent) -> bool,
    ) -> ListenerId {
        let input = Rc::clone(input);
        let running = Rc::clone(&self.running);
        self.bus.subscribe(move |event| {
            if running.get() && accepts(event) {
                input.borrow_mut().record(event);
            }
        })
    }

    /// Run one scheduled frame at host time `now` (seconds)
    pub fn frame(&mut self, now: f64) -> Option<FrameInfo> {
        if !self.running.get() {
            log::debug!("Frame ignored, scene not running");
            return None;
        }
        let instance = self.instance.as_mut()?;
        let handle = instance.frame.take()?;
        self.scheduler.fired(handle);

        let pending = instance.input.borrow_mut().take();
        if let Some(range) = pending.range {
            instance.ctx.mapper.set_range(range);
        }
        if let Some(offset) = pending.scroll {
            instance.ctx.mapper.set_target(offset);
        }
        if let Some(viewport) = pending.resize {
            instance.surface.resize(viewport);
            instance.ctx.resize(viewport);
        }

        let (time, delta) = instance.clock.tick(now);
        let info = instance.ctx.advance(time, delta);

        match instance.surface.render(&instance.ctx) {
            Ok(()) => {}
            Err(RenderError::Lost) => {
                log::warn!("Surface lost, reconfiguring");
                instance.surface.resize(instance.ctx.viewport());
            }
            Err(err) => log::error!("Frame {} failed: {}", info.number, err),
        }

        if self.running.get() {
            instance.frame = Some(self.scheduler.schedule());
        }
        Some(info)
    }

    /// Tear down the running instance; calling it again is a no-op
    pub fn stop(&mut self) {
        let Some(mut instance) = self.instance.take() else {
            log::debug!("Stop ignored, no scene running");
            return;
        };

        self.running.set(false);
        if let Some(handle) = instance.frame.take() {
            self.scheduler.cancel(handle);
        }
        for id in instance.listeners.drain(..) {
            self.bus.unsubscribe(id);
        }
        instance.surface.release();

        log::info!("Scene stopped after {} frames", instance.ctx.frames());
    }

    /// Reconfigure surface and camera aspect; the scene is not rebuilt
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some(instance) = self.instance.as_mut() else {
            log::debug!("Resize ignored, no scene running");
            return;
        };
        let viewport = Viewport {
            width,
            height,
            ..instance.ctx.viewport()
        };
        instance.surface.resize(viewport);
        instance.ctx.resize(viewport);
    }

    /// Host visibility toggle; `true` always builds a fresh instance
    pub fn set_active(&mut self, active: bool, viewport: Viewport) -> bool {
        if active {
            self.start(viewport)
        } else {
            self.stop();
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn init_failed(&self) -> bool {
        self.init_failed
    }

    pub fn context(&self) -> Option<&SceneContext> {
        self.instance.as_ref().map(|i| &i.ctx)
    }

    pub fn resource_count(&self) -> usize {
        self.instance.as_ref().map_or(0, |i| i.surface.resource_count())
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

impl<B: RenderBackend, S: FrameScheduler> Drop for SceneLifecycle<B, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_tracks_pending() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule();
        let b = scheduler.schedule();
        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), 2);

        scheduler.fired(a);
        scheduler.cancel(b);
        scheduler.cancel(b);
        assert_eq!(scheduler.pending(), 0);
    }
}
