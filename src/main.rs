use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use temple_ascent::cli::Cli;
use temple_ascent::core::{
    EveryNTicks, EventBus, HostEvent, HostTime, InputCommand, ManualScheduler, SceneLifecycle,
    ScrollController, Throttled, Viewport,
};
use temple_ascent::overlay::OverlayState;
use temple_ascent::progress::PhaseTable;
use temple_ascent::render::{NullBackend, RedrawScheduler, WgpuBackend};
use temple_ascent::SceneConfig;

// === Constants ===

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;
const FPS_UPDATE_INTERVAL: f32 = 1.0;
/// Simulated frame rate of headless runs
const HEADLESS_HZ: f64 = 60.0;
/// Sampling step for the overlap report, in scroll pixels
const CROWDING_STEP: f32 = 50.0;

type WindowLifecycle = SceneLifecycle<WgpuBackend, RedrawScheduler>;

struct App {
    config: SceneConfig,
    seed: Option<u64>,
    overlay: bool,
    bus: Rc<EventBus>,
    window: Option<Arc<Window>>,
    lifecycle: Option<WindowLifecycle>,
    scroll: ScrollController,
    time: HostTime,
    active: bool,
    fps_timer: Throttled,
    frames_since_report: u32,
    last_frame_time: f64,
}

impl App {
    fn new(config: SceneConfig, seed: Option<u64>, overlay: bool) -> Self {
        let range = config.progress.scroll_range;
        Self {
            config,
            seed,
            overlay,
            bus: Rc::new(EventBus::new()),
            window: None,
            lifecycle: None,
            scroll: ScrollController::new(range),
            time: HostTime::new(),
            active: true,
            fps_timer: Throttled::new(FPS_UPDATE_INTERVAL),
            frames_since_report: 0,
            last_frame_time: 0.0,
        }
    }

    fn viewport(&self) -> Viewport {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                Viewport::new(size.width, size.height).with_scale(window.scale_factor() as f32)
            }
            None => Viewport::default(),
        }
    }

    fn report_fps(&mut self) {
        let now = self.time.now();
        let delta = (now - self.last_frame_time) as f32;
        self.last_frame_time = now;
        self.frames_since_report += 1;
        if self.fps_timer.try_tick(delta) {
            log::debug!("FPS: {}", self.frames_since_report);
            self.frames_since_report = 0;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Temple Ascent")
                .with_inner_size(winit::dpi::LogicalSize::new(INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let backend = WgpuBackend::new(Arc::clone(&window), self.overlay);
        let scheduler = RedrawScheduler::new(Arc::clone(&window));
        let mut lifecycle = SceneLifecycle::new(backend, scheduler, Rc::clone(&self.bus), self.config.clone());
        if let Some(seed) = self.seed {
            lifecycle = lifecycle.with_seed(seed);
        }

        self.window = Some(window);
        let viewport = self.viewport();
        if !lifecycle.set_active(true, viewport) {
            log::warn!("Scene unavailable; the window stays open without it");
        }
        self.lifecycle = Some(lifecycle);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match self.scroll.process_event(&event) {
            Some(InputCommand::Scroll(offset)) => {
                self.bus.emit(&HostEvent::Scroll { offset, range: None });
            }
            Some(InputCommand::ToggleActive) => {
                self.active = !self.active;
                let viewport = self.viewport();
                if let Some(lifecycle) = self.lifecycle.as_mut() {
                    if lifecycle.set_active(self.active, viewport) {
                        // A fresh instance starts from the current page position
                        self.bus.emit(&HostEvent::Scroll {
                            offset: self.scroll.offset(),
                            range: Some(self.scroll.range()),
                        });
                    }
                }
                log::info!("Scene {}", if self.active { "activated" } else { "deactivated" });
            }
            Some(InputCommand::Quit) => event_loop.exit(),
            None => {}
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let viewport = Viewport::new(size.width, size.height).with_scale(self.viewport().scale_factor);
                self.bus.emit(&HostEvent::Resize(viewport));
            }
            WindowEvent::RedrawRequested => {
                let now = self.time.now();
                let ran = self.lifecycle.as_mut().and_then(|l| l.frame(now)).is_some();
                if ran {
                    self.report_fps();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(lifecycle) = self.lifecycle.as_mut() {
            lifecycle.stop();
        }
    }
}

/// Run the whole scroll range on the null backend and log a summary
fn run_headless(config: SceneConfig, seed: Option<u64>, frames: u64) -> Result<()> {
    let range = config.progress.scroll_range;
    let bus = Rc::new(EventBus::new());
    let mut lifecycle = SceneLifecycle::new(NullBackend::new(), ManualScheduler::new(), Rc::clone(&bus), config);
    if let Some(seed) = seed {
        lifecycle = lifecycle.with_seed(seed);
    }

    if !lifecycle.start(Viewport::default()) {
        anyhow::bail!("headless scene failed to start");
    }

    let mut progress_log = EveryNTicks::new(HEADLESS_HZ as u64);
    let frames = frames.max(1);
    for n in 0..frames {
        let offset = range * n as f32 / (frames - 1).max(1) as f32;
        bus.emit(&HostEvent::Scroll { offset, range: None });
        let Some(info) = lifecycle.frame(n as f64 / HEADLESS_HZ) else {
            break;
        };
        if progress_log.tick() {
            log::info!(
                "frame {:>5}  scroll {:>8.0}  progress {:.3}",
                info.number,
                info.scroll,
                info.progress
            );
        }
    }

    if let Some(ctx) = lifecycle.context() {
        let visible: Vec<&str> = ctx
            .director
            .overlay()
            .layers()
            .into_iter()
            .filter(|(_, opacity)| *opacity > 0.0)
            .map(|(name, _)| name)
            .collect();
        log::info!(
            "Ran {} frames: progress {:.3}, camera at {:?}, visible layers {:?}",
            ctx.frames(),
            ctx.mapper.smoothed(),
            ctx.camera.position,
            visible
        );
    }

    for region in PhaseTable::landing().crowded_regions(range, CROWDING_STEP, OverlayState::layers_for) {
        log::warn!(
            "Crowded overlay {:.0}..{:.0} px: {}",
            region.start,
            region.end,
            region.layers.join(", ")
        );
    }

    let stats = lifecycle.backend().stats();
    lifecycle.stop();
    log::info!(
        "Null backend: {} surfaces, {} frames rendered, {} resources",
        stats.surfaces_created,
        stats.frames,
        stats.resources
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(range) = cli.scroll_range {
        config.progress.scroll_range = range;
        config.validate().context("invalid --scroll-range")?;
    }

    if cli.headless {
        return run_headless(config, cli.seed, cli.frames);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, cli.seed, !cli.no_overlay);

    log::info!("Controls: wheel/arrows/PageUp/PageDown scroll, Space toggles the scene, Escape quits");
    event_loop.run_app(&mut app)?;

    Ok(())
}
