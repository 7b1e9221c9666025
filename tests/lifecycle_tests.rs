use std::rc::Rc;

use temple_ascent::config::TextureConfig;
use temple_ascent::core::{EventBus, FrameScheduler, HostEvent, ManualScheduler, SceneLifecycle, Viewport};
use temple_ascent::particles::ParticleSystem;
use temple_ascent::progress::{triangular, PhaseId, PhaseTable, PhaseWindow, SignalSource};
use temple_ascent::render::NullBackend;
use temple_ascent::SceneConfig;

type TestLifecycle = SceneLifecycle<NullBackend, ManualScheduler>;

fn config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.textures = TextureConfig {
        marble_size: 16,
        marble_veins: 2,
        stone_size: 16,
        stone_dots: 10,
        stone_banding: false,
        smoke_size: 8,
        sky_width: 32,
        sky_height: 16,
        sky_stars: 5,
        sky_nebulae: 1,
    };
    config
}

fn lifecycle(backend: NullBackend) -> (Rc<EventBus>, TestLifecycle) {
    lifecycle_with(backend, config())
}

fn lifecycle_with(backend: NullBackend, config: SceneConfig) -> (Rc<EventBus>, TestLifecycle) {
    let bus = Rc::new(EventBus::new());
    let lifecycle = SceneLifecycle::new(backend, ManualScheduler::new(), Rc::clone(&bus), config).with_seed(42);
    (bus, lifecycle)
}

fn viewport() -> Viewport {
    Viewport::new(800, 600)
}

#[test]
fn test_start_acquires_one_of_everything() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));

    assert!(lifecycle.is_running());
    assert!(!lifecycle.init_failed());
    assert_eq!(bus.listener_count(), 2);
    assert_eq!(lifecycle.scheduler().pending(), 1);

    let stats = lifecycle.backend().stats();
    assert_eq!(stats.live_surfaces, 1);
    assert_eq!(stats.uploads, 1);
    assert!(stats.resources > 0);
    assert_eq!(stats.resources, lifecycle.resource_count());
}

/// Starting again tears the old instance down first
#[test]
fn test_restart_does_not_duplicate_resources() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));
    let first = lifecycle.backend().stats().resources;

    assert!(lifecycle.start(viewport()));
    assert!(lifecycle.start(viewport()));

    let stats = lifecycle.backend().stats();
    assert_eq!(stats.surfaces_created, 3);
    assert_eq!(stats.live_surfaces, 1);
    assert_eq!(stats.releases, 2);
    assert_eq!(stats.resources, first);
    assert_eq!(bus.listener_count(), 2);
    assert_eq!(lifecycle.scheduler().pending(), 1);
}

#[test]
fn test_stop_releases_everything_and_is_idempotent() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));
    lifecycle.frame(0.0);

    lifecycle.stop();
    lifecycle.stop();

    assert!(!lifecycle.is_running());
    assert!(lifecycle.context().is_none());
    assert_eq!(bus.listener_count(), 0);
    assert_eq!(lifecycle.scheduler().pending(), 0);
    assert_eq!(lifecycle.resource_count(), 0);

    let stats = lifecycle.backend().stats();
    assert_eq!(stats.live_surfaces, 0);
    assert_eq!(stats.resources, 0);
    assert_eq!(stats.releases, 1);
}

/// A callback that fires after stop does nothing
#[test]
fn test_frame_after_stop_is_ignored() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));
    lifecycle.stop();

    bus.emit(&HostEvent::Scroll {
        offset: 5_000.0,
        range: None,
    });
    assert!(lifecycle.frame(1.0).is_none());
    assert_eq!(lifecycle.backend().stats().frames, 0);
}

#[test]
fn test_each_frame_reschedules_once() {
    let (_, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));

    for n in 0..10 {
        let info = lifecycle.frame(n as f64 / 60.0).expect("frame runs");
        assert_eq!(info.number, n + 1);
        assert_eq!(lifecycle.scheduler().pending(), 1);
    }
    assert_eq!(lifecycle.backend().stats().frames, 10);
}

#[test]
fn test_first_frame_has_zero_delta() {
    let (_, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));

    let first = lifecycle.frame(12.5).expect("frame runs");
    assert_eq!(first.time, 0.0);
    assert_eq!(first.delta, 0.0);

    let second = lifecycle.frame(12.55).expect("frame runs");
    assert!((second.delta - 0.05).abs() < 1e-4);
    assert!((second.time - 0.05).abs() < 1e-4);
}

/// Scroll events are recorded by listeners and applied on the next frame
#[test]
fn test_scroll_is_applied_on_next_frame() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));

    bus.emit(&HostEvent::Scroll {
        offset: 19_000.0,
        range: None,
    });
    let ctx = lifecycle.context().expect("running");
    assert_eq!(ctx.mapper.raw(), 0.0);

    let info = lifecycle.frame(0.0).expect("frame runs");
    assert_eq!(info.scroll, 19_000.0);
    let ctx = lifecycle.context().expect("running");
    assert_eq!(ctx.mapper.target(), 0.5);
    assert!(info.progress > 0.0 && info.progress < 0.5);
}

#[test]
fn test_scroll_range_update() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));

    bus.emit(&HostEvent::Scroll {
        offset: 5_000.0,
        range: Some(10_000.0),
    });
    lifecycle.frame(0.0);

    let ctx = lifecycle.context().expect("running");
    assert_eq!(ctx.mapper.range(), 10_000.0);
    assert_eq!(ctx.mapper.target(), 0.5);
}

#[test]
fn test_resize_event_updates_surface_and_camera() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));

    bus.emit(&HostEvent::Resize(Viewport::new(1000, 500)));
    lifecycle.frame(0.0);

    let ctx = lifecycle.context().expect("running");
    assert_eq!(ctx.viewport(), Viewport::new(1000, 500));
    assert!((ctx.camera.aspect - 2.0).abs() < 1e-6);
    assert_eq!(lifecycle.backend().stats().resizes, 1);
    // Resize never rebuilds the scene
    assert_eq!(lifecycle.backend().stats().uploads, 1);
}

#[test]
fn test_direct_resize_keeps_scene() {
    let (_, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.start(viewport()));
    lifecycle.resize(640, 640);

    let ctx = lifecycle.context().expect("running");
    assert_eq!(ctx.viewport().width, 640);
    assert!((ctx.camera.aspect - 1.0).abs() < 1e-6);
    assert_eq!(lifecycle.backend().stats().surfaces_created, 1);
}

/// Surface failure disables the scene without taking the host down
#[test]
fn test_failing_backend_sets_init_failed() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::failing());
    assert!(!lifecycle.start(viewport()));

    assert!(lifecycle.init_failed());
    assert!(!lifecycle.is_running());
    assert_eq!(bus.listener_count(), 0);
    assert_eq!(lifecycle.scheduler().pending(), 0);
    assert!(lifecycle.frame(0.0).is_none());

    // A second attempt is still safe
    assert!(!lifecycle.start(viewport()));
    lifecycle.stop();
}

#[test]
fn test_empty_viewport_fails_cleanly() {
    let (_, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(!lifecycle.start(Viewport::new(0, 600)));
    assert!(lifecycle.init_failed());
    assert_eq!(lifecycle.backend().stats().live_surfaces, 0);
}

/// Each activation builds a fresh instance with its own frame counter
#[test]
fn test_set_active_cycles() {
    let (bus, mut lifecycle) = lifecycle(NullBackend::new());
    assert!(lifecycle.set_active(true, viewport()));
    lifecycle.frame(0.0);
    lifecycle.frame(0.1);
    assert_eq!(lifecycle.context().map(|c| c.frames()), Some(2));

    assert!(!lifecycle.set_active(false, viewport()));
    assert_eq!(bus.listener_count(), 0);
    assert_eq!(lifecycle.backend().stats().live_surfaces, 0);

    assert!(lifecycle.set_active(true, viewport()));
    assert_eq!(lifecycle.context().map(|c| c.frames()), Some(0));
    assert_eq!(lifecycle.backend().stats().live_surfaces, 1);
}

#[test]
fn test_drop_releases_surface() {
    let backend = NullBackend::new();
    let observer = backend.clone();
    {
        let (_, mut lifecycle) = lifecycle(backend);
        assert!(lifecycle.start(viewport()));
        assert_eq!(observer.stats().live_surfaces, 1);
    }
    assert_eq!(observer.stats().live_surfaces, 0);
}

/// Seeded lifecycles generate identical scenes
#[test]
fn test_seed_reproduces_scene() {
    let (_, mut a) = lifecycle(NullBackend::new());
    let (_, mut b) = lifecycle(NullBackend::new());
    assert!(a.start(viewport()));
    assert!(b.start(viewport()));

    let (a, b) = (a.context().expect("running"), b.context().expect("running"));
    assert_eq!(a.textures.marble, b.textures.marble);
    assert_eq!(a.particles.dust.buffer().positions(), b.particles.dust.buffer().positions());
}

/// Configs built in code are validated before anything is created
#[test]
fn test_invalid_config_disables_scene() {
    for rows in [0, 1] {
        let mut config = config();
        config.structure.spike_rows = rows;
        let (bus, mut lifecycle) = lifecycle_with(NullBackend::new(), config);

        assert!(!lifecycle.start(viewport()), "spike_rows = {} must not start", rows);
        assert!(lifecycle.init_failed());
        assert!(!lifecycle.is_running());
        assert!(lifecycle.context().is_none());
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(lifecycle.scheduler().pending(), 0);
        assert_eq!(lifecycle.backend().stats().surfaces_created, 0);
    }

    let mut config = config();
    config.progress.scroll_range = f32::NAN;
    let (_, mut lifecycle) = lifecycle_with(NullBackend::new(), config);
    assert!(!lifecycle.set_active(true, viewport()));
    assert!(lifecycle.init_failed());
}

/// Active scene, offset halfway through a window: the window reads 0.5 and its
/// triangular layer sits at its peak
#[test]
fn test_window_midpoint_reaches_layer_peak() {
    let phases = PhaseTable::new(vec![PhaseWindow::new(
        PhaseId::Scripture,
        1_000.0,
        2_000.0,
        SignalSource::Raw,
    )]);
    let (bus, lifecycle) = lifecycle(NullBackend::new());
    let mut lifecycle = lifecycle.with_phases(phases);
    assert!(lifecycle.set_active(true, viewport()));

    bus.emit(&HostEvent::Scroll {
        offset: 1_500.0,
        range: None,
    });
    lifecycle.frame(0.0).expect("frame runs");

    let director = &lifecycle.context().expect("running").director;
    let progress = director.progress().get(PhaseId::Scripture);
    assert_eq!(progress, 0.5);
    assert_eq!(triangular(progress, 0.5), 1.0);
    assert_eq!(director.overlay().scripture.opacity, 1.0);
    assert_eq!(director.progress().get(PhaseId::Stairs), 0.0);
}
