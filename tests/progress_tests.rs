use temple_ascent::overlay::OverlayState;
use temple_ascent::progress::{
    triangular, window_progress, PhaseId, PhaseTable, PhaseWindow, ProgressMapper, SignalSource,
};

/// Smoothed progress approaches the target without ever passing it
#[test]
fn test_mapper_converges_without_overshoot() {
    let mut mapper = ProgressMapper::new(38_000.0);
    mapper.set_target(19_000.0);

    let mut previous = mapper.smoothed();
    for _ in 0..300 {
        let now = mapper.tick();
        assert!(now >= previous, "smoothed progress went backwards: {} -> {}", previous, now);
        assert!(now <= 0.5, "smoothed progress overshot the target: {}", now);
        previous = now;
    }

    assert!(
        (mapper.smoothed() - 0.5).abs() < 1e-4,
        "expected convergence to 0.5, got {}",
        mapper.smoothed()
    );
    assert!((mapper.smoothed_px() - 19_000.0).abs() < 5.0);
}

/// Reversing the scroll direction decays back toward zero
#[test]
fn test_mapper_follows_reversal() {
    let mut mapper = ProgressMapper::new(1_000.0).with_damping(0.5);
    mapper.set_target(1_000.0);
    for _ in 0..40 {
        mapper.tick();
    }
    assert!(mapper.smoothed() > 0.999);

    mapper.set_target(0.0);
    let first = mapper.tick();
    assert!((first - 0.5).abs() < 1e-3, "half the gap closes per tick, got {}", first);
    for _ in 0..40 {
        mapper.tick();
    }
    assert!(mapper.smoothed() < 1e-3);
}

/// Offsets beyond either end of the page clamp the target
#[test]
fn test_target_clamps_out_of_range_offsets() {
    let mut mapper = ProgressMapper::new(38_000.0);
    mapper.set_target(50_000.0);
    assert_eq!(mapper.target(), 1.0);
    assert_eq!(mapper.raw(), 50_000.0);

    mapper.set_target(-250.0);
    assert_eq!(mapper.target(), 0.0);

    mapper.set_target(f32::NAN);
    assert_eq!(mapper.target(), 0.0);
}

#[test]
fn test_window_progress_boundaries() {
    assert_eq!(window_progress(1_500.0, 1_000.0, 2_000.0), 0.5);
    assert_eq!(window_progress(999.0, 1_000.0, 2_000.0), 0.0);
    assert_eq!(window_progress(1_000.0, 1_000.0, 2_000.0), 0.0);
    assert_eq!(window_progress(2_000.0, 1_000.0, 2_000.0), 1.0);
    assert_eq!(window_progress(9_000.0, 1_000.0, 2_000.0), 1.0);
}

#[test]
fn test_zero_width_window_is_a_step() {
    assert_eq!(window_progress(499.0, 500.0, 500.0), 0.0);
    assert_eq!(window_progress(500.0, 500.0, 500.0), 1.0);
}

#[test]
fn test_triangular_peaks_once() {
    assert_eq!(triangular(0.0, 0.5), 0.0);
    assert_eq!(triangular(0.25, 0.5), 0.5);
    assert_eq!(triangular(0.5, 0.5), 1.0);
    assert_eq!(triangular(0.75, 0.5), 0.5);
    assert_eq!(triangular(1.0, 0.5), 0.0);
}

/// Every phase of the landing sequence has exactly one window
#[test]
fn test_landing_table_covers_every_phase() {
    let table = PhaseTable::landing();
    for id in PhaseId::ALL {
        let count = table.windows().iter().filter(|w| w.id == id).count();
        assert_eq!(count, 1, "{:?} has {} windows", id, count);
    }
    for window in table.windows() {
        assert!(window.end > window.start, "{:?} window is empty", window.id);
    }
}

/// Stairs track the raw offset while staged copy waits for the smoothed signal
#[test]
fn test_landing_sources_are_split() {
    let table = PhaseTable::landing();

    let fast_scroll = table.evaluate(10_000.0, 0.0);
    assert_eq!(fast_scroll.get(PhaseId::Stairs), 1.0);
    assert_eq!(fast_scroll.get(PhaseId::CloudVeil), 1.0);
    assert_eq!(fast_scroll.get(PhaseId::Scripture), 0.0);

    let settled = table.evaluate(0.0, 10_000.0);
    assert_eq!(settled.get(PhaseId::Stairs), 0.0);
    assert_eq!(settled.get(PhaseId::Scripture), 0.5);
}

#[test]
fn test_landing_sequence_has_no_crowded_regions() {
    let table = PhaseTable::landing();
    let regions = table.crowded_regions(38_000.0, 50.0, OverlayState::layers_for);
    assert!(regions.is_empty(), "unexpected crowding: {:?}", regions);
}

/// Three panels sharing one window are reported as a single region
#[test]
fn test_overlapping_windows_are_flagged() {
    let table = PhaseTable::new(vec![
        PhaseWindow::new(PhaseId::Cards, 0.0, 1_000.0, SignalSource::Smoothed),
        PhaseWindow::new(PhaseId::OneApp, 0.0, 1_000.0, SignalSource::Smoothed),
        PhaseWindow::new(PhaseId::Connect, 0.0, 1_000.0, SignalSource::Smoothed),
    ]);

    let regions = table.crowded_regions(2_000.0, 50.0, OverlayState::layers_for);
    assert_eq!(regions.len(), 1, "expected one region, got {:?}", regions);

    let region = &regions[0];
    assert!(region.start > 0.0 && region.start <= 150.0);
    assert!(region.end < 1_000.0);
    assert!(region.layers.contains(&"one_app"));
    assert!(region.layers.contains(&"connect"));
}

#[test]
fn test_crowding_rejects_bad_step() {
    let table = PhaseTable::landing();
    assert!(table.crowded_regions(38_000.0, 0.0, OverlayState::layers_for).is_empty());
    assert!(table.crowded_regions(38_000.0, f32::NAN, OverlayState::layers_for).is_empty());
}
