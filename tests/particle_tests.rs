use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use temple_ascent::particles::{CloudBank, DustField, ParticleSystem, Particles, SmokeColumn};
use temple_ascent::SceneConfig;

fn run(particles: &mut Particles, frames: usize, rng: &mut StdRng) {
    let dt = 1.0 / 60.0;
    for n in 0..frames {
        particles.update(n as f32 * dt, dt, rng);
    }
}

#[test]
fn test_default_counts() {
    let config = SceneConfig::default();
    let particles = Particles::new(&config, &mut StdRng::seed_from_u64(1));

    assert_eq!(particles.dust.buffer().len(), 400);
    assert_eq!(particles.smoke.buffer().len(), 100);
    assert_eq!(particles.clouds.buffer().len(), 14);
    assert_eq!(particles.total(), 514);

    let labels: Vec<&str> = particles.systems().iter().map(|s| s.label()).collect();
    assert_eq!(labels, ["dust", "smoke", "clouds"]);
}

/// Buffers keep their size however long the scene runs
#[test]
fn test_buffer_lengths_never_change() {
    let config = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(2);
    let mut particles = Particles::new(&config, &mut rng);

    let before: Vec<(usize, usize)> = particles
        .systems()
        .iter()
        .map(|s| (s.buffer().len(), s.buffer().positions().len()))
        .collect();

    run(&mut particles, 600, &mut rng);

    for (system, (len, flat)) in particles.systems().iter().zip(before) {
        let buffer = system.buffer();
        assert_eq!(buffer.len(), len, "{} changed length", system.label());
        assert_eq!(buffer.positions().len(), flat);
        assert_eq!(buffer.positions().len(), buffer.len() * 3);
        assert_eq!(buffer.speeds().len(), buffer.len());
        assert_eq!(buffer.phases().len(), buffer.len());
    }
}

/// Dust only moves vertically and stays between floor and ceiling
#[test]
fn test_dust_stays_in_vertical_band() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut dust = DustField::new(200, &mut rng);
    let start: Vec<Vec3> = dust.buffer().iter_positions().collect();

    for n in 0..900 {
        dust.update(n as f32 / 60.0, 1.0 / 60.0, &mut rng);
    }

    let region = dust.region();
    for (p, s) in dust.buffer().iter_positions().zip(start) {
        assert_eq!(p.x, s.x);
        assert_eq!(p.z, s.z);
        assert!(p.y >= region.min.y && p.y <= region.max.y, "dust escaped at y = {}", p.y);
    }
}

/// Smoke never climbs past its ceiling; anything that would is respawned at the altar
#[test]
fn test_smoke_respawns_below_ceiling() {
    let anchor = Vec3::new(0.0, 49.0, -65.0);
    let mut rng = StdRng::seed_from_u64(4);
    let mut smoke = SmokeColumn::new(100, anchor, &mut rng);

    let half = SmokeColumn::FOOTPRINT / 2.0;
    let mut respawns = 0;
    for n in 0..1_200 {
        let before: Vec<Vec3> = smoke.buffer().iter_positions().collect();
        smoke.update(n as f32 / 60.0, 1.0 / 60.0, &mut rng);
        for (p, old) in smoke.buffer().iter_positions().zip(before) {
            assert!(p.y <= smoke.ceiling(), "smoke at y = {} above ceiling {}", p.y, smoke.ceiling());
            assert!(p.y >= anchor.y + SmokeColumn::SPAWN_LIFT);
            if p.y < old.y {
                respawns += 1;
                assert_eq!(p.y, anchor.y + SmokeColumn::SPAWN_LIFT);
                assert!((p.x - anchor.x).abs() <= half && (p.z - anchor.z).abs() <= half);
            }
        }
    }
    assert!(respawns > 0, "no particle reached the ceiling");
}

#[test]
fn test_smoke_anchor_follows_complex_origin() {
    let config = SceneConfig::default();
    let smoke = SmokeColumn::from_config(&config, &mut StdRng::seed_from_u64(5));
    assert_eq!(smoke.anchor(), Vec3::new(0.0, config.altar_top_world(), -65.0));
    assert_eq!(smoke.ceiling(), smoke.anchor().y + SmokeColumn::RISE);
}

/// Clouds sway around their base x and never drift in y or z
#[test]
fn test_clouds_sway_within_amplitude() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut clouds = CloudBank::new(14, &mut rng);
    let start: Vec<Vec3> = clouds.buffer().iter_positions().collect();

    for n in 0..2_000 {
        let time = n as f32 * 0.37;
        clouds.update(time, 0.016, &mut rng);
        for (i, p) in clouds.buffer().iter_positions().enumerate() {
            let offset = (p.x - clouds.base_x(i)).abs();
            assert!(offset <= clouds.amplitude(i) + 1e-3, "cloud {} swayed {}", i, offset);
            assert_eq!(p.y, start[i].y);
            assert_eq!(p.z, start[i].z);
        }
    }
}

/// The same seed scatters and advances identically
#[test]
fn test_seeded_runs_are_reproducible() {
    let config = SceneConfig::default();
    let mut a_rng = StdRng::seed_from_u64(9);
    let mut b_rng = StdRng::seed_from_u64(9);
    let mut a = Particles::new(&config, &mut a_rng);
    let mut b = Particles::new(&config, &mut b_rng);

    run(&mut a, 400, &mut a_rng);
    run(&mut b, 400, &mut b_rng);

    for (x, y) in a.systems().iter().zip(b.systems()) {
        assert_eq!(x.buffer(), y.buffer());
    }
}
