use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use temple_ascent::config::TextureConfig;
use temple_ascent::scene::{self, Driven, Primitive, SceneGraph};
use temple_ascent::textures::TextureSet;
use temple_ascent::SceneConfig;

fn small_textures() -> TextureConfig {
    TextureConfig {
        marble_size: 32,
        marble_veins: 3,
        stone_size: 32,
        stone_dots: 50,
        stone_banding: true,
        smoke_size: 16,
        sky_width: 64,
        sky_height: 32,
        sky_stars: 20,
        sky_nebulae: 1,
    }
}

fn build(config: &SceneConfig) -> SceneGraph {
    let textures = TextureSet::generate(&config.textures, &mut StdRng::seed_from_u64(11));
    scene::build(config, &textures)
}

fn default_graph() -> (SceneConfig, SceneGraph) {
    let mut config = SceneConfig::default();
    config.textures = small_textures();
    let graph = build(&config);
    (config, graph)
}

/// The ramp's upper end meets the altar's -X face one step below the top
#[test]
fn test_ramp_apex_meets_altar_face() {
    let (config, graph) = default_graph();
    let ramp = graph.find("altar_ramp").expect("ramp placed");

    let Primitive::RampPrism { run, rise, width } = *ramp.primitive() else {
        panic!("ramp has primitive {:?}", ramp.primitive());
    };
    assert_eq!(rise, config.altar.height - config.altar.step_thickness);
    assert_eq!(width, config.altar.ramp_width);

    let apex = ramp.transform().position + Vec3::new(run, rise, 0.0);
    assert!((apex.x - -config.altar.size / 2.0).abs() < 1e-4, "apex x = {}", apex.x);
    assert!(
        (apex.y - (config.altar_top_world() - config.altar.step_thickness)).abs() < 1e-4,
        "apex y = {}",
        apex.y
    );
    assert_eq!(apex.y, 48.0);

    let centre_z = ramp.transform().position.z + width / 2.0;
    let altar = graph.find("altar").expect("altar placed");
    assert!((centre_z - altar.transform().position.z).abs() < 1e-4);
}

#[test]
fn test_altar_sits_at_complex_origin() {
    let (config, graph) = default_graph();
    let altar = graph.find("altar").expect("altar placed");
    let position = altar.transform().position;

    assert_eq!(position.z, config.complex_origin[2] + config.altar.z);
    assert_eq!(position.y + config.altar.height / 2.0, config.altar_top_world());
    assert_eq!(graph.find_all("altar_horn").count(), 4);
}

#[test]
fn test_every_object_has_a_material() {
    let (_, graph) = default_graph();
    for object in graph.statics() {
        assert!(
            graph.materials.get(object.material()).is_some(),
            "{} references a missing material",
            object.name()
        );
    }
    for stair in graph.stairs() {
        assert!(graph.materials.get(stair.material()).is_some());
    }
}

#[test]
fn test_roof_spike_grid() {
    let (config, graph) = default_graph();
    let expected = config.structure.spike_rows * config.structure.spikes_per_row;
    assert_eq!(graph.find_all("roof_spike").count(), expected);
    assert!(graph.find("sky_dome").is_some());
    assert!(graph.find("ground").is_some());
    assert!(graph.find("temple_hall").is_some());
}

/// A single-row grid built without validation still yields finite transforms
#[test]
fn test_single_spike_row_stays_finite() {
    let mut config = SceneConfig::default();
    config.textures = small_textures();
    config.structure.spike_rows = 1;
    config.structure.spikes_per_row = 1;
    let graph = build(&config);

    assert_eq!(graph.find_all("roof_spike").count(), 1);
    for object in graph.statics() {
        assert!(object.transform().position.is_finite(), "{} is not finite", object.name());
    }
}

/// Lower steps sit nearer the viewer, are wider, and rest deeper
#[test]
fn test_stairs_are_ordered() {
    let (config, graph) = default_graph();
    let stairs = graph.stairs();
    assert_eq!(stairs.len(), config.stairs.count);

    for pair in stairs.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        assert!(lower.transform().position.z > upper.transform().position.z);
        assert!(lower.target_height() < upper.target_height());
        assert!(lower.resting_height() > upper.resting_height());
        assert!(lower.activation_threshold() < upper.activation_threshold());

        let (Primitive::Box { size: a }, Primitive::Box { size: b }) = (lower.primitive(), upper.primitive()) else {
            panic!("stairs must be boxes");
        };
        assert!(a.x > b.x, "steps should narrow toward the top");
    }

    let top = stairs.last().expect("at least one stair");
    assert_eq!(top.target_height(), config.stairs.top_y);
    assert_eq!(top.transform().position.z, config.stairs.top_z);
}

#[test]
fn test_stairs_rest_then_rise_into_place() {
    let (_, mut graph) = default_graph();

    for stair in graph.driven_mut() {
        stair.drive(0.0);
    }
    for stair in graph.stairs() {
        assert_eq!(stair.height(), stair.resting_height());
    }

    for stair in graph.driven_mut() {
        stair.drive(1.0);
    }
    for stair in graph.stairs() {
        assert!(
            (stair.height() - stair.target_height()).abs() < 1e-4,
            "stair {} at {} instead of {}",
            stair.index(),
            stair.height(),
            stair.target_height()
        );
    }
}

/// Each step is fully placed by the progress it reports
#[test]
fn test_placed_at_is_reached() {
    let (_, graph) = default_graph();
    for stair in graph.stairs() {
        let at = stair.placed_at();
        assert!(at <= 1.0);
        assert!((stair.height_at(at) - stair.target_height()).abs() < 1e-3);
    }
}

#[test]
fn test_driving_only_moves_stairs() {
    let (_, mut graph) = default_graph();
    let before: Vec<Vec3> = graph.statics().iter().map(|o| o.transform().position).collect();

    for stair in graph.driven_mut() {
        stair.drive(0.6);
    }

    let after: Vec<Vec3> = graph.statics().iter().map(|o| o.transform().position).collect();
    assert_eq!(before, after);
}

#[test]
fn test_fog_thins_with_distance() {
    let (_, graph) = default_graph();
    assert_eq!(graph.fog.visibility(0.0), 1.0);
    assert!(graph.fog.visibility(100.0) > graph.fog.visibility(300.0));
}

#[test]
fn test_failed_texture_marks_material() {
    let mut config = SceneConfig::default();
    config.textures = TextureConfig {
        marble_size: 0,
        ..small_textures()
    };
    let graph = build(&config);

    let marble = graph.materials.get(graph.materials.marble).expect("marble material");
    assert!(marble.fallback);
    let stone = graph.materials.get(graph.materials.stone).expect("stone material");
    assert!(!stone.fallback);
}
