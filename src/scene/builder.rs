use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::geometry::Primitive;
use super::materials::{MaterialId, MaterialLibrary};
use super::{
    DirectionalLight, Fog, Lighting, PointLight, SceneGraph, StairSegment, StaticObject, Transform,
};
use crate::config::SceneConfig;
use crate::math::hex_to_rgb;
use crate::textures::TextureSet;

const SKY_SEGMENTS: u32 = 32;
const SPIKE_SEGMENTS: u32 = 4;
const COLUMN_SEGMENTS: u32 = 32;
/// Door and frame sit just proud of the hall's front face
const FACADE_OFFSET: f32 = 0.1;

/// Collects static objects, offsetting complex-local positions by the origin
struct Placer<'a> {
    objects: Vec<StaticObject>,
    origin: Vec3,
    materials: &'a MaterialLibrary,
}

impl Placer<'_> {
    fn world(
        &mut self,
        name: &'static str,
        primitive: Primitive,
        transform: Transform,
        material: MaterialId,
    ) {
        self.objects
            .push(StaticObject::new(name, primitive, transform, material));
    }

    fn complex(&mut self, name: &'static str, primitive: Primitive, local: Vec3, material: MaterialId) {
        let transform = Transform::at(local + self.origin);
        self.world(name, primitive, transform, material);
    }
}

/// Build the full scene graph in dependency order
pub fn build(config: &SceneConfig, textures: &TextureSet) -> SceneGraph {
    let materials = MaterialLibrary::new(&config.palette, textures);
    let mut placer = Placer {
        objects: Vec::new(),
        origin: Vec3::from_array(config.complex_origin),
        materials: &materials,
    };

    place_environment(&mut placer, config);
    let stairs = build_stairs(config, &materials);
    place_temple(&mut placer, config);
    place_courtyard(&mut placer, config);
    place_altar(&mut placer, config);

    let objects = placer.objects;
    log::info!(
        "scene built: {} static objects, {} stairs, {} materials",
        objects.len(),
        stairs.len(),
        materials.len()
    );

    SceneGraph::new(objects, stairs, materials, lighting(), fog(config))
}

fn place_environment(placer: &mut Placer, config: &SceneConfig) {
    let sky = placer.materials.sky;
    placer.world(
        "sky_dome",
        Primitive::InvertedSphere {
            radius: config.sky_radius,
            segments: SKY_SEGMENTS,
            rings: SKY_SEGMENTS,
        },
        Transform::default(),
        sky,
    );

    let floor = placer.materials.floor;
    placer.world(
        "ground",
        Primitive::Plane {
            width: config.ground_size,
            height: config.ground_size,
        },
        Transform::at(Vec3::new(0.0, config.ground_y, 0.0)).rotated_x(-FRAC_PI_2),
        floor,
    );
}

/// Steps widen toward the viewer and rest progressively lower the further out they are
fn build_stairs(config: &SceneConfig, materials: &MaterialLibrary) -> Vec<StairSegment> {
    let stairs = &config.stairs;
    let n = stairs.count;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let width = stairs.width + (1.0 - t) * stairs.taper;
            let below_top = (n - 1 - i) as f32;
            StairSegment::new(
                i,
                n,
                Vec3::new(width, stairs.height, stairs.depth),
                stairs.top_z + below_top * stairs.depth,
                stairs.resting_base - i as f32 * stairs.resting_spacing,
                stairs.top_y - below_top * stairs.height,
                materials.marble,
            )
        })
        .collect()
}

fn place_temple(placer: &mut Placer, config: &SceneConfig) {
    let s = &config.structure;
    let (marble, gold, entrance) = (
        placer.materials.marble,
        placer.materials.gold,
        placer.materials.entrance,
    );

    placer.complex(
        "temple_hall",
        Primitive::Box {
            size: Vec3::new(s.width, s.height, s.depth),
        },
        Vec3::new(0.0, s.height / 2.0, s.z),
        marble,
    );

    let row_spacing = s.depth / s.spike_rows.saturating_sub(1).max(1) as f32;
    let col_spacing = s.width / s.spikes_per_row.saturating_sub(1).max(1) as f32;
    for row in 0..s.spike_rows {
        let z = s.z - s.depth / 2.0 + row as f32 * row_spacing;
        for i in 0..s.spikes_per_row {
            let x = -s.width / 2.0 + i as f32 * col_spacing;
            placer.complex(
                "roof_spike",
                Primitive::cone(s.spike_radius, s.spike_height, SPIKE_SEGMENTS),
                Vec3::new(x, s.height + s.spike_height / 2.0, z),
                gold,
            );
        }
    }

    let facade_z = s.z + s.depth / 2.0 + FACADE_OFFSET;
    placer.complex(
        "doorway",
        Primitive::Plane {
            width: s.door_width,
            height: s.door_height,
        },
        Vec3::new(0.0, s.door_height / 2.0, facade_z),
        entrance,
    );

    let jamb_x = s.door_width / 2.0 + 1.0;
    let jamb = Primitive::Box {
        size: Vec3::new(s.frame_thickness, s.door_height, 1.0),
    };
    for x in [-jamb_x, jamb_x] {
        placer.complex(
            "door_frame",
            jamb,
            Vec3::new(x, s.door_height / 2.0, facade_z),
            gold,
        );
    }
    placer.complex(
        "door_frame",
        Primitive::Box {
            size: Vec3::new(jamb_x * 2.0 + s.frame_thickness * 2.0, s.frame_thickness, 1.0),
        },
        Vec3::new(0.0, s.door_height + s.frame_thickness / 2.0, facade_z),
        gold,
    );

    for x in [-s.column_x, s.column_x] {
        placer.complex(
            "column",
            Primitive::Cylinder {
                radius_top: s.column_radius,
                radius_bottom: s.column_radius,
                height: s.column_height,
                segments: COLUMN_SEGMENTS,
            },
            Vec3::new(x, s.column_height / 2.0, s.column_z),
            marble,
        );
        placer.complex(
            "capital",
            Primitive::Cylinder {
                radius_top: s.capital_radius,
                radius_bottom: s.column_radius,
                height: s.capital_height,
                segments: COLUMN_SEGMENTS,
            },
            Vec3::new(x, s.column_height, s.column_z),
            gold,
        );
    }
}

fn place_courtyard(placer: &mut Placer, config: &SceneConfig) {
    let s = &config.structure;
    let marble = placer.materials.marble;
    placer.complex(
        "courtyard",
        Primitive::Box {
            size: Vec3::new(s.platform_width, 1.0, s.platform_depth),
        },
        Vec3::new(0.0, 0.0, s.z),
        marble,
    );
    placer.complex(
        "back_wall",
        Primitive::Box {
            size: Vec3::new(s.platform_width, s.back_wall_height, s.back_wall_depth),
        },
        Vec3::new(0.0, s.back_wall_height / 2.0, s.back_wall_z),
        marble,
    );
}

fn place_altar(placer: &mut Placer, config: &SceneConfig) {
    let a = &config.altar;
    let stone = placer.materials.stone;

    placer.complex(
        "altar",
        Primitive::Box {
            size: Vec3::new(a.size, a.height, a.size),
        },
        Vec3::new(0.0, a.height / 2.0, a.z),
        stone,
    );
    let base = a.size + 2.0;
    placer.complex(
        "altar_base",
        Primitive::Box {
            size: Vec3::new(base, a.step_thickness, base),
        },
        Vec3::new(0.0, a.step_thickness / 2.0, a.z),
        stone,
    );

    let inset = a.size / 2.0 - a.horn_size / 2.0;
    let horn_y = a.height + a.horn_size / 2.0;
    for (dx, dz) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
        placer.complex(
            "altar_horn",
            Primitive::cube(a.horn_size),
            Vec3::new(dx * inset, horn_y, a.z + dz * inset),
            stone,
        );
    }

    // Profile origin sits one run out from the -X face so the apex meets it
    placer.complex(
        "altar_ramp",
        Primitive::RampPrism {
            run: a.ramp_run,
            rise: a.height - a.step_thickness,
            width: a.ramp_width,
        },
        Vec3::new(-a.size / 2.0 - a.ramp_run, 0.0, a.z - a.ramp_width / 2.0),
        stone,
    );
}

fn lighting() -> Lighting {
    Lighting {
        ambient: hex_to_rgb(0xffffff),
        ambient_intensity: 0.4,
        key: DirectionalLight {
            color: hex_to_rgb(0xfffaed),
            intensity: 1.0,
            position: Vec3::new(80.0, 150.0, 50.0),
        },
        back: DirectionalLight {
            color: hex_to_rgb(0x4e4376),
            intensity: 0.8,
            position: Vec3::new(-50.0, 20.0, -100.0),
        },
        temple: PointLight {
            color: hex_to_rgb(0xffaa00),
            intensity: 3.0,
            range: 200.0,
            position: Vec3::new(0.0, 45.0, -45.0),
        },
    }
}

fn fog(config: &SceneConfig) -> Fog {
    Fog {
        color: hex_to_rgb(config.palette.fog),
        density: config.palette.fog_density,
    }
}
