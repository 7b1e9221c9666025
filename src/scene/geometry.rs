use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

/// Shape of a scene object before its transform is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Axis-aligned box centred on the origin
    Box { size: Vec3 },
    /// Y-up cylinder centred on the origin; a zero top radius makes a cone
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    },
    /// XY plane facing +Z
    Plane { width: f32, height: f32 },
    /// Sphere whose faces point inward, for viewing from inside
    InvertedSphere { radius: f32, segments: u32, rings: u32 },
    /// Right-triangle profile (0,0) -> (run, rise) -> (run, 0) extruded along +Z
    RampPrism { run: f32, rise: f32, width: f32 },
}

impl Primitive {
    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        Self::Cylinder {
            radius_top: 0.0,
            radius_bottom: radius,
            height,
            segments,
        }
    }

    pub fn cube(size: f32) -> Self {
        Self::Box {
            size: Vec3::splat(size),
        }
    }
}

/// The ramp's cross-section in its local XY plane
pub fn ramp_profile(run: f32, rise: f32) -> [Vec2; 3] {
    [Vec2::ZERO, Vec2::new(run, rise), Vec2::new(run, 0.0)]
}

/// Indexed triangle mesh with per-vertex normals and UVs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn for_primitive(primitive: &Primitive) -> Self {
        match *primitive {
            Primitive::Box { size } => box_mesh(size),
            Primitive::Cylinder {
                radius_top,
                radius_bottom,
                height,
                segments,
            } => cylinder(radius_top, radius_bottom, height, segments),
            Primitive::Plane { width, height } => plane(width, height),
            Primitive::InvertedSphere {
                radius,
                segments,
                rings,
            } => inverted_sphere(radius, segments, rings),
            Primitive::RampPrism { run, rise, width } => ramp_prism(run, rise, width),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Component-wise (min, max) of all positions
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| {
                let p = Vec3::from_array(*p);
                (min.min(p), max.max(p))
            },
        )
    }

    /// Append a flat quad given counter-clockwise corners
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.positions.len() as u32;
        let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
        for (corner, uv) in corners.iter().zip(uvs) {
            self.positions.push(corner.to_array());
            self.normals.push(normal.to_array());
            self.uvs.push(uv);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn push_triangle(&mut self, corners: [Vec3; 3], uvs: [[f32; 2]; 3], normal: Vec3) {
        let base = self.positions.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs) {
            self.positions.push(corner.to_array());
            self.normals.push(normal.to_array());
            self.uvs.push(uv);
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

fn box_mesh(size: Vec3) -> Mesh {
    let h = size * 0.5;
    let mut mesh = Mesh::default();
    // (normal, u axis, v axis) per face; corners wind counter-clockwise seen from outside
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    for (normal, u, v) in faces {
        let center = normal * h;
        let du = u * h;
        let dv = v * h;
        mesh.push_quad(
            [
                center - du - dv,
                center + du - dv,
                center + du + dv,
                center - du + dv,
            ],
            normal,
        );
    }
    mesh
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let half = height * 0.5;
    let mut mesh = Mesh::default();

    // Side normal tilts by the slope between the two radii
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);
    for row in 0..=1u32 {
        let (y, radius) = if row == 0 {
            (-half, radius_bottom)
        } else {
            (half, radius_top)
        };
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.positions.push([radius * sin, y, radius * cos]);
            mesh.normals
                .push(Vec3::new(sin, slope, cos).normalize().to_array());
            mesh.uvs.push([u, 1.0 - row as f32]);
        }
    }
    let stride = segments + 1;
    for seg in 0..segments {
        let a = seg;
        let b = seg + 1;
        let c = stride + seg + 1;
        let d = stride + seg;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
        if radius <= 0.0 {
            continue;
        }
        let center = mesh.positions.len() as u32;
        mesh.positions.push([0.0, y, 0.0]);
        mesh.normals.push(normal.to_array());
        mesh.uvs.push([0.5, 0.5]);
        for seg in 0..=segments {
            let theta = seg as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.positions.push([radius * sin, y, radius * cos]);
            mesh.normals.push(normal.to_array());
            mesh.uvs.push([0.5 + 0.5 * sin, 0.5 + 0.5 * cos]);
        }
        for seg in 0..segments {
            let a = center + 1 + seg;
            let b = a + 1;
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
    mesh
}

fn plane(width: f32, height: f32) -> Mesh {
    let mut mesh = Mesh::default();
    let (hw, hh) = (width * 0.5, height * 0.5);
    mesh.push_quad(
        [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        Vec3::Z,
    );
    mesh
}

fn inverted_sphere(radius: f32, segments: u32, rings: u32) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = Mesh::default();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * PI;
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = u * TAU;
            let dir = Vec3::new(-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
            mesh.positions.push((dir * radius).to_array());
            mesh.normals.push((-dir).to_array());
            mesh.uvs.push([u, v]);
        }
    }

    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            // Reversed winding relative to an outward sphere
            mesh.indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }
    mesh
}

fn ramp_prism(run: f32, rise: f32, width: f32) -> Mesh {
    let [origin, apex, foot] = ramp_profile(run, rise);
    let front = |p: Vec2| Vec3::new(p.x, p.y, 0.0);
    let back = |p: Vec2| Vec3::new(p.x, p.y, width);
    let mut mesh = Mesh::default();

    let uv = |p: Vec2| [p.x / run.max(f32::EPSILON), 1.0 - p.y / rise.max(f32::EPSILON)];
    mesh.push_triangle(
        [front(origin), front(apex), front(foot)],
        [uv(origin), uv(apex), uv(foot)],
        Vec3::NEG_Z,
    );
    mesh.push_triangle(
        [back(origin), back(foot), back(apex)],
        [uv(origin), uv(foot), uv(apex)],
        Vec3::Z,
    );

    let slope_normal = Vec3::new(-rise, run, 0.0).normalize_or_zero();
    mesh.push_quad(
        [front(origin), back(origin), back(apex), front(apex)],
        slope_normal,
    );
    mesh.push_quad([front(origin), front(foot), back(foot), back(origin)], Vec3::NEG_Y);
    mesh.push_quad([front(apex), back(apex), back(foot), front(foot)], Vec3::X);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_six_faces_and_unit_normals() {
        let mesh = Mesh::for_primitive(&Primitive::Box {
            size: Vec3::new(2.0, 4.0, 6.0),
        });
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let (min, max) = mesh.bounds();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
        for n in &mesh.normals {
            assert!((Vec3::from_array(*n).length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn box_faces_wind_outward() {
        let mesh = Mesh::for_primitive(&Primitive::cube(2.0));
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.positions[i as usize]));
            let face = (b - a).cross(c - a).normalize();
            let normal = Vec3::from_array(mesh.normals[tri[0] as usize]);
            assert!(face.dot(normal) > 0.99);
        }
    }

    #[test]
    fn cone_collapses_to_apex() {
        let mesh = Mesh::for_primitive(&Primitive::cone(0.3, 2.5, 4));
        let (min, max) = mesh.bounds();
        assert!((max.y - 1.25).abs() < 1e-6);
        assert!((min.y + 1.25).abs() < 1e-6);
        let top: Vec<_> = mesh.positions.iter().filter(|p| p[1] > 1.0).collect();
        assert!(top.iter().all(|p| p[0].abs() < 1e-6 && p[2].abs() < 1e-6));
    }

    #[test]
    fn inverted_sphere_normals_point_inward() {
        let mesh = Mesh::for_primitive(&Primitive::InvertedSphere {
            radius: 10.0,
            segments: 8,
            rings: 6,
        });
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let p = Vec3::from_array(*p);
            let n = Vec3::from_array(*n);
            assert!(p.dot(n) < 0.0);
            assert!((p.length() - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn ramp_faces_wind_outward() {
        let mesh = Mesh::for_primitive(&Primitive::RampPrism {
            run: 10.0,
            rise: 4.0,
            width: 3.0,
        });
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.positions[i as usize]));
            let face = (b - a).cross(c - a).normalize();
            let normal = Vec3::from_array(mesh.normals[tri[0] as usize]);
            assert!(face.dot(normal) > 0.99);
        }
    }

    #[test]
    fn ramp_apex_sits_at_run_and_rise() {
        let mesh = Mesh::for_primitive(&Primitive::RampPrism {
            run: 35.0,
            rise: 8.0,
            width: 8.0,
        });
        let (min, max) = mesh.bounds();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(35.0, 8.0, 8.0));
        // Only the x = run edge reaches full height
        for p in &mesh.positions {
            if (p[1] - 8.0).abs() < 1e-6 {
                assert!((p[0] - 35.0).abs() < 1e-6);
            }
        }
    }
}
