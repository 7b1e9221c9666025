use glam::Mat4;

use crate::scene::{Fog, Lighting, Material};

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub time: f32,
    pub right: [f32; 3], // Billboard axes for point sprites
    pub _pad0: f32,
    pub up: [f32; 3],
    pub _pad1: f32,
}

/// Lights and fog, written once per frame
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub ambient: [f32; 4],      // rgb * intensity
    pub key_dir: [f32; 4],      // xyz direction towards light
    pub key_color: [f32; 4],
    pub back_dir: [f32; 4],
    pub back_color: [f32; 4],
    pub point_pos: [f32; 4],    // w = range
    pub point_color: [f32; 4],
    pub fog_color: [f32; 3],
    pub fog_density: f32,
}

impl SceneUniform {
    pub fn new(lighting: &Lighting, fog: &Fog) -> Self {
        let scaled = |[r, g, b]: [f32; 3], intensity: f32| {
            [r * intensity, g * intensity, b * intensity, 1.0]
        };
        let toward = |p: glam::Vec3| {
            let d = p.normalize_or_zero();
            [d.x, d.y, d.z, 0.0]
        };
        let point = &lighting.temple;
        Self {
            ambient: scaled(lighting.ambient, lighting.ambient_intensity),
            key_dir: toward(lighting.key.position),
            key_color: scaled(lighting.key.color, lighting.key.intensity),
            back_dir: toward(lighting.back.position),
            back_color: scaled(lighting.back.color, lighting.back.intensity),
            point_pos: [point.position.x, point.position.y, point.position.z, point.range],
            point_color: scaled(point.color, point.intensity),
            fog_color: fog.color,
            fog_density: fog.density,
        }
    }
}

/// Mesh vertex: position, normal, uv
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-object model matrix and material parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],    // rgb + opacity
    pub emissive: [f32; 4], // rgb * intensity, w = roughness
    pub uv: [f32; 4],       // repeat.xy, offset.x, textured flag
    pub surface: [f32; 4],  // metalness, fog flag, unused, unused
}

impl ObjectInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        3 => Float32x4, 4 => Float32x4, 5 => Float32x4, 6 => Float32x4,
        7 => Float32x4, 8 => Float32x4, 9 => Float32x4, 10 => Float32x4
    ];

    pub fn new(model: Mat4, material: &Material, uv_offset: f32) -> Self {
        let [r, g, b] = material.base_color;
        let [er, eg, eb] = material.emissive;
        let i = material.emissive_intensity;
        Self {
            model: model.to_cols_array_2d(),
            color: [r, g, b, material.opacity.clamp(0.0, 1.0)],
            emissive: [er * i, eg * i, eb * i, material.roughness],
            uv: [
                material.uv_repeat[0],
                material.uv_repeat[1],
                uv_offset,
                if material.texture.is_some() { 1.0 } else { 0.0 },
            ],
            surface: [material.metalness, if material.fog { 1.0 } else { 0.0 }, 0.0, 0.0],
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One billboarded point sprite
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl PointInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<CameraUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectInstance>(), 128);
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
    }
}
