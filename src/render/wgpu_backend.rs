use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use super::overlay::OverlayRenderer;
use super::types::{CameraUniform, ObjectInstance, PointInstance, SceneUniform, Vertex};
use super::{GpuContext, RenderBackend, RenderError, RenderSurface, SurfaceError};
use crate::context::SceneContext;
use crate::core::lifecycle::{FrameHandle, FrameScheduler};
use crate::core::Viewport;
use crate::scene::{BlendMode, MaterialId, Mesh, SceneGraph, Side};
use crate::textures::{GeneratedTexture, TextureKind, WrapMode};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Renders into a winit window
pub struct WgpuBackend {
    window: Arc<Window>,
    overlay: bool,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>, overlay: bool) -> Self {
        Self { window, overlay }
    }
}

impl RenderBackend for WgpuBackend {
    type Surface = WgpuSurface;

    fn create_surface(&mut self, viewport: Viewport) -> Result<WgpuSurface, SurfaceError> {
        if viewport.is_empty() {
            return Err(SurfaceError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(Arc::clone(&self.window))?;
        let gpu = pollster::block_on(GpuContext::new_with_surface(&instance, &surface))?;

        let caps = surface.get_capabilities(gpu.adapter());
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(SurfaceError::Unsupported)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: viewport.width,
            height: viewport.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &config);

        let overlay = self
            .overlay
            .then(|| OverlayRenderer::new(&gpu, format, &self.window));

        log::info!("Surface {}x{} ({:?})", viewport.width, viewport.height, format);
        Ok(WgpuSurface::new(Arc::clone(&self.window), gpu, surface, config, overlay))
    }
}

/// Frame requests become winit redraw requests
pub struct RedrawScheduler {
    window: Arc<Window>,
    next: u64,
    pending: Option<FrameHandle>,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next: 0,
            pending: None,
        }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn schedule(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next);
        self.next += 1;
        self.pending = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn fired(&mut self, handle: FrameHandle) {
        self.cancel(handle);
    }

    fn pending(&self) -> usize {
        usize::from(self.pending.is_some())
    }
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectRef {
    Static(usize),
    Stair(usize),
}

struct DrawItem {
    object: ObjectRef,
    mesh: usize,
    material: MaterialId,
}

struct PointBatch {
    buffer: wgpu::Buffer,
    capacity: usize,
    material: MaterialId,
}

struct Pipelines {
    opaque: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,
    sky: wgpu::RenderPipeline,
    points_additive: wgpu::RenderPipeline,
    points_alpha: wgpu::RenderPipeline,
}

/// GPU resources of one running scene
pub struct WgpuSurface {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    scene_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    pipelines: Pipelines,
    textures: Vec<(TextureKind, wgpu::BindGroup)>,
    plain: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    draws: Vec<DrawItem>,
    instances: Option<wgpu::Buffer>,
    points: Vec<PointBatch>,
    overlay: Option<OverlayRenderer>,
    released: bool,
}

impl WgpuSurface {
    fn new(
        window: Arc<Window>,
        gpu: GpuContext,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        overlay: Option<OverlayRenderer>,
    ) -> Self {
        let device = gpu.device();

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Buffer"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(0), uniform_entry(1)],
            label: Some("frame_bind_group_layout"),
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: scene_buffer.as_entire_binding(),
                },
            ],
            label: Some("frame_bind_group"),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("texture_bind_group_layout"),
        });

        let pipelines = create_pipelines(device, &frame_layout, &texture_layout, config.format);
        let depth = create_depth_view(device, config.width, config.height);
        let plain = texture_bind_group(&gpu, &texture_layout, &white_pixel());

        Self {
            window,
            gpu,
            surface,
            config,
            depth,
            camera_buffer,
            scene_buffer,
            frame_bind_group,
            texture_layout,
            pipelines,
            textures: Vec::new(),
            plain,
            meshes: Vec::new(),
            draws: Vec::new(),
            instances: None,
            points: Vec::new(),
            overlay,
            released: false,
        }
    }

    fn texture_for(&self, kind: Option<TextureKind>) -> &wgpu::BindGroup {
        kind.and_then(|k| self.textures.iter().find(|(tk, _)| *tk == k))
            .map_or(&self.plain, |(_, group)| group)
    }

    fn pipeline_for(&self, side: Side, blend: BlendMode) -> &wgpu::RenderPipeline {
        match (side, blend) {
            (Side::Back, _) => &self.pipelines.sky,
            (_, BlendMode::Opaque) => &self.pipelines.opaque,
            _ => &self.pipelines.transparent,
        }
    }

    fn write_instances(&self, graph: &SceneGraph) {
        let Some(buffer) = &self.instances else {
            return;
        };
        let data: Vec<ObjectInstance> = self
            .draws
            .iter()
            .filter_map(|draw| {
                let transform = match draw.object {
                    ObjectRef::Static(i) => *graph.statics().get(i)?.transform(),
                    ObjectRef::Stair(i) => *crate::scene::Driven::transform(graph.stairs().get(i)?),
                };
                let material = graph.materials.get(draw.material)?;
                let offset = if draw.material == graph.materials.sky {
                    graph.sky_offset
                } else {
                    0.0
                };
                Some(ObjectInstance::new(transform.matrix(), material, offset))
            })
            .collect();
        self.gpu.queue().write_buffer(buffer, 0, bytemuck::cast_slice(&data));
    }

    fn write_points(&self, ctx: &SceneContext) {
        for (batch, system) in self.points.iter().zip(ctx.particles.systems()) {
            let Some(material) = ctx.graph.materials.get(batch.material) else {
                continue;
            };
            let [r, g, b] = material.base_color;
            let size = material.point_size.unwrap_or(1.0);
            let data: Vec<PointInstance> = system
                .buffer()
                .iter_positions()
                .take(batch.capacity)
                .map(|p| PointInstance {
                    position: p.to_array(),
                    size,
                    color: [r, g, b, material.opacity.clamp(0.0, 1.0)],
                })
                .collect();
            self.gpu.queue().write_buffer(&batch.buffer, 0, bytemuck::cast_slice(&data));
        }
    }
}

impl RenderSurface for WgpuSurface {
    fn upload(&mut self, ctx: &SceneContext) -> Result<(), RenderError> {
        let device = self.gpu.device();

        self.textures = ctx
            .textures
            .iter()
            .map(|texture| (texture.kind, texture_bind_group(&self.gpu, &self.texture_layout, texture)))
            .collect();

        let graph = &ctx.graph;
        let objects = graph
            .statics()
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectRef::Static(i), o.primitive(), o.material()))
            .chain(
                graph
                    .stairs()
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (ObjectRef::Stair(i), crate::scene::Driven::primitive(s), crate::scene::Driven::material(s))),
            );

        self.meshes.clear();
        self.draws.clear();
        for (object, primitive, material) in objects {
            let mesh = Mesh::for_primitive(primitive);
            let vertices: Vec<Vertex> = mesh
                .positions
                .iter()
                .zip(&mesh.normals)
                .zip(&mesh.uvs)
                .map(|((p, n), uv)| Vertex {
                    position: *p,
                    normal: *n,
                    uv: *uv,
                })
                .collect();
            self.meshes.push(GpuMesh {
                vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Vertices"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Indices"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: mesh.indices.len() as u32,
            });
            self.draws.push(DrawItem {
                object,
                mesh: self.meshes.len() - 1,
                material,
            });
        }

        // Sky first, then opaque, then blended
        let rank = |draw: &DrawItem| match graph.materials.get(draw.material) {
            Some(m) if m.side == Side::Back => 0,
            Some(m) if m.blend == BlendMode::Opaque => 1,
            _ => 2,
        };
        self.draws.sort_by_key(rank);

        self.instances = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Instances"),
            size: (self.draws.len().max(1) * std::mem::size_of::<ObjectInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));

        let materials = &graph.materials;
        self.points = ctx
            .particles
            .systems()
            .iter()
            .zip([materials.dust, materials.smoke, materials.cloud])
            .map(|(system, material)| {
                let capacity = system.buffer().len();
                PointBatch {
                    buffer: device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(system.label()),
                        size: (capacity.max(1) * std::mem::size_of::<PointInstance>()) as u64,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    }),
                    capacity,
                    material,
                }
            })
            .collect();

        log::info!(
            "Uploaded {} meshes, {} textures, {} point batches",
            self.meshes.len(),
            self.textures.len(),
            self.points.len()
        );
        self.released = false;
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(self.gpu.device(), &self.config);
        self.depth = create_depth_view(self.gpu.device(), viewport.width, viewport.height);
    }

    fn render(&mut self, ctx: &SceneContext) -> Result<(), RenderError> {
        if self.released {
            return Err(RenderError::Other("surface already released".into()));
        }
        let queue = self.gpu.queue();
        let graph = &ctx.graph;
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[ctx.camera.to_uniform(ctx.time())]),
        );
        queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::cast_slice(&[SceneUniform::new(&graph.lighting, &graph.fog)]),
        );
        self.write_instances(graph);
        self.write_points(ctx);

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Encoder") });

        {
            let [r, g, b] = graph.fog.color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            if let Some(instances) = &self.instances {
                pass.set_vertex_buffer(1, instances.slice(..));
                for (slot, draw) in self.draws.iter().enumerate() {
                    let Some(material) = graph.materials.get(draw.material) else {
                        continue;
                    };
                    let mesh = &self.meshes[draw.mesh];
                    pass.set_pipeline(self.pipeline_for(material.side, material.blend));
                    pass.set_bind_group(1, self.texture_for(material.texture), &[]);
                    pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                    pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                    let slot = slot as u32;
                    pass.draw_indexed(0..mesh.index_count, 0, slot..slot + 1);
                }
            }

            for batch in &self.points {
                let Some(material) = graph.materials.get(batch.material) else {
                    continue;
                };
                if batch.capacity == 0 || material.opacity <= 0.0 {
                    continue;
                }
                let pipeline = match material.blend {
                    BlendMode::Additive => &self.pipelines.points_additive,
                    _ => &self.pipelines.points_alpha,
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, self.texture_for(material.texture), &[]);
                pass.set_vertex_buffer(0, batch.buffer.slice(..));
                pass.draw(0..6, 0..batch.capacity as u32);
            }
        }

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.render(
                &self.gpu,
                &self.window,
                &mut encoder,
                &view,
                [self.config.width, self.config.height],
                ctx.director.overlay(),
            );
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        for mesh in self.meshes.drain(..) {
            mesh.vertices.destroy();
            mesh.indices.destroy();
        }
        for batch in self.points.drain(..) {
            batch.buffer.destroy();
        }
        if let Some(buffer) = self.instances.take() {
            buffer.destroy();
        }
        self.draws.clear();
        self.textures.clear();
        self.released = true;
        log::debug!("Surface resources released");
    }

    fn resource_count(&self) -> usize {
        self.meshes.len() + self.textures.len() + self.points.len()
    }
}

/// Bound wherever a material has no texture
fn white_pixel() -> GeneratedTexture {
    GeneratedTexture {
        kind: TextureKind::Smoke,
        width: 1,
        height: 1,
        pixels: vec![255; 4],
        wrap_s: WrapMode::ClampToEdge,
        wrap_t: WrapMode::ClampToEdge,
        repeat: [1.0, 1.0],
        fallback: false,
    }
}

fn address_mode(mode: WrapMode) -> wgpu::AddressMode {
    match mode {
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
        WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
    }
}

fn texture_bind_group(
    gpu: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    source: &GeneratedTexture,
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width: source.width,
        height: source.height,
        depth_or_array_layers: 1,
    };
    let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
        label: Some(source.kind.label()),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    gpu.queue().write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &source.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * source.width),
            rows_per_image: Some(source.height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = gpu.device().create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: address_mode(source.wrap_s),
        address_mode_v: address_mode(source.wrap_t),
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some("texture_bind_group"),
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

struct PipelineSpec<'a> {
    label: &'a str,
    fragment: &'a str,
    blend: wgpu::BlendState,
    cull: Option<wgpu::Face>,
    depth_write: bool,
}

fn create_pipelines(
    device: &wgpu::Device,
    frame_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> Pipelines {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[frame_layout, texture_layout],
        push_constant_ranges: &[],
    });
    let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
    });
    let point_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Particle Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("particles.wgsl").into()),
    });

    let mesh_buffers = [Vertex::layout(), ObjectInstance::layout()];
    let point_buffers = [PointInstance::layout()];
    Pipelines {
        opaque: build_pipeline(
            device,
            &layout,
            format,
            &mesh_shader,
            &mesh_buffers,
            PipelineSpec {
                label: "Opaque Pipeline",
                fragment: "fs_main",
                blend: wgpu::BlendState::REPLACE,
                cull: Some(wgpu::Face::Back),
                depth_write: true,
            },
        ),
        transparent: build_pipeline(
            device,
            &layout,
            format,
            &mesh_shader,
            &mesh_buffers,
            PipelineSpec {
                label: "Transparent Pipeline",
                fragment: "fs_main",
                blend: wgpu::BlendState::ALPHA_BLENDING,
                cull: None,
                depth_write: false,
            },
        ),
        sky: build_pipeline(
            device,
            &layout,
            format,
            &mesh_shader,
            &mesh_buffers,
            PipelineSpec {
                label: "Sky Pipeline",
                fragment: "fs_sky",
                blend: wgpu::BlendState::REPLACE,
                cull: None,
                depth_write: false,
            },
        ),
        points_additive: build_pipeline(
            device,
            &layout,
            format,
            &point_shader,
            &point_buffers,
            PipelineSpec {
                label: "Additive Points Pipeline",
                fragment: "fs_main",
                blend: ADDITIVE,
                cull: None,
                depth_write: false,
            },
        ),
        points_alpha: build_pipeline(
            device,
            &layout,
            format,
            &point_shader,
            &point_buffers,
            PipelineSpec {
                label: "Alpha Points Pipeline",
                fragment: "fs_main",
                blend: wgpu::BlendState::ALPHA_BLENDING,
                cull: None,
                depth_write: false,
            },
        ),
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'static>],
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(spec.fragment),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(spec.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: spec.cull,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: spec.depth_write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
