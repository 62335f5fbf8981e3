use crate::shaders;
use crate::vertex::{Vertex, expand};
use aviator_common::Color;
use aviator_kernel::{MaterialId, MeshId, SceneGraph};
use aviator_render::{DrawItem, RenderView, Renderer, draw_list};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use std::collections::HashMap;
use wgpu::util::DeviceExt;

/// MSAA samples for the scene pass.
const SAMPLE_COUNT: u32 = 4;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
    7 => Float32x4,
];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    sky_color: [f32; 4],
    ground_color: [f32; 4],
    light_color: [f32; 4],
    light_dir: [f32; 4],
    fog_color: [f32; 4],
    fog_range: [f32; 4],
    shadow_params: [f32; 4],
}

impl Uniforms {
    fn from_view(view: &RenderView) -> Self {
        let hemi = view.lighting.hemisphere;
        let sun = view.lighting.directional;
        let (light_view_proj, shadow_params) =
            match (sun.shadow, sun.shadow_view_projection()) {
                (Some(shadow), Some(m)) => (
                    m,
                    [1.0, 1.0 / shadow.map_size.max(1) as f32, shadow.bias, 0.0],
                ),
                _ => (Mat4::IDENTITY, [0.0; 4]),
            };
        Self {
            view_proj: view.view_projection().to_cols_array_2d(),
            light_view_proj: light_view_proj.to_cols_array_2d(),
            eye: view.eye.extend(1.0).to_array(),
            sky_color: rgb_and(hemi.sky, hemi.intensity),
            ground_color: rgb_and(hemi.ground, hemi.intensity),
            light_color: rgb_and(sun.color, sun.intensity),
            light_dir: sun.direction().extend(0.0).to_array(),
            fog_color: rgb_and(view.fog.color, 1.0),
            fog_range: [view.fog.near, view.fog.far, 0.0, 0.0],
            shadow_params,
        }
    }
}

fn rgb_and(color: Color, w: f32) -> [f32; 4] {
    let [r, g, b] = color.to_linear_rgb();
    [r, g, b, w]
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    shadow: [f32; 4],
}

/// Errors raised while rendering a frame on the GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("mesh {0:?} is not in the scene")]
    MissingMesh(MeshId),
    #[error("material {0:?} is not in the scene")]
    MissingMaterial(MaterialId),
}

/// Uploaded vertex data for one mesh and shading mode.
struct GpuMesh {
    buffer: wgpu::Buffer,
    capacity: u64,
    vertex_count: u32,
    revision: u64,
}

type MeshKey = (MeshId, bool);

/// A run of consecutive draw items sharing one vertex buffer, blend mode
/// and shadow casting.
#[derive(Debug, Clone, PartialEq)]
struct Batch {
    key: MeshKey,
    instances: std::ops::Range<u32>,
    transparent: bool,
    cast_shadow: bool,
}

/// Group consecutive `(key, transparent, cast_shadow)` runs into batches.
/// Instance indices follow input order.
fn batch_runs(runs: impl IntoIterator<Item = (MeshKey, bool, bool)>) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    for (i, (key, transparent, cast_shadow)) in runs.into_iter().enumerate() {
        let i = i as u32;
        match batches.last_mut() {
            Some(b) if b.key == key && b.transparent == transparent && b.cast_shadow == cast_shadow => {
                b.instances.end = i + 1;
            }
            _ => batches.push(Batch {
                key,
                instances: i..i + 1,
                transparent,
                cast_shadow,
            }),
        }
    }
    batches
}

/// Depth target the directional light renders casters into, plus the bind
/// group the scene pass samples it through.
struct ShadowMap {
    size: u32,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
}

/// wgpu-based scene renderer.
///
/// Vertex buffers are cached per mesh and re-uploaded only when the mesh
/// revision changes, so the sea is streamed every frame while the airplane
/// and clouds upload once.
pub struct WgpuRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    shadow_layout: wgpu::BindGroupLayout,
    shadow_sampler: wgpu::Sampler,
    shadow_map: ShadowMap,
    instance_buffer: wgpu::Buffer,
    max_instances: u32,
    meshes: HashMap<MeshKey, GpuMesh>,
    depth_texture: wgpu::TextureView,
    msaa_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms::from_view(&RenderView::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shadow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let map_size = RenderView::default()
            .lighting
            .directional
            .shadow
            .map_or(1, |s| s.map_size);
        let shadow_map =
            Self::create_shadow_map(device, &shadow_layout, &shadow_sampler, map_size);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout, &shadow_layout],
            push_constant_ranges: &[],
        });

        let shadow_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("shadow_pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let opaque_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "opaque_pipeline",
            wgpu::BlendState::REPLACE,
            true,
        );
        let transparent_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "transparent_pipeline",
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );
        let shadow_pipeline = Self::create_shadow_pipeline(device, &shadow_pipeline_layout, &shader);

        let max_instances = 4_096u32;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (max_instances as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);
        let msaa_texture = Self::create_msaa_texture(device, surface_format, width, height);

        Self {
            opaque_pipeline,
            transparent_pipeline,
            shadow_pipeline,
            uniform_buffer,
            uniform_bind_group,
            shadow_layout,
            shadow_sampler,
            shadow_map,
            instance_buffer,
            max_instances,
            meshes: HashMap::new(),
            depth_texture,
            msaa_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
        self.msaa_texture =
            Self::create_msaa_texture(device, self.surface_format, width, height);
    }

    /// Side of the current shadow map in texels.
    pub fn shadow_map_size(&self) -> u32 {
        self.shadow_map.size
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Number of mesh buffers currently resident on the GPU.
    pub fn cached_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Bind this renderer to one frame's device, queue and target so the
    /// frame loop can drive it through [`Renderer`].
    pub fn frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target: &'a wgpu::TextureView,
    ) -> GpuFrame<'a> {
        GpuFrame {
            renderer: self,
            device,
            queue,
            target,
        }
    }

    /// Render one frame of `scene` into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        scene: &SceneGraph,
        view: &RenderView,
    ) -> Result<(), GpuError> {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::from_view(view)),
        );

        let mut items = draw_list(scene);
        if items.len() > self.max_instances as usize {
            tracing::warn!(
                draws = items.len(),
                max = self.max_instances,
                "draw list truncated"
            );
            items.truncate(self.max_instances as usize);
        }

        let mut instances = Vec::with_capacity(items.len());
        let mut runs = Vec::with_capacity(items.len());
        for item in &items {
            let material = scene
                .material(item.material)
                .ok_or(GpuError::MissingMaterial(item.material))?;
            let key = (item.mesh, material.flat_shading);
            self.sync_mesh(device, queue, scene, key)?;
            instances.push(instance(item, material.color, material.opacity));
            runs.push((key, item.transparent, item.cast_shadow));
        }
        let batches = batch_runs(runs);

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let shadow = view.lighting.directional.shadow;
        if let Some(shadow) = shadow {
            let size = shadow
                .map_size
                .clamp(1, device.limits().max_texture_dimension_2d);
            if size != self.shadow_map.size {
                tracing::debug!(size, "resizing shadow map");
                self.shadow_map =
                    Self::create_shadow_map(device, &self.shadow_layout, &self.shadow_sampler, size);
            }
        }

        let fog = view.fog.color.to_linear_rgb();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        if shadow.is_some() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.shadow_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for batch in batches.iter().filter(|b| b.cast_shadow) {
                let Some(mesh) = self.meshes.get(&batch.key) else {
                    continue;
                };
                pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                pass.draw(0..mesh.vertex_count, batch.instances.clone());
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.msaa_texture,
                    resolve_target: Some(target),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: fog[0] as f64,
                            g: fog[1] as f64,
                            b: fog[2] as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Discard,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_bind_group(1, &self.shadow_map.bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for batch in &batches {
                let Some(mesh) = self.meshes.get(&batch.key) else {
                    continue;
                };
                let pipeline = if batch.transparent {
                    &self.transparent_pipeline
                } else {
                    &self.opaque_pipeline
                };
                pass.set_pipeline(pipeline);
                pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                pass.draw(0..mesh.vertex_count, batch.instances.clone());
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(draws = items.len(), batches = batches.len(), "gpu frame");
        Ok(())
    }

    /// Upload `key`'s vertices if they are missing or stale.
    fn sync_mesh(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &SceneGraph,
        key: MeshKey,
    ) -> Result<(), GpuError> {
        let (id, flat) = key;
        let mesh = scene.mesh(id).ok_or(GpuError::MissingMesh(id))?;
        if self
            .meshes
            .get(&key)
            .is_some_and(|m| m.revision == mesh.revision())
        {
            return Ok(());
        }

        let vertices = expand(mesh, flat);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        let vertex_count = vertices.len() as u32;

        match self.meshes.get_mut(&key) {
            Some(cached) if cached.capacity >= bytes.len() as u64 => {
                queue.write_buffer(&cached.buffer, 0, bytes);
                cached.vertex_count = vertex_count;
                cached.revision = mesh.revision();
            }
            _ => {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vertex_buffer"),
                    contents: bytes,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
                tracing::debug!(mesh = id.0, vertices = vertex_count, "uploaded mesh");
                self.meshes.insert(
                    key,
                    GpuMesh {
                        buffer,
                        capacity: bytes.len() as u64,
                        vertex_count,
                        revision: mesh.revision(),
                    },
                );
            }
        }
        Ok(())
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        label: &str,
        blend: wgpu::BlendState,
        depth_write_enabled: bool,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &vertex_layouts(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: SAMPLE_COUNT,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        })
    }

    /// Depth-only pipeline for shadow casters. Both faces are drawn so thin
    /// parts like the propeller blade still cast.
    fn create_shadow_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_shadow"),
                compilation_options: Default::default(),
                buffers: &vertex_layouts(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_shadow_map(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        size: u32,
    ) -> ShadowMap {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_map"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        ShadowMap {
            size,
            view,
            bind_group,
        }
    }

    fn create_msaa_texture(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa_color"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: SAMPLE_COUNT,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: SAMPLE_COUNT,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        },
    ]
}

fn instance(item: &DrawItem, color: Color, opacity: f32) -> InstanceData {
    let cols = item.model.to_cols_array_2d();
    let [r, g, b] = color.to_linear_rgb();
    InstanceData {
        model_0: cols[0],
        model_1: cols[1],
        model_2: cols[2],
        model_3: cols[3],
        color: [r, g, b, opacity],
        shadow: [f32::from(u8::from(item.receive_shadow)), 0.0, 0.0, 0.0],
    }
}

/// One frame's worth of GPU context, usable wherever a [`Renderer`] is
/// expected.
pub struct GpuFrame<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    target: &'a wgpu::TextureView,
}

impl Renderer for GpuFrame<'_> {
    type Output = ();
    type Error = GpuError;

    fn render(&mut self, scene: &SceneGraph, view: &RenderView) -> Result<(), GpuError> {
        self.renderer
            .render(self.device, self.queue, self.target, scene, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviator_render::ShadowCamera;

    #[test]
    fn uniforms_carry_shadow_camera() {
        let view = RenderView::default();
        let u = Uniforms::from_view(&view);
        assert_eq!(u.shadow_params[0], 1.0);
        assert_eq!(u.shadow_params[1], 1.0 / 2048.0);
        assert_eq!(u.shadow_params[2], ShadowCamera::default().bias);
        let expected = view.lighting.directional.shadow_view_projection().unwrap();
        assert_eq!(u.light_view_proj, expected.to_cols_array_2d());
    }

    #[test]
    fn shadowless_view_disables_lookup() {
        let mut view = RenderView::default();
        view.lighting.directional.shadow = None;
        let u = Uniforms::from_view(&view);
        assert_eq!(u.shadow_params, [0.0; 4]);
        assert_eq!(u.light_view_proj, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn batches_split_on_shadow_casting() {
        let hull = (MeshId(0), true);
        let sea = (MeshId(1), true);
        let batches = batch_runs([
            (hull, false, true),
            (hull, false, true),
            (hull, false, false),
            (sea, true, false),
            (sea, true, false),
        ]);
        let ranges: Vec<_> = batches
            .iter()
            .map(|b| (b.instances.clone(), b.cast_shadow, b.transparent))
            .collect();
        assert_eq!(
            ranges,
            [(0..2, true, false), (2..3, false, false), (3..5, false, true)]
        );
    }

    #[test]
    fn receive_flag_reaches_instance() {
        let item = DrawItem {
            node: aviator_kernel::NodeId(0),
            mesh: MeshId(0),
            material: MaterialId(0),
            model: Mat4::IDENTITY,
            transparent: true,
            cast_shadow: false,
            receive_shadow: true,
        };
        let data = instance(&item, Color(0x68c3c0), 0.6);
        assert_eq!(data.shadow[0], 1.0);
        assert_eq!(data.color[3], 0.6);
    }

    #[test]
    fn instance_layout_matches_shader_locations() {
        let locations: Vec<u32> = INSTANCE_ATTRIBUTES.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, [2, 3, 4, 5, 6, 7]);
        assert_eq!(
            std::mem::size_of::<InstanceData>(),
            INSTANCE_ATTRIBUTES.len() * 16
        );
    }
}
