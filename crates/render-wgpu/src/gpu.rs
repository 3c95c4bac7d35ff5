use crate::mesh::{self, CONE_SEGMENTS, CYLINDER_SEGMENTS, MeshData, Vertex};
use crate::shaders;
use beachfire_assets::{Filter, Texture, Wrap};
use beachfire_render::{DrawList, MeshKind, TextureKey};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use std::collections::HashMap;
use std::ops::Range;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MESH_ORDER: [MeshKind; 4] = [MeshKind::Plane, MeshKind::Cube, MeshKind::Cylinder, MeshKind::Cone];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    camera_right: [f32; 4],
    camera_up: [f32; 4],
    ambient: [f32; 4],
    sun_direction: [f32; 4],
    sun_color: [f32; 4],
    point_position: [f32; 4],
    point_color: [f32; 4],
}

impl Uniforms {
    fn from_list(list: &DrawList) -> Self {
        let l = &list.lighting;
        let v = |v: Vec3, w: f32| [v.x, v.y, v.z, w];
        let c = |c: [f32; 3]| [c[0], c[1], c[2], 1.0];
        Self {
            view_proj: list.view_proj.to_cols_array_2d(),
            eye: v(list.eye, 1.0),
            camera_right: v(list.camera_right, 0.0),
            camera_up: v(list.camera_up, 0.0),
            ambient: c(l.ambient),
            sun_direction: v(l.sun_direction, 0.0),
            sun_color: c(l.sun_color),
            point_position: v(l.point_position, l.point_distance.max(1e-3)),
            point_color: c(l.point_color),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MeshInstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ParticleData {
    position_size: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct QuadInstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    uv_rect: [f32; 4],
    tint: [f32; 4],
    params: [f32; 4],
}

fn model_columns(model: Mat4) -> [[f32; 4]; 4] {
    model.to_cols_array_2d()
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vertex_buffer")),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_index_buffer")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Settings that differ between the three pipelines.
struct PipelineSpec<'a> {
    label: &'a str,
    source: String,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    blend: wgpu::BlendState,
    depth_write: bool,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(spec.label),
        source: wgpu::ShaderSource::Wgsl(spec.source.into()),
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some(spec.vs),
            compilation_options: Default::default(),
            buffers: spec.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(spec.fs),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(spec.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            // Leaves, sprites and mirrored characters are all seen from both sides.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: spec.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn instance_buffer(device: &wgpu::Device, label: &str, stride: usize, count: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: count as u64 * stride as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// wgpu renderer for a [`DrawList`].
pub struct WgpuRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    particle_pipeline: wgpu::RenderPipeline,
    quad_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    meshes: HashMap<MeshKind, GpuMesh>,
    mesh_instances: wgpu::Buffer,
    particle_instances: wgpu::Buffer,
    quad_instances: wgpu::Buffer,
    max_instances: u32,
    textures: HashMap<TextureKey, wgpu::BindGroup>,
    fallback_texture: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniform_buffer"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
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
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
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
        });

        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let quad_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline = create_pipeline(
            device,
            &scene_layout,
            surface_format,
            PipelineSpec {
                label: "mesh_pipeline",
                source: format!("{}{}", shaders::COMMON, shaders::MESH_SHADER),
                vs: "vs_main",
                fs: "fs_main",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MeshInstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
            },
        );

        let quad_pipeline = create_pipeline(
            device,
            &quad_layout,
            surface_format,
            PipelineSpec {
                label: "quad_pipeline",
                source: format!("{}{}", shaders::COMMON, shaders::QUAD_SHADER),
                vs: "vs_quad",
                fs: "fs_quad",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<QuadInstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x4,
                        1 => Float32x4,
                        2 => Float32x4,
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                    ],
                }],
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: true,
            },
        );

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let particle_pipeline = create_pipeline(
            device,
            &scene_layout,
            surface_format,
            PipelineSpec {
                label: "particle_pipeline",
                source: format!("{}{}", shaders::COMMON, shaders::PARTICLE_SHADER),
                vs: "vs_particle",
                fs: "fs_particle",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ParticleData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x4,
                        1 => Float32x4,
                    ],
                }],
                blend: wgpu::BlendState {
                    color: additive,
                    alpha: additive,
                },
                depth_write: false,
            },
        );

        let mut meshes = HashMap::new();
        meshes.insert(MeshKind::Cube, GpuMesh::upload(device, "cube", &mesh::cube_mesh()));
        meshes.insert(
            MeshKind::Cylinder,
            GpuMesh::upload(device, "cylinder", &mesh::cylinder_mesh(CYLINDER_SEGMENTS)),
        );
        meshes.insert(
            MeshKind::Cone,
            GpuMesh::upload(device, "cone", &mesh::cone_mesh(CONE_SEGMENTS)),
        );
        meshes.insert(MeshKind::Plane, GpuMesh::upload(device, "plane", &mesh::plane_mesh()));

        // Pre-allocated instance buffers.
        let max_instances = 10_000u32;
        let mesh_instances = instance_buffer(
            device,
            "mesh_instance_buffer",
            std::mem::size_of::<MeshInstanceData>(),
            max_instances,
        );
        let particle_instances = instance_buffer(
            device,
            "particle_instance_buffer",
            std::mem::size_of::<ParticleData>(),
            max_instances,
        );
        let quad_instances = instance_buffer(
            device,
            "quad_instance_buffer",
            std::mem::size_of::<QuadInstanceData>(),
            max_instances,
        );

        let white = Texture::solid("white", 1, 1, [255; 4]);
        let fallback_texture = texture_bind_group(device, queue, &texture_layout, &white);

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            mesh_pipeline,
            particle_pipeline,
            quad_pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            meshes,
            mesh_instances,
            particle_instances,
            quad_instances,
            max_instances,
            textures: HashMap::new(),
            fallback_texture,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Upload a texture and make it available under `key`, replacing any
    /// earlier upload.
    pub fn upload_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: TextureKey,
        texture: &Texture,
    ) {
        let expected = texture.width as usize * texture.height as usize * 4;
        if texture.width == 0 || texture.height == 0 || texture.rgba.len() != expected {
            tracing::warn!(name = %texture.name, ?key, "skipping malformed texture");
            return;
        }
        let bind_group = texture_bind_group(device, queue, &self.texture_layout, texture);
        tracing::debug!(name = %texture.name, ?key, "texture uploaded");
        self.textures.insert(key, bind_group);
    }

    /// Render one frame: props, textured quads, then particles.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        list: &DrawList,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::from_list(list)),
        );

        let max = self.max_instances as usize;

        // Meshes grouped by kind so each kind is one instanced draw.
        let mut mesh_data = Vec::with_capacity(list.meshes.len().min(max));
        let mut mesh_ranges: Vec<(MeshKind, Range<u32>)> = Vec::new();
        for kind in MESH_ORDER {
            let start = mesh_data.len() as u32;
            for m in list.meshes.iter().filter(|m| m.mesh == kind) {
                if mesh_data.len() >= max {
                    break;
                }
                let cols = model_columns(m.model);
                mesh_data.push(MeshInstanceData {
                    model_0: cols[0],
                    model_1: cols[1],
                    model_2: cols[2],
                    model_3: cols[3],
                    color: m.color,
                    params: [m.emissive, 0.0, 0.0, 0.0],
                });
            }
            let end = mesh_data.len() as u32;
            if end > start {
                mesh_ranges.push((kind, start..end));
            }
        }

        // Quads grouped by texture.
        let mut sorted: Vec<_> = list.quads.iter().take(max).collect();
        sorted.sort_by_key(|q| q.texture);
        let mut quad_data = Vec::with_capacity(sorted.len());
        let mut quad_ranges: Vec<(TextureKey, Range<u32>)> = Vec::new();
        for q in &sorted {
            let index = quad_data.len() as u32;
            match quad_ranges.last_mut() {
                Some((key, range)) if *key == q.texture => range.end = index + 1,
                _ => quad_ranges.push((q.texture, index..index + 1)),
            }
            let cols = model_columns(q.model);
            quad_data.push(QuadInstanceData {
                model_0: cols[0],
                model_1: cols[1],
                model_2: cols[2],
                model_3: cols[3],
                uv_rect: q.uv.to_array(),
                tint: q.tint,
                params: [if q.lit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
            });
        }

        let particle_data: Vec<ParticleData> = list
            .particles
            .iter()
            .take(max)
            .map(|p| ParticleData {
                position_size: [p.position.x, p.position.y, p.position.z, p.size],
                color: p.color,
            })
            .collect();

        if list.instance_count() > mesh_data.len() + quad_data.len() + particle_data.len() {
            tracing::warn!(max, "instance limit exceeded, extra instances dropped");
        }

        if !mesh_data.is_empty() {
            queue.write_buffer(&self.mesh_instances, 0, bytemuck::cast_slice(&mesh_data));
        }
        if !quad_data.is_empty() {
            queue.write_buffer(&self.quad_instances, 0, bytemuck::cast_slice(&quad_data));
        }
        if !particle_data.is_empty() {
            queue.write_buffer(
                &self.particle_instances,
                0,
                bytemuck::cast_slice(&particle_data),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = list.clear_color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
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

            if !mesh_ranges.is_empty() {
                pass.set_pipeline(&self.mesh_pipeline);
                pass.set_vertex_buffer(1, self.mesh_instances.slice(..));
                for (kind, range) in mesh_ranges {
                    let Some(mesh) = self.meshes.get(&kind) else {
                        continue;
                    };
                    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                    pass.draw_indexed(0..mesh.index_count, 0, range);
                }
            }

            if !quad_ranges.is_empty() {
                pass.set_pipeline(&self.quad_pipeline);
                pass.set_vertex_buffer(0, self.quad_instances.slice(..));
                for (key, range) in quad_ranges {
                    let bind_group = self.textures.get(&key).unwrap_or(&self.fallback_texture);
                    pass.set_bind_group(1, bind_group, &[]);
                    pass.draw(0..6, range);
                }
            }

            if !particle_data.is_empty() {
                pass.set_pipeline(&self.particle_pipeline);
                pass.set_vertex_buffer(0, self.particle_instances.slice(..));
                pass.draw(0..6, 0..particle_data.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
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
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width: texture.width,
        height: texture.height,
        depth_or_array_layers: 1,
    };
    let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&texture.name),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &gpu_texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &texture.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(texture.width * 4),
            rows_per_image: Some(texture.height),
        },
        size,
    );

    let address_mode = match texture.wrap {
        Wrap::Clamp => wgpu::AddressMode::ClampToEdge,
        Wrap::Repeat => wgpu::AddressMode::Repeat,
    };
    let filter = match texture.filter {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    };
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(&texture.name),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    });
    let view = gpu_texture.create_view(&Default::default());

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&texture.name),
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
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_structs_match_shader_layout() {
        // Uniform blocks are 16-byte aligned; instance strides are whole vec4s.
        assert_eq!(std::mem::size_of::<Uniforms>(), 64 + 8 * 16);
        assert_eq!(std::mem::size_of::<MeshInstanceData>(), 6 * 16);
        assert_eq!(std::mem::size_of::<QuadInstanceData>(), 7 * 16);
        assert_eq!(std::mem::size_of::<ParticleData>(), 2 * 16);
    }

    #[test]
    fn uniforms_carry_light_range() {
        let list = empty_list();
        let u = Uniforms::from_list(&list);
        assert_eq!(u.point_position[3], 15.0);
        assert_eq!(u.eye[3], 1.0);
        assert_eq!(u.camera_right[3], 0.0);
    }

    fn empty_list() -> DrawList {
        DrawList {
            clear_color: [0.0, 0.0, 0.2, 1.0],
            view_proj: Mat4::IDENTITY,
            eye: Vec3::new(0.0, 2.0, 8.0),
            camera_right: Vec3::X,
            camera_up: Vec3::Y,
            lighting: beachfire_render::Lighting {
                point_distance: 15.0,
                ..Default::default()
            },
            meshes: Vec::new(),
            particles: Vec::new(),
            quads: Vec::new(),
        }
    }
}
