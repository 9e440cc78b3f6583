//! Lit mesh rendering pass with depth testing.
//!
//! [`MeshPass`] owns the uploaded mesh library and draws every node of a
//! [`Scene`] that carries a [`MeshId`]. Shading is Lambert diffuse from the
//! scene's directional light plus its ambient term, applied to the
//! material's base color times its base color texture.
//!
//! # Architecture
//!
//! The pass uses three bind groups:
//! - **Group 0**: Scene uniforms (view-projection, camera position, lights)
//! - **Group 1**: Model uniforms (model matrix, normal matrix, color), one
//!   slot per draw in a dynamically offset buffer
//! - **Group 2**: Base color texture and sampler, per mesh, with a 1x1
//!   white texture for untextured materials
//!
//! # Culling
//!
//! Single-sided materials cull back faces and double-sided ones cull
//! nothing. Nodes with a mirroring world transform cull front faces
//! instead, since the mirror reverses their winding.
//!
//! # Depth Buffer
//!
//! The pass keeps its own `Depth32Float` buffer and recreates it whenever the
//! surface size changes.

use crate::camera::Camera;
use crate::geometry::{Material, RawGeometry};
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex3d};
use crate::scene::{MeshId, Scene, WorldTransform};
use crate::texture::Texture;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_MODEL_SLOTS: usize = 16;

/// Per-frame scene uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// Ambient color premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Directional light color premultiplied by intensity.
    pub sun_color: [f32; 4],
    /// Unit vector toward the directional light.
    pub sun_direction: [f32; 4],
}

impl SceneUniforms {
    pub fn new(scene: &Scene, camera: &Camera) -> Self {
        let lighting = &scene.lighting;
        let [ar, ag, ab] = lighting.ambient.scaled_rgb(lighting.ambient_intensity);
        let [sr, sg, sb] = lighting.sun.scaled_rgb(lighting.sun_intensity);
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            ambient: [ar, ag, ab, 1.0],
            sun_color: [sr, sg, sb, 1.0],
            sun_direction: lighting.sun_direction().extend(0.0).to_array(),
        }
    }
}

/// Per-draw model uniforms.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    /// Model matrix (object to world space transformation).
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals under non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// Which faces a draw discards.
fn cull_mode(double_sided: bool, mirrored: bool) -> Option<wgpu::Face> {
    match (double_sided, mirrored) {
        (true, _) => None,
        (false, false) => Some(wgpu::Face::Back),
        (false, true) => Some(wgpu::Face::Front),
    }
}

/// The lit pipeline built once per cull mode.
struct Pipelines {
    no_cull: wgpu::RenderPipeline,
    cull_back: wgpu::RenderPipeline,
    cull_front: wgpu::RenderPipeline,
}

impl Pipelines {
    fn get(&self, cull: Option<wgpu::Face>) -> &wgpu::RenderPipeline {
        match cull {
            None => &self.no_cull,
            Some(wgpu::Face::Back) => &self.cull_back,
            Some(wgpu::Face::Front) => &self.cull_front,
        }
    }
}

/// An uploaded mesh and its material.
struct MeshEntry {
    mesh: Mesh,
    color: [f32; 4],
    double_sided: bool,
    /// `None` draws with the default white texture.
    texture_bind_group: Option<wgpu::BindGroup>,
}

/// Draws scenes into a color target with depth testing.
pub struct MeshPass {
    pipelines: Pipelines,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_stride: u64,
    model_slots: usize,
    texture_layout: wgpu::BindGroupLayout,
    default_texture_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    meshes: Vec<MeshEntry>,
}

impl MeshPass {
    /// Build the pipelines and an empty mesh library for the surface format.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        // Scene uniform buffer (group 0)
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
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

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        // Model uniform buffer (group 1), one aligned slot per draw
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let model_stride = (std::mem::size_of::<ModelUniforms>() as u64).div_ceil(alignment)
            * alignment;
        let (model_buffer, model_bind_group) =
            Self::create_model_slots(device, &model_layout, model_stride, INITIAL_MODEL_SLOTS);

        // Texture bind group layout (group 2)
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
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
        let default_texture_bind_group =
            Self::create_texture_bind_group(device, &texture_layout, &Texture::white(gpu));

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &model_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |label: &str, cull: Option<wgpu::Face>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: cull,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };
        let pipelines = Pipelines {
            no_cull: pipeline("Mesh Pipeline (double-sided)", None),
            cull_back: pipeline("Mesh Pipeline", Some(wgpu::Face::Back)),
            cull_front: pipeline("Mesh Pipeline (mirrored)", Some(wgpu::Face::Front)),
        };

        let depth_view = Self::create_depth_view(gpu);

        Self {
            pipelines,
            scene_buffer,
            scene_bind_group,
            model_layout,
            model_buffer,
            model_bind_group,
            model_stride,
            model_slots: INITIAL_MODEL_SLOTS,
            texture_layout,
            default_texture_bind_group,
            depth_view,
            depth_size: gpu.size(),
            meshes: Vec::new(),
        }
    }

    fn create_texture_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    fn create_model_slots(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
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

    /// Recreate the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != gpu.size() {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = gpu.size();
        }
    }

    fn ensure_model_slots(&mut self, device: &wgpu::Device, needed: usize) {
        if needed <= self.model_slots {
            return;
        }
        let slots = needed.next_power_of_two();
        let (buffer, bind_group) =
            Self::create_model_slots(device, &self.model_layout, self.model_stride, slots);
        self.model_buffer = buffer;
        self.model_bind_group = bind_group;
        self.model_slots = slots;
    }

    /// Upload geometry and its material into the mesh library.
    pub fn upload(
        &mut self,
        gpu: &GpuContext,
        label: &str,
        geometry: &RawGeometry,
        material: &Material,
    ) -> MeshId {
        let mesh = Mesh::new(gpu, label, &geometry.vertices, &geometry.indices);

        let texture_bind_group = material
            .base_color_texture
            .as_deref()
            .filter(|image| image.width > 0 && image.height > 0)
            .map(|image| {
                let texture = Texture::from_image(gpu, image, &format!("{label} Base Color"));
                Self::create_texture_bind_group(&gpu.device, &self.texture_layout, &texture)
            });

        self.meshes.push(MeshEntry {
            mesh,
            color: material.base_color,
            double_sided: material.double_sided,
            texture_bind_group,
        });
        MeshId::new(self.meshes.len() - 1)
    }

    /// Clear `target` to the scene's background and draw its meshes.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        target: &wgpu::TextureView,
        scene: &Scene,
        camera: &Camera,
    ) {
        self.ensure_depth_size(gpu);

        let draws: Vec<(MeshId, ModelUniforms, Option<wgpu::Face>)> = scene
            .graph
            .world()
            .query::<(&WorldTransform, &MeshId)>()
            .iter()
            .filter_map(|(_, (world, mesh))| {
                let entry = self.meshes.get(mesh.index())?;
                let uniforms = ModelUniforms {
                    model: world.0.to_cols_array_2d(),
                    normal_matrix: world.0.inverse().transpose().to_cols_array_2d(),
                    color: entry.color,
                };
                let cull = cull_mode(entry.double_sided, world.0.determinant() < 0.0);
                Some((*mesh, uniforms, cull))
            })
            .collect();

        gpu.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::cast_slice(&[SceneUniforms::new(scene, camera)]),
        );

        if !draws.is_empty() {
            self.ensure_model_slots(&gpu.device, draws.len());
            let stride = self.model_stride as usize;
            let mut bytes = vec![0u8; stride * draws.len()];
            for (i, (_, uniforms, _)) in draws.iter().enumerate() {
                let raw = bytemuck::bytes_of(uniforms);
                bytes[i * stride..i * stride + raw.len()].copy_from_slice(raw);
            }
            gpu.queue.write_buffer(&self.model_buffer, 0, &bytes);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Mesh Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);

            for (i, (mesh_id, _, cull)) in draws.iter().enumerate() {
                let entry = &self.meshes[mesh_id.index()];
                let mesh = &entry.mesh;
                let offset = (i as u64 * self.model_stride) as u32;
                render_pass.set_pipeline(self.pipelines.get(*cull));
                render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
                render_pass.set_bind_group(
                    2,
                    entry
                        .texture_bind_group
                        .as_ref()
                        .unwrap_or(&self.default_texture_bind_group),
                    &[],
                );
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cull_mode_follows_material_and_winding() {
        assert_eq!(cull_mode(true, false), None);
        assert_eq!(cull_mode(true, true), None);
        assert_eq!(cull_mode(false, false), Some(wgpu::Face::Back));
        assert_eq!(cull_mode(false, true), Some(wgpu::Face::Front));
    }

    #[test]
    fn model_uniforms_match_shader_layout() {
        // Two mat4x4 plus one vec4.
        assert_eq!(std::mem::size_of::<ModelUniforms>(), 144);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 128);
    }
}
