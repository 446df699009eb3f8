//! Window-backed [`RenderBackend`] on top of wgpu.
//!
//! Programs are a pair of WGSL modules: the vertex module exports `vs_main`
//! and the fragment module exports `fs_main`. All programs share a single
//! uniform block laid out as [`TransformUniform`].

use crate::backend::{
    check_vertex_count, BufferHandle, Primitive, ProgramHandle, RenderBackend, Uniforms, FRAGMENT_ENTRY_POINT,
    VERTEX_ENTRY_POINT,
};
use crate::error::{CompileError, Result, ShaderStage, ViewerError};
use crate::gpu::GpuContext;
use crate::transform::DepthRange;
use glam::Mat4;
use std::sync::Arc;
use winit::window::Window;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Clip-space depth convention for matrices fed to this backend.
pub const WGPU_DEPTH_RANGE: DepthRange = DepthRange::ZeroToOne;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub elapsed: f32,
    _padding: [f32; 3],
}

impl TransformUniform {
    /// Packs named uniforms, accepting the short names some demos use.
    /// Missing matrices fall back to identity.
    pub fn from_uniforms(uniforms: &Uniforms) -> Self {
        let matrix = |names: &[&str]| uniforms.matrix(names).unwrap_or(Mat4::IDENTITY).to_cols_array_2d();
        Self {
            projection: matrix(&["projection", "proj"]),
            view: matrix(&["view"]),
            model: matrix(&["model", "transform"]),
            elapsed: uniforms.scalar("elapsed").unwrap_or(0.0),
            _padding: [0.0; 3],
        }
    }
}

struct ProgramPipelines {
    triangles: wgpu::RenderPipeline,
    lines: wgpu::RenderPipeline,
}

impl ProgramPipelines {
    fn for_primitive(&self, primitive: Primitive) -> &wgpu::RenderPipeline {
        match primitive {
            Primitive::Triangles => &self.triangles,
            Primitive::Lines => &self.lines,
        }
    }
}

pub struct WgpuBackend {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    pipeline_layout: wgpu::PipelineLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    buffers: Vec<(wgpu::Buffer, u32)>,
    programs: Vec<ProgramPipelines>,
}

impl WgpuBackend {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let (gpu, surface) = GpuContext::for_window(window).await?;

        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);

        let depth_view = Self::create_depth_view(&gpu, &config);
        let bind_group_layout = Self::create_bind_group_layout(&gpu);
        let pipeline_layout = gpu.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Transform Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let uniform_buffer = gpu.create_buffer_init(
            "Transform Uniform Buffer",
            bytemuck::cast_slice(&[TransformUniform::from_uniforms(&Uniforms::new())]),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            gpu,
            surface,
            config,
            depth_view,
            pipeline_layout,
            uniform_buffer,
            bind_group,
            buffers: Vec::new(),
            programs: Vec::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.gpu.device, &self.config);
            self.depth_view = Self::create_depth_view(&self.gpu, &self.config);
        }
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn create_depth_view(gpu: &GpuContext, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
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

    fn create_bind_group_layout(gpu: &GpuContext) -> wgpu::BindGroupLayout {
        gpu.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Bind Group Layout"),
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
        })
    }

    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: 6 * 4, // 3 position + 3 color floats
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 3 * 4,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }

    /// Runs `build` inside a validation error scope and reports any error for `stage`.
    fn validated<T>(&self, stage: ShaderStage, build: impl FnOnce() -> T) -> std::result::Result<T, CompileError> {
        self.gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = build();
        match pollster::block_on(self.gpu.device.pop_error_scope()) {
            Some(error) => Err(CompileError::new(stage, error.to_string())),
            None => Ok(value),
        }
    }

    fn create_shader(&self, label: &str, source: &str, stage: ShaderStage) -> std::result::Result<wgpu::ShaderModule, CompileError> {
        self.validated(stage, || {
            self.gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        })
    }

    fn create_render_pipeline(
        &self,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        self.gpu.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Transform Pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: vertex,
                entry_point: VERTEX_ENTRY_POINT,
                buffers: &[Self::vertex_buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: FRAGMENT_ENTRY_POINT,
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
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
        })
    }
}

impl RenderBackend for WgpuBackend {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle {
        let handle = BufferHandle(self.buffers.len() as u32);
        let buffer = self.gpu.create_buffer_init(
            &format!("Vertex Buffer {}", handle.0),
            bytemuck::cast_slice(data),
            wgpu::BufferUsages::VERTEX,
        );
        let vertex_count = (data.len() / crate::backend::VERTEX_STRIDE_FLOATS) as u32;
        self.buffers.push((buffer, vertex_count));
        handle
    }

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> std::result::Result<ProgramHandle, CompileError> {
        let vertex = self.create_shader("Vertex Shader", vertex_source, ShaderStage::Vertex)?;
        let fragment = self.create_shader("Fragment Shader", fragment_source, ShaderStage::Fragment)?;

        let pipelines = self.validated(ShaderStage::Link, || ProgramPipelines {
            triangles: self.create_render_pipeline(&vertex, &fragment, wgpu::PrimitiveTopology::TriangleList),
            lines: self.create_render_pipeline(&vertex, &fragment, wgpu::PrimitiveTopology::LineList),
        })?;

        let handle = ProgramHandle(self.programs.len() as u32);
        self.programs.push(pipelines);
        log::debug!("compiled program {:?}", handle);
        Ok(handle)
    }

    /// Renders one complete frame: clear, a single draw, present.
    fn draw(
        &mut self,
        program: ProgramHandle,
        buffer: BufferHandle,
        uniforms: &Uniforms,
        primitive: Primitive,
        vertex_count: u32,
    ) -> Result<()> {
        let pipelines = self
            .programs
            .get(program.0 as usize)
            .ok_or_else(|| ViewerError::Backend(format!("unknown program {:?}", program)))?;
        let (vertex_buffer, available) = self
            .buffers
            .get(buffer.0 as usize)
            .ok_or_else(|| ViewerError::Backend(format!("unknown buffer {:?}", buffer)))?;
        check_vertex_count(vertex_count, *available)?;

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.surface.configure(&self.gpu.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(ViewerError::Backend(e.to_string())),
        };
        let surface_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let uniform = TransformUniform::from_uniforms(uniforms);
        self.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
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

            render_pass.set_pipeline(pipelines.for_primitive(primitive));
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.draw(0..vertex_count, 0..1);
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_matches_wgsl_layout() {
        // Three mat4x4<f32> plus an f32 rounded up to 16-byte alignment.
        assert_eq!(std::mem::size_of::<TransformUniform>(), 3 * 64 + 16);
    }

    #[test]
    fn short_uniform_names_are_accepted() {
        let translation = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let mut uniforms = Uniforms::new();
        uniforms.set_matrix("proj", translation).set_matrix("transform", translation);

        let packed = TransformUniform::from_uniforms(&uniforms);
        assert_eq!(packed.projection, translation.to_cols_array_2d());
        assert_eq!(packed.model, translation.to_cols_array_2d());
        assert_eq!(packed.view, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(packed.elapsed, 0.0);
    }
}
