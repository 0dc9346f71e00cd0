//! Shared wgpu boilerplate helpers for mesh pipelines.

use crate::gpu::texture::DEPTH_FORMAT;
use crate::mesh::Vertex;

/// Vertex+fragment-visible uniform buffer binding without dynamic offset.
pub fn uniform_buffer(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Fixed-function state that differs between mesh pipelines.
pub struct MeshPipelineDesc<'a> {
    /// Pipeline label prefix.
    pub label: &'a str,
    /// Color target format.
    pub format: wgpu::TextureFormat,
    /// Blend state of the color target.
    pub blend: Option<wgpu::BlendState>,
    /// Depth comparison function.
    pub depth_compare: wgpu::CompareFunction,
    /// Depth bias (pulls coplanar overlays toward the camera when negative).
    pub depth_bias: wgpu::DepthBiasState,
    /// Face culling.
    pub cull_mode: Option<wgpu::Face>,
}

impl Default for MeshPipelineDesc<'_> {
    fn default() -> Self {
        Self {
            label: "Mesh",
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            blend: None,
            depth_compare: wgpu::CompareFunction::Less,
            depth_bias: wgpu::DepthBiasState::default(),
            cull_mode: Some(wgpu::Face::Back),
        }
    }
}

/// Create a triangle-list pipeline over [`Vertex`] buffers with
/// `vs_main` / `fs_main` entry points, one color target, and a depth
/// attachment in [`DEPTH_FORMAT`].
pub fn create_mesh_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    desc: &MeshPipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", desc.label)),
            bind_group_layouts,
            push_constant_ranges: &[],
        });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", desc.label)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: desc.depth_bias,
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
