//! Render-target texture abstraction.

/// A render-target texture and its default view.
///
/// Every attachment in the crate (the picking ID buffer, its depth buffer,
/// the main pass depth buffer) is one of these.
pub struct RenderTarget {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
    /// Texel format.
    pub format: wgpu::TextureFormat,
}

impl RenderTarget {
    /// Create a new render-target texture with the given dimensions and
    /// format. `RENDER_ATTACHMENT` is always included in `usage`.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: usage | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            format,
        }
    }

    /// Depth attachment used by both the picking and the main pass.
    #[must_use]
    pub fn depth(
        device: &wgpu::Device,
        label: &str,
        size: (u32, u32),
    ) -> Self {
        Self::new(
            device,
            label,
            size,
            DEPTH_FORMAT,
            wgpu::TextureUsages::empty(),
        )
    }

    /// Texture width in texels.
    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    /// Texture height in texels.
    pub fn height(&self) -> u32 {
        self.texture.height()
    }
}

/// Depth format shared by every pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
