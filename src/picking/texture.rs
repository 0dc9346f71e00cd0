use std::sync::mpsc;

use super::{PixelInfo, RowOrigin, TEXEL_BYTES};
use crate::error::PickviewError;
use crate::gpu::texture::RenderTarget;

/// Texel format of the ID framebuffer. The alpha channel is written 0.
pub const ID_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Uint;

/// A one-texel copy still has to honor the row-pitch alignment.
const STAGING_SIZE: u64 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64;

/// Offscreen ID framebuffer: an `Rgba32Uint` color target, its depth
/// buffer, and a staging buffer for single-texel readback.
pub struct PickingTexture {
    ids: RenderTarget,
    depth: RenderTarget,
    staging: wgpu::Buffer,
}

/// Reject extents wgpu cannot allocate as attachments.
fn check_extent(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> Result<(), PickviewError> {
    let max = device.limits().max_texture_dimension_2d;
    let status = if width == 0 || height == 0 {
        format!("zero-sized attachment {width}x{height}")
    } else if width > max || height > max {
        format!("attachment {width}x{height} exceeds the {max} texel limit")
    } else {
        return Ok(());
    };
    Err(PickviewError::RenderResource {
        resource: "picking framebuffer",
        status,
    })
}

impl PickingTexture {
    /// Row order of texel coordinates passed to
    /// [`read_pixel`](Self::read_pixel).
    pub const ORIGIN: RowOrigin = RowOrigin::TopLeft;

    /// Allocate the ID and depth attachments at `width x height`.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::RenderResource`] if the extent is empty or
    /// larger than the device allows.
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> Result<Self, PickviewError> {
        check_extent(device, width, height)?;
        let (ids, depth) = Self::attachments(device, width, height);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Picking Staging Buffer"),
            size: STAGING_SIZE,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        log::debug!("picking framebuffer {width}x{height}");
        Ok(Self {
            ids,
            depth,
            staging,
        })
    }

    fn attachments(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> (RenderTarget, RenderTarget) {
        let ids = RenderTarget::new(
            device,
            "Picking Texture",
            (width, height),
            ID_FORMAT,
            wgpu::TextureUsages::COPY_SRC,
        );
        let depth =
            RenderTarget::depth(device, "Picking Depth Texture", (width, height));
        (ids, depth)
    }

    /// Reallocate both attachments if the size changed.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::RenderResource`] for an unusable extent; the
    /// previous attachments are kept.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> Result<(), PickviewError> {
        if (width, height) == self.extent() {
            return Ok(());
        }
        check_extent(device, width, height)?;
        (self.ids, self.depth) = Self::attachments(device, width, height);
        log::debug!("picking framebuffer resized to {width}x{height}");
        Ok(())
    }

    /// Framebuffer width in texels.
    pub fn width(&self) -> u32 {
        self.ids.width()
    }

    /// Framebuffer height in texels.
    pub fn height(&self) -> u32 {
        self.ids.height()
    }

    /// `(width, height)`.
    pub fn extent(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Begin the ID pass: color cleared to 0, depth cleared to 1.0. Draws
    /// recorded on the returned pass land in the ID framebuffer.
    pub fn enable_writing<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Picking Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.ids.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        })
    }

    /// End the ID pass. Passes begun afterwards render to whatever target
    /// they name, normally the surface.
    pub fn disable_writing(pass: wgpu::RenderPass<'_>) {
        drop(pass);
    }

    /// Read the texel at `(x, y)` in [`ORIGIN`](Self::ORIGIN) row order,
    /// blocking until the GPU has finished every submitted pass.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::OutOfBounds`] before touching the GPU if
    /// `x >= width` or `y >= height`, and [`PickviewError::Readback`] if
    /// mapping the staging buffer fails.
    pub fn read_pixel(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        x: u32,
        y: u32,
    ) -> Result<PixelInfo, PickviewError> {
        let (width, height) = self.extent();
        if x >= width || y >= height {
            return Err(PickviewError::OutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
                width,
                height,
            });
        }

        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Picking Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.ids.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(STAGING_SIZE as u32),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let _ = queue.submit(std::iter::once(encoder.finish()));

        let slice = self.staging.slice(..TEXEL_BYTES as u64);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| PickviewError::Readback(e.to_string()))?;
        rx.recv()
            .map_err(|e| PickviewError::Readback(e.to_string()))?
            .map_err(|e| PickviewError::Readback(e.to_string()))?;

        let pixel = PixelInfo::from_texel(&slice.get_mapped_range());
        self.staging.unmap();
        pixel
    }
}
