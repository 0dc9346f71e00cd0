use crate::error::PickviewError;

/// Bytes in one `Rgba32Uint` texel.
pub const TEXEL_BYTES: usize = 16;

/// Contents of one ID-framebuffer texel.
///
/// All-zero is the cleared background.
#[repr(C)]
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
pub struct PixelInfo {
    /// 1-based object index, 0 for background.
    pub object_id: u32,
    /// Submesh (draw call) index within the object.
    pub draw_id: u32,
    /// Primitive index + 1 within the draw call, 0 if unknown.
    pub prim_id: u32,
}

impl PixelInfo {
    /// Decode the first three little-endian `u32` channels of a texel. The
    /// fourth channel is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::Readback`] if `bytes` is shorter than a
    /// texel.
    pub fn from_texel(bytes: &[u8]) -> Result<Self, PickviewError> {
        if bytes.len() < TEXEL_BYTES {
            return Err(PickviewError::Readback(format!(
                "texel has {} bytes, expected {TEXEL_BYTES}",
                bytes.len()
            )));
        }
        let channel = |i: usize| {
            u32::from_le_bytes([
                bytes[i * 4],
                bytes[i * 4 + 1],
                bytes[i * 4 + 2],
                bytes[i * 4 + 3],
            ])
        };
        Ok(Self {
            object_id: channel(0),
            draw_id: channel(1),
            prim_id: channel(2),
        })
    }

    /// Whether no object covers this texel.
    #[must_use]
    pub fn is_background(&self) -> bool {
        self.object_id == 0
    }
}
