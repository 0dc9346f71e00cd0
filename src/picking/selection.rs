use super::PixelInfo;

/// A resolved pick: which placement, which submesh, which triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// 0-based placement index.
    pub object: usize,
    /// Submesh index.
    pub draw: u32,
    /// Triangle within the submesh, if the adapter reported it.
    pub primitive: Option<u32>,
}

impl Selection {
    /// Interpret a texel. Background texels select nothing.
    #[must_use]
    pub fn resolve(pixel: PixelInfo) -> Option<Self> {
        let object = pixel.object_id.checked_sub(1)?;
        Some(Self {
            object: object as usize,
            draw: pixel.draw_id,
            primitive: pixel.prim_id.checked_sub(1),
        })
    }

    /// `(draw, primitive)` when a triangle can be highlighted.
    #[must_use]
    pub fn triangle(&self) -> Option<(u32, u32)> {
        self.primitive.map(|prim| (self.draw, prim))
    }
}
