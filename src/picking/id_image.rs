//! CPU stand-in for the ID framebuffer: depth-tested rectangles of
//! `PixelInfo`, read back with the same bounds rules as the GPU texture.

use super::{PixelInfo, RowOrigin};
use crate::error::PickviewError;

pub(super) struct IdImage {
    width: u32,
    height: u32,
    origin: RowOrigin,
    ids: Vec<PixelInfo>,
    depth: Vec<f32>,
}

impl IdImage {
    /// Cleared to background and far depth.
    pub(super) fn new(width: u32, height: u32, origin: RowOrigin) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            origin,
            ids: vec![PixelInfo::default(); len],
            depth: vec![1.0; len],
        }
    }

    pub(super) fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(super) fn origin(&self) -> RowOrigin {
        self.origin
    }

    /// Rasterize the framebuffer rectangle `[min, max)` at constant depth,
    /// keeping fragments that pass a `Less` test.
    pub(super) fn fill_rect(
        &mut self,
        (x0, y0): (u32, u32),
        (x1, y1): (u32, u32),
        depth: f32,
        pixel: PixelInfo,
    ) {
        for y in y0..y1.min(self.height) {
            for x in x0..x1.min(self.width) {
                let i = (y * self.width + x) as usize;
                if depth < self.depth[i] {
                    self.depth[i] = depth;
                    self.ids[i] = pixel;
                }
            }
        }
    }

    pub(super) fn read_pixel(
        &self,
        x: u32,
        y: u32,
    ) -> Result<PixelInfo, PickviewError> {
        if x >= self.width || y >= self.height {
            return Err(PickviewError::OutOfBounds {
                x: i64::from(x),
                y: i64::from(y),
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.ids[(y * self.width + x) as usize])
    }
}
