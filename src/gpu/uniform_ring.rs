//! Per-draw uniform storage addressed with dynamic offsets.
//!
//! Every draw in a frame gets its own aligned slot, so uniform writes queued
//! before the pass is submitted never overwrite one another. The buffer
//! grows 2x when a frame needs more slots than it holds, and never shrinks.

use std::marker::PhantomData;

use crate::error::PickviewError;

/// Slots allocated up front.
const INITIAL_SLOTS: usize = 16;

/// Distance in bytes between consecutive slots for an item of `item_size`
/// bytes, given the device's `min_uniform_buffer_offset_alignment`.
#[must_use]
pub fn slot_stride(item_size: u64, alignment: u64) -> u64 {
    wgpu::util::align_to(item_size.max(1), alignment.max(1))
}

/// Dynamic-offset uniform buffer holding one `T` per draw.
pub struct UniformRing<T> {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
    len: usize,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> UniformRing<T> {
    /// Ring visible to the given shader stages, bound at binding 0 of its
    /// own bind group.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        visibility: wgpu::ShaderStages,
    ) -> Self {
        let stride = slot_stride(
            size_of::<T>() as u64,
            u64::from(device.limits().min_uniform_buffer_offset_alignment),
        );
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} Layout")),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            size_of::<T>() as u64,
                        ),
                    },
                    count: None,
                }],
            });
        let (buffer, bind_group) =
            Self::allocate(device, &layout, label, stride, INITIAL_SLOTS);

        Self {
            buffer,
            layout,
            bind_group,
            stride,
            capacity: INITIAL_SLOTS,
            len: 0,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * slots as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(
                        size_of::<T>() as u64,
                    ),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Reset the write cursor and make room for `slots` draws.
    ///
    /// Returns `true` if the buffer was reallocated.
    pub fn begin_frame(&mut self, device: &wgpu::Device, slots: usize) -> bool {
        self.len = 0;
        if slots <= self.capacity {
            return false;
        }

        let new_capacity = (slots * 2).max(self.capacity + INITIAL_SLOTS);
        let (buffer, bind_group) = Self::allocate(
            device,
            &self.layout,
            &self.label,
            self.stride,
            new_capacity,
        );
        self.buffer = buffer;
        self.bind_group = bind_group;
        self.capacity = new_capacity;
        log::debug!("{}: grew to {new_capacity} slots", self.label);
        true
    }

    /// Queue `value` into the next free slot and return its dynamic offset.
    ///
    /// # Errors
    ///
    /// Returns [`PickviewError::InvalidArgument`] when more draws are pushed
    /// than were reserved by [`begin_frame`](Self::begin_frame).
    pub fn push(
        &mut self,
        queue: &wgpu::Queue,
        value: &T,
    ) -> Result<u32, PickviewError> {
        if self.len >= self.capacity {
            return Err(PickviewError::InvalidArgument(format!(
                "{}: {} slots reserved, draw {} pushed",
                self.label,
                self.capacity,
                self.len + 1
            )));
        }
        let offset = self.stride * self.len as u64;
        queue.write_buffer(&self.buffer, offset, bytemuck::bytes_of(value));
        self.len += 1;
        Ok(offset as u32)
    }

    /// Bind the ring at `group` with the slot starting at `offset`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, group: u32, offset: u32) {
        pass.set_bind_group(group, &self.bind_group, &[offset]);
    }

    /// Layout for pipeline creation.
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Slots written since the last [`begin_frame`](Self::begin_frame).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no slot has been written this frame.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slots available before the next reallocation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
