//! Fixed-capacity vertex buffer owned by a trail.

use std::mem::size_of;
use std::sync::Arc;

use sweepline_platform::{BufferDescriptor, BufferId, DeviceError, GpuDevice};
use tracing::{info, warn};

use crate::error::TrailError;
use crate::segment::TrailVertex;

const VERTEX_STRIDE: usize = size_of::<TrailVertex>();

/// A device vertex buffer sized once at creation. The buffer is destroyed
/// when the pool is dropped.
pub struct GpuVertexPool {
    device: Arc<dyn GpuDevice>,
    buffer: BufferId,
    max_vertex_count: u32,
}

impl GpuVertexPool {
    pub fn new(
        device: Arc<dyn GpuDevice>,
        label: &str,
        max_vertex_count: u32,
    ) -> Result<Self, TrailError> {
        if max_vertex_count == 0 {
            return Err(TrailError::ZeroCapacity);
        }
        let byte_capacity = Self::bytes_for(max_vertex_count);
        let buffer = device.create_buffer(&BufferDescriptor::dynamic_vertex(label, byte_capacity))?;
        let pool = Self {
            device,
            buffer,
            max_vertex_count,
        };
        info!(
            label,
            max_vertex_count,
            byte_capacity = pool.byte_capacity(),
            "vertex pool created"
        );
        Ok(pool)
    }

    fn bytes_for(vertex_count: u32) -> u64 {
        u64::from(vertex_count) * VERTEX_STRIDE as u64
    }

    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    pub fn max_vertex_count(&self) -> u32 {
        self.max_vertex_count
    }

    pub fn byte_capacity(&self) -> u64 {
        Self::bytes_for(self.max_vertex_count)
    }

    /// Maps the buffer with discard semantics and lets `fill` stream vertices
    /// into it. The mapping is released on every exit path. Returns the number
    /// of vertices written.
    pub fn write_frame<F>(&self, fill: F) -> Result<u32, DeviceError>
    where
        F: FnOnce(&mut VertexWriter<'_>),
    {
        let mut mapping = self.device.map_write_discard(self.buffer)?;
        let mut writer = VertexWriter::new(mapping.bytes_mut(), self.max_vertex_count);
        fill(&mut writer);
        Ok(writer.written())
    }
}

impl Drop for GpuVertexPool {
    fn drop(&mut self) {
        if let Err(err) = self.device.destroy_buffer(self.buffer) {
            warn!(buffer = ?self.buffer, %err, "failed to release vertex pool");
        }
    }
}

impl std::fmt::Debug for GpuVertexPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuVertexPool")
            .field("buffer", &self.buffer)
            .field("max_vertex_count", &self.max_vertex_count)
            .finish()
    }
}

/// Appends vertices at increasing offsets into a mapped buffer.
pub struct VertexWriter<'a> {
    bytes: &'a mut [u8],
    written: u32,
    capacity: u32,
}

impl<'a> VertexWriter<'a> {
    fn new(bytes: &'a mut [u8], max_vertex_count: u32) -> Self {
        let mapped_vertices = u32::try_from(bytes.len() / VERTEX_STRIDE).unwrap_or(u32::MAX);
        Self {
            bytes,
            written: 0,
            capacity: max_vertex_count.min(mapped_vertices),
        }
    }

    pub fn written(&self) -> u32 {
        self.written
    }

    pub fn remaining(&self) -> u32 {
        self.capacity - self.written
    }

    /// Writes all of `vertices` or nothing. Returns `false` when they do not fit.
    pub fn push_slice(&mut self, vertices: &[TrailVertex]) -> bool {
        let Ok(count) = u32::try_from(vertices.len()) else {
            return false;
        };
        if count > self.remaining() {
            return false;
        }
        let start = self.written as usize * VERTEX_STRIDE;
        let end = start + vertices.len() * VERTEX_STRIDE;
        self.bytes[start..end].copy_from_slice(bytemuck::cast_slice(vertices));
        self.written += count;
        true
    }
}
