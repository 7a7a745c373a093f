//! Device abstraction traits so `sweepline-core` stays backend-agnostic.
//!
//! A backend only has to hand out fixed-size vertex buffers and a scoped,
//! write-discard mapping over them. [`HeadlessDevice`] keeps everything in
//! CPU memory and is what the tests and the demo driver run against.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod headless;

pub use headless::HeadlessDevice;

pub type Result<T> = std::result::Result<T, DeviceError>;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("buffer creation failed for '{label}': {reason}")]
    BufferCreation { label: String, reason: String },
    #[error("buffer size must be non-zero")]
    ZeroSize,
    #[error("unknown buffer {0:?}")]
    UnknownBuffer(BufferId),
    #[error("buffer {0:?} is already mapped")]
    AlreadyMapped(BufferId),
    #[error("buffer {0:?} was not created with MAP_WRITE usage")]
    NotMappable(BufferId),
    #[error("failed to map buffer {id:?}: {reason}")]
    MapFailed { id: BufferId, reason: String },
}

/// Allowed usages of a buffer, combined with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferUsage(u32);

impl BufferUsage {
    /// Bindable as a vertex buffer.
    pub const VERTEX: Self = Self(1 << 0);
    /// Writable from the CPU through [`GpuDevice::map_write_discard`].
    pub const MAP_WRITE: Self = Self(1 << 1);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for BufferUsage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferDescriptor {
    pub label: Option<String>,
    /// Total size in bytes. Immutable once the buffer exists.
    pub size: u64,
    pub usage: BufferUsage,
}

impl BufferDescriptor {
    /// A CPU-writable, GPU-read-only vertex buffer of `size` bytes.
    pub fn dynamic_vertex(label: impl Into<String>, size: u64) -> Self {
        Self {
            label: Some(label.into()),
            size,
            usage: BufferUsage::VERTEX | BufferUsage::MAP_WRITE,
        }
    }
}

/// Opaque handle to a buffer owned by a [`GpuDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferId(pub u64);

/// Writable view over a mapped buffer. Dropping it unmaps the buffer.
pub trait MappedBuffer {
    fn bytes_mut(&mut self) -> &mut [u8];
}

/// Allocation and upload capability of a rendering device.
pub trait GpuDevice: Send + Sync {
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId>;

    fn destroy_buffer(&self, id: BufferId) -> Result<()>;

    /// Maps the whole buffer for writing. Previous contents are discarded and
    /// the mapping is released when the returned guard is dropped.
    fn map_write_discard(&self, id: BufferId) -> Result<Box<dyn MappedBuffer + '_>>;
}
