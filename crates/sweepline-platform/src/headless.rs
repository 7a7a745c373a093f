//! CPU-memory device. Buffers are plain byte vectors; mapping moves the bytes
//! into the guard and hands them back on drop.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::{
    BufferDescriptor, BufferId, BufferUsage, DeviceError, GpuDevice, MappedBuffer, Result,
};

#[derive(Debug)]
struct HeadlessBuffer {
    label: String,
    usage: BufferUsage,
    bytes: Vec<u8>,
    mapped: bool,
}

#[derive(Debug, Default)]
struct State {
    buffers: HashMap<BufferId, HeadlessBuffer>,
    next_id: u64,
    pending_map_failures: usize,
    fail_creation: bool,
    maps: usize,
    unmaps: usize,
}

#[derive(Debug, Default)]
pub struct HeadlessDevice {
    state: Mutex<State>,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes the next `count` calls to `map_write_discard` fail.
    pub fn fail_next_maps(&self, count: usize) {
        self.state().pending_map_failures = count;
    }

    pub fn set_fail_buffer_creation(&self, fail: bool) {
        self.state().fail_creation = fail;
    }

    /// Copy of the buffer contents, or `None` if the id is unknown or mapped.
    pub fn read_buffer(&self, id: BufferId) -> Option<Vec<u8>> {
        let state = self.state();
        let buffer = state.buffers.get(&id)?;
        if buffer.mapped {
            return None;
        }
        Some(buffer.bytes.clone())
    }

    pub fn live_buffer_count(&self) -> usize {
        self.state().buffers.len()
    }

    pub fn is_mapped(&self, id: BufferId) -> bool {
        self.state().buffers.get(&id).is_some_and(|b| b.mapped)
    }

    pub fn map_count(&self) -> usize {
        self.state().maps
    }

    pub fn unmap_count(&self) -> usize {
        self.state().unmaps
    }
}

impl GpuDevice for HeadlessDevice {
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId> {
        let label = descriptor.label.clone().unwrap_or_default();
        if descriptor.size == 0 {
            return Err(DeviceError::ZeroSize);
        }
        let mut state = self.state();
        if state.fail_creation {
            return Err(DeviceError::BufferCreation {
                label,
                reason: "allocation refused".into(),
            });
        }
        let size = usize::try_from(descriptor.size).map_err(|_| DeviceError::BufferCreation {
            label: label.clone(),
            reason: format!("{} bytes exceeds addressable memory", descriptor.size),
        })?;
        let id = BufferId(state.next_id);
        state.next_id += 1;
        info!(?id, %label, size, "headless buffer created");
        state.buffers.insert(
            id,
            HeadlessBuffer {
                label,
                usage: descriptor.usage,
                bytes: vec![0; size],
                mapped: false,
            },
        );
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<()> {
        match self.state().buffers.remove(&id) {
            Some(buffer) => {
                debug!(?id, label = %buffer.label, "headless buffer destroyed");
                Ok(())
            }
            None => Err(DeviceError::UnknownBuffer(id)),
        }
    }

    fn map_write_discard(&self, id: BufferId) -> Result<Box<dyn MappedBuffer + '_>> {
        let mut state = self.state();
        if state.pending_map_failures > 0 {
            state.pending_map_failures -= 1;
            return Err(DeviceError::MapFailed {
                id,
                reason: "injected failure".into(),
            });
        }
        let buffer = state
            .buffers
            .get_mut(&id)
            .ok_or(DeviceError::UnknownBuffer(id))?;
        if !buffer.usage.contains(BufferUsage::MAP_WRITE) {
            return Err(DeviceError::NotMappable(id));
        }
        if buffer.mapped {
            return Err(DeviceError::AlreadyMapped(id));
        }
        buffer.mapped = true;
        let mut bytes = std::mem::take(&mut buffer.bytes);
        bytes.fill(0);
        state.maps += 1;
        Ok(Box::new(HeadlessMapping {
            device: self,
            id,
            bytes,
        }))
    }
}

struct HeadlessMapping<'a> {
    device: &'a HeadlessDevice,
    id: BufferId,
    bytes: Vec<u8>,
}

impl MappedBuffer for HeadlessMapping<'_> {
    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Drop for HeadlessMapping<'_> {
    fn drop(&mut self) {
        let mut state = self.device.state();
        state.unmaps += 1;
        if let Some(buffer) = state.buffers.get_mut(&self.id) {
            buffer.bytes = std::mem::take(&mut self.bytes);
            buffer.mapped = false;
        }
    }
}
