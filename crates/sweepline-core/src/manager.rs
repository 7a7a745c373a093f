use std::collections::BTreeMap;
use std::sync::Arc;

use sweepline_platform::GpuDevice;
use tracing::info;

use crate::config::TrailPreset;
use crate::error::TrailError;
use crate::trail::{DrawCall, SweepingTrail};

/// Creates and owns named trails, all backed by the same device.
pub struct SweepingTrailManager {
    device: Arc<dyn GpuDevice>,
    trails: BTreeMap<String, SweepingTrail>,
}

impl SweepingTrailManager {
    pub fn new(device: Arc<dyn GpuDevice>) -> Self {
        Self {
            device,
            trails: BTreeMap::new(),
        }
    }

    pub fn create_trail(
        &mut self,
        name: &str,
        max_vertex_count: u32,
    ) -> Result<&mut SweepingTrail, TrailError> {
        if self.trails.contains_key(name) {
            return Err(TrailError::DuplicateName(name.to_owned()));
        }
        let mut trail = SweepingTrail::new();
        trail.initialize(Arc::clone(&self.device), name, max_vertex_count)?;
        info!(trail = name, max_vertex_count, "sweeping trail created");
        Ok(self.trails.entry(name.to_owned()).or_insert(trail))
    }

    pub fn create_from_preset(
        &mut self,
        preset: &TrailPreset,
    ) -> Result<&mut SweepingTrail, TrailError> {
        let trail = self.create_trail(&preset.name, preset.max_vertex_count)?;
        trail.apply_preset(preset);
        Ok(trail)
    }

    pub fn trail(&self, name: &str) -> Option<&SweepingTrail> {
        self.trails.get(name)
    }

    pub fn trail_mut(&mut self, name: &str) -> Option<&mut SweepingTrail> {
        self.trails.get_mut(name)
    }

    /// Drops the trail, which releases its vertex buffer.
    pub fn destroy_trail(&mut self, name: &str) -> Result<(), TrailError> {
        if self.trails.remove(name).is_none() {
            return Err(TrailError::UnknownTrail(name.to_owned()));
        }
        info!(trail = name, "sweeping trail destroyed");
        Ok(())
    }

    pub fn trail_names(&self) -> impl Iterator<Item = &str> {
        self.trails.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.trails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    pub fn update_all(&mut self, delta_time: f32) {
        for trail in self.trails.values_mut() {
            trail.update(delta_time);
        }
    }

    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.trails.values().filter_map(SweepingTrail::draw_call).collect()
    }
}
