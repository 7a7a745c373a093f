//! Sweepline core engine: sweeping trail geometry built from a moving line
//! segment and streamed into a device vertex buffer every frame.

pub mod config;
pub mod error;
pub mod manager;
pub mod math;
pub mod pool;
pub mod segment;
pub mod trail;

pub use config::{ConfigError, EngineConfig, TrailPreset};
pub use error::TrailError;
pub use manager::SweepingTrailManager;
pub use pool::GpuVertexPool;
pub use segment::{LineSegment, TrailVertex};
pub use trail::{DrawCall, SweepingTrail};
