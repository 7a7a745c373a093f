use sweepline_platform::DeviceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrailError {
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
    #[error("vertex capacity must be non-zero")]
    ZeroCapacity,
    #[error("a trail named '{0}' already exists")]
    DuplicateName(String),
    #[error("no trail named '{0}'")]
    UnknownTrail(String),
}
