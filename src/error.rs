use thiserror::Error;

use crate::connection::ConnectionError;

/// Top-level error type for the plangeo layout core.
#[derive(Debug, Error)]
pub enum PlangeoError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Door(#[from] DoorError),
}

/// Errors related to geometric input.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
}

/// Errors related to door bookkeeping.
#[derive(Debug, Error)]
pub enum DoorError {
    #[error("door not found")]
    NotFound,

    #[error("door width must be positive and finite, got {0}")]
    InvalidWidth(f64),

    #[error("door belongs to wall {expected}, not {actual}")]
    WrongWall { expected: String, actual: String },
}

/// Convenience type alias for results using [`PlangeoError`].
pub type Result<T> = std::result::Result<T, PlangeoError>;
