use std::result::Result as StdResult;

use thiserror::Error;

use crate::geom;

/// Result type for cellkit operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("surface: {0}")]
    /// The display surface refused an operation.
    Surface(String),
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("construct: {0}")]
    /// A widget could not be built. Nothing it acquired is left behind.
    Construct(String),
    #[error("invalid: {0}")]
    /// Invalid argument.
    Invalid(String),
    #[error("config: {0}")]
    /// A configuration option was unknown or ill-typed.
    Config(String),
    #[error("input: {0}")]
    /// The input source failed to produce an event.
    Input(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}
