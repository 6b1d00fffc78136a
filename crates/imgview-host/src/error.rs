//! Errors surfaced to scripts.

use imgview_io::IoError;
use imgview_task::TaskError;
use thiserror::Error;

/// Error raised by a host method or delivered as the first callback
/// argument.
///
/// `InvalidArgument` and `InvalidRegion` are always raised synchronously.
/// `InvalidDimensions` only ever reaches a callback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// Wrong argument count, type or object kind.
    #[error("{0}")]
    InvalidArgument(String),

    /// View region outside the parent image.
    #[error("{0}")]
    InvalidRegion(String),

    /// Zero-area view given to the asynchronous solidity check.
    #[error("{0}")]
    InvalidDimensions(String),

    /// Output format of a `save` could not be determined.
    #[error("{0}")]
    UnknownFormat(String),

    /// Codec or file failure during encode / save.
    #[error("{0}")]
    EncodeFailure(String),

    /// The background task itself failed.
    #[error(transparent)]
    Task(#[from] TaskError),
}

impl HostError {
    pub(crate) fn arg(msg: impl Into<String>) -> Self {
        HostError::InvalidArgument(msg.into())
    }

    /// Short kind name, as scripts see it.
    pub fn kind(&self) -> &'static str {
        match self {
            HostError::InvalidArgument(_) => "InvalidArgument",
            HostError::InvalidRegion(_) => "InvalidRegion",
            HostError::InvalidDimensions(_) => "InvalidDimensions",
            HostError::UnknownFormat(_) => "UnknownFormat",
            HostError::EncodeFailure(_) => "EncodeFailure",
            HostError::Task(_) => "TaskFailure",
        }
    }
}

impl From<imgview_core::Error> for HostError {
    fn from(e: imgview_core::Error) -> Self {
        use imgview_core::Error;
        match e {
            Error::InvalidRegion { .. } | Error::OutOfBounds { .. } => {
                HostError::InvalidRegion(e.to_string())
            }
            Error::InvalidDimensions { reason, .. } => HostError::InvalidDimensions(reason),
            Error::UnknownPixelFormat(_) => HostError::InvalidArgument(e.to_string()),
        }
    }
}

impl From<IoError> for HostError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::UnknownFormat(msg) => HostError::UnknownFormat(msg),
            IoError::Core(core) => core.into(),
            other => HostError::EncodeFailure(other.to_string()),
        }
    }
}

/// Result type for host methods.
pub type HostResult<T> = Result<T, HostError>;
