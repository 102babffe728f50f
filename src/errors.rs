/// Error types for link-layer operations
///
/// Every failure path of the transport resolves to one of these variants.
/// Delivery exhaustion is not an error: it is reported through
/// [`crate::transmitter::Delivery::Exhausted`] with its metrics attached.
use std::io;

use thiserror::Error;

/// Result type alias for link operations
pub type Result<T> = std::result::Result<T, LinkError>;

/// Link-layer error enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// Radio transport failure (send or socket error)
    #[error("I/O error: {0}")]
    Io(String),

    /// Radio could not be brought up at the requested frequency
    #[error("radio init failed at {frequency_hz} Hz")]
    RadioInit { frequency_hz: u64 },

    /// Radio parameters outside the supported range
    #[error("invalid radio configuration: {0}")]
    InvalidConfig(String),

    /// Frame length differs from the frame's fixed wire size
    #[error("size mismatch: expected {expected} bytes, received {received}")]
    SizeMismatch { expected: usize, received: usize },

    /// Frame had the right length but could not be read or decoded
    #[error("unpack error: {0}")]
    Unpack(String),
}

impl From<io::Error> for LinkError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
