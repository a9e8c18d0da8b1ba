//! Error types for the proxy core.
//!
//! Decode failures are not errors at this layer: the observer logs them and
//! forwarding continues. What can actually fail a worker is the stream
//! itself - a socket error, or a peer that disappears mid-frame.

use std::{fmt, io};

/// Errors that terminate a forwarding worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// Stream ended inside a frame payload
    FrameTruncated {
        /// Payload bytes the length prefix promised
        expected: usize,
        /// Payload bytes actually received
        actual: usize,
    },

    /// Underlying socket error
    Transport(String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameTruncated { expected, actual } => {
                write!(f, "frame truncated: prefix promised {} payload bytes, got {}", expected, actual)
            },
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for ProxyError {}

/// Convert io::Error at the socket boundary; internally we use ProxyError.
impl From<io::Error> for ProxyError {
    fn from(err: io::Error) -> Self {
        ProxyError::Transport(err.to_string())
    }
}
