//! Spyglass proxy core: observation and forwarding.
//!
//! This crate contains everything between the sockets and the pure wire
//! decoder in `spyglass-proto`:
//!
//! - [`reader`]: turns a byte stream into complete frames
//! - [`forwarder`]: the per-direction pump that copies frames verbatim
//! - [`observer`]: decodes a copy of each frame and renders the log line
//! - [`config`]: proxy configuration
//! - [`error`]: worker-terminating errors
//!
//! # Architecture
//!
//! The forwarder is generic over `AsyncRead`/`AsyncWrite` rather than tied
//! to `tokio::net` sockets. The production binary drives it with real TCP
//! streams; the test harness drives the same code with simulated ones.
//! Decoding is a pure observer: its outcome never influences what bytes
//! reach the peer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod forwarder;
pub mod observer;
pub mod reader;

pub use config::{ConfigError, ProxyConfig};
pub use error::ProxyError;
pub use forwarder::pump;
pub use observer::{render_line, Direction, LogObserver, PacketObserver};
pub use reader::FrameReader;
