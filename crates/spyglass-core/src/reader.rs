//! Async frame reader over a byte stream.
//!
//! Yields one [`Frame`] per length-prefixed packet, exactly as framed by the
//! peer: no coalescing, no splitting, no timeout. The length prefix is kept
//! inside the frame so the forwarder can write it back out verbatim.
//!
//! End-of-stream handling follows the wire contract:
//! - the stream ending on the 4-byte prefix is a clean end (`Ok(None)`);
//! - a zero length field is a clean end;
//! - the stream ending inside the payload is
//!   [`ProxyError::FrameTruncated`].

use bytes::Bytes;
use spyglass_proto::{Frame, LENGTH_PREFIX_SIZE};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ProxyError;

/// Reads complete frames from an `AsyncRead` byte stream.
pub struct FrameReader<R> {
    inner: R,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Wrap a byte stream.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next complete frame.
    ///
    /// Returns `Ok(None)` at clean end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::FrameTruncated`] if the stream ends inside a
    /// payload, or [`ProxyError::Transport`] on a socket error.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>, ProxyError> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        let mut filled = 0;
        while filled < prefix.len() {
            let n = self.inner.read(&mut prefix[filled..]).await?;
            if n == 0 {
                return Ok(None);
            }
            filled += n;
        }

        let len = u32::from_be_bytes(prefix) as usize;
        if len == 0 {
            return Ok(None);
        }

        let mut wire = vec![0u8; LENGTH_PREFIX_SIZE + len];
        wire[..LENGTH_PREFIX_SIZE].copy_from_slice(&prefix);

        let mut filled = 0;
        while filled < len {
            let n = self.inner.read(&mut wire[LENGTH_PREFIX_SIZE + filled..]).await?;
            if n == 0 {
                return Err(ProxyError::FrameTruncated { expected: len, actual: filled });
            }
            filled += n;
        }

        let frame = Frame::from_wire(Bytes::from(wire))
            .expect("prefix and payload length agree by construction");
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn yields_frames_in_order_then_none() {
        let mut wire = Vec::new();
        wire.extend_from_slice(Frame::from_payload(b"one").as_bytes());
        wire.extend_from_slice(Frame::from_payload(b"two-2").as_bytes());

        let mut reader = FrameReader::new(&wire[..]);

        let first = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(first.payload(), b"one");

        let second = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(second.payload(), b"two-2");

        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn frame_length_agrees_with_prefix() {
        let wire = Frame::from_payload(&[1, 2, 3]).to_bytes();
        let mut reader = FrameReader::new(&wire[..]);
        let frame = reader.next_frame().await.unwrap().unwrap();

        let declared = u32::from_be_bytes(frame.as_bytes()[..4].try_into().unwrap());
        assert_eq!(frame.len(), 4 + declared as usize);
    }

    #[tokio::test]
    async fn zero_length_is_clean_end() {
        let wire = [0u8, 0, 0, 0, 9, 9, 9];
        let mut reader = FrameReader::new(&wire[..]);
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn partial_prefix_is_clean_end() {
        let wire = [0u8, 0];
        let mut reader = FrameReader::new(&wire[..]);
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_stream_is_clean_end() {
        let mut reader = FrameReader::new(&[][..]);
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn short_payload_is_truncated() {
        let wire = [0u8, 0, 0, 5, 1, 2];
        let mut reader = FrameReader::new(&wire[..]);
        assert_eq!(
            reader.next_frame().await,
            Err(ProxyError::FrameTruncated { expected: 5, actual: 2 })
        );
    }
}
