//! One-direction byte pump with packet observation.
//!
//! A connection runs two of these, one per direction, sharing nothing but
//! the socket pair. The worker that reads a socket is the sole writer of
//! the opposite socket, so no synchronisation is needed.
//!
//! The pump's single hard rule: the bytes written to the peer are the
//! bytes read, in order, unmodified. The observer sees each frame only
//! after it has been forwarded and can never influence the stream.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::{
    error::ProxyError,
    observer::{Direction, PacketObserver},
    reader::FrameReader,
};

/// Copy frames from `from` to `to` until the stream ends.
///
/// Each complete frame is forwarded verbatim, then handed to `observer`
/// (when present) for decoding and logging. When the source reaches clean
/// end of stream the peer's write half is shut down so the far side sees
/// EOF, and the number of forwarded frames is returned.
///
/// # Errors
///
/// Returns [`ProxyError::FrameTruncated`] if the source dies mid-frame, or
/// [`ProxyError::Transport`] on a socket error in either half. Decode
/// failures are not errors; they surface only in the observer's output.
pub async fn pump<R, W>(
    from: R,
    mut to: W,
    direction: Direction,
    observer: Option<Arc<dyn PacketObserver>>,
) -> Result<u64, ProxyError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut frames = FrameReader::new(from);
    let mut forwarded = 0u64;

    while let Some(frame) = frames.next_frame().await? {
        to.write_all(frame.as_bytes()).await?;
        to.flush().await?;

        if let Some(observer) = &observer {
            observer.observe(direction, &frame);
        }

        forwarded += 1;
    }

    // Propagate EOF so the peer's reader also winds down.
    let _ = to.shutdown().await;

    tracing::debug!(%direction, frames = forwarded, "stream ended");
    Ok(forwarded)
}
