//! TCP listener and per-connection forwarding workers.
//!
//! Each accepted client gets its own upstream connection and two pump
//! workers, one per direction. A failed upstream dial or a worker error
//! ends that connection only; the accept loop keeps running until the
//! process is interrupted.

use std::sync::Arc;

use anyhow::{Context, Result};
use spyglass_core::{pump, Direction, LogObserver, PacketObserver, ProxyConfig};
use tokio::net::{TcpListener, TcpStream};

/// Bind the listener and serve until interrupted.
///
/// # Errors
///
/// Returns an error (and thus exit code 1) only for transport setup
/// failures: an unbindable listen address or a broken accept loop.
pub async fn run(config: ProxyConfig, colour: bool) -> Result<()> {
    let listener = TcpListener::bind(&config.listen_address)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_address))?;

    tracing::info!(
        listen = %config.listen_address,
        remote = %config.remote_address,
        "proxy listening"
    );

    let observer: Arc<dyn PacketObserver> = Arc::new(LogObserver::new(colour));
    let config = Arc::new(config);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupt received, shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (client, peer) = accepted.context("accept failed")?;
                tracing::info!(%peer, "client connected");

                let config = Arc::clone(&config);
                let observer = Arc::clone(&observer);
                tokio::spawn(handle_connection(client, config, observer));
            }
        }
    }
}

/// Dial upstream and pump both directions until both streams end.
async fn handle_connection(
    client: TcpStream,
    config: Arc<ProxyConfig>,
    observer: Arc<dyn PacketObserver>,
) {
    let upstream = match TcpStream::connect(config.remote_address.as_str()).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::warn!(remote = %config.remote_address, error = %e, "upstream dial failed");
            return;
        },
    };

    let (client_read, client_write) = client.into_split();
    let (upstream_read, upstream_write) = upstream.into_split();

    let c2s_observer = config.log_client_packets.then(|| Arc::clone(&observer));
    let s2c_observer = config.log_server_packets.then(|| Arc::clone(&observer));

    let client_to_server = tokio::spawn(pump(
        client_read,
        upstream_write,
        Direction::ClientToServer,
        c2s_observer,
    ));
    let server_to_client = tokio::spawn(pump(
        upstream_read,
        client_write,
        Direction::ServerToClient,
        s2c_observer,
    ));

    for (direction, worker) in [
        (Direction::ClientToServer, client_to_server),
        (Direction::ServerToClient, server_to_client),
    ] {
        match worker.await {
            Ok(Ok(frames)) => tracing::debug!(%direction, frames, "worker finished"),
            Ok(Err(e)) => tracing::warn!(%direction, error = %e, "worker failed"),
            Err(e) => tracing::error!(%direction, error = %e, "worker panicked"),
        }
    }

    tracing::info!("connection closed");
}
