//! Deterministic simulation harness for proxy testing.
//!
//! Provides the pieces the end-to-end tests assemble inside a Turmoil
//! simulation: builders for on-wire packet bytes, a capturing observer
//! that records rendered log lines, and a single-connection proxy host
//! running the production pump over simulated TCP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod capture;
pub mod wire;

use std::sync::Arc;

use spyglass_core::{pump, Direction, PacketObserver};

pub use capture::CaptureObserver;

/// Serve exactly one proxied connection inside a turmoil host.
///
/// Binds `listen`, accepts one client, dials `upstream`, and runs the two
/// production pump workers until both directions end. The observers mirror
/// the binary's per-direction logging switches: pass `None` to disable
/// observation for that direction (forwarding still happens).
///
/// # Errors
///
/// Propagates bind/accept/dial failures and worker errors to the
/// simulation, which reports them from `sim.run()`.
pub async fn proxy_once(
    listen: &str,
    upstream: &str,
    c2s_observer: Option<Arc<dyn PacketObserver>>,
    s2c_observer: Option<Arc<dyn PacketObserver>>,
) -> turmoil::Result {
    let listener = turmoil::net::TcpListener::bind(listen).await?;
    let (client, _peer) = listener.accept().await?;
    let server = turmoil::net::TcpStream::connect(upstream).await?;

    let (client_read, client_write) = tokio::io::split(client);
    let (server_read, server_write) = tokio::io::split(server);

    let client_to_server = tokio::spawn(pump(
        client_read,
        server_write,
        Direction::ClientToServer,
        c2s_observer,
    ));
    let server_to_client = tokio::spawn(pump(
        server_read,
        client_write,
        Direction::ServerToClient,
        s2c_observer,
    ));

    client_to_server.await??;
    server_to_client.await??;

    Ok(())
}
