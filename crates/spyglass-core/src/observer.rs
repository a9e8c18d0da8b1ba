//! Packet observation: direction labels and log rendering.
//!
//! The observer is a pure side channel. It receives each frame after the
//! bytes have been forwarded, decodes a copy, and emits one line per frame
//! on stdout:
//!
//! ```text
//! CLIENT->SERVER: {"type":42,"data":{"hp":100}}
//! SERVER->CLIENT: {"type":"parse_error","error":"empty payload after header"}
//! ```
//!
//! Colour is cosmetic, never semantic: client traffic yellow, server
//! traffic magenta, matching what operators already expect from the
//! capture tooling this replaces.

use owo_colors::OwoColorize;
use spyglass_proto::{Frame, ParsedPacket};
use std::fmt;

/// Which way a frame is travelling through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the intercepted client towards the upstream server
    ClientToServer,
    /// From the upstream server back to the client
    ServerToClient,
}

impl Direction {
    /// The wire-log label for this direction.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ClientToServer => "CLIENT->SERVER",
            Self::ServerToClient => "SERVER->CLIENT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives every forwarded frame for one direction of a connection.
///
/// Implementations must not assume the frame parses; the forwarder calls
/// this for malformed packets too.
pub trait PacketObserver: Send + Sync {
    /// Called after `frame` has been forwarded to the peer.
    fn observe(&self, direction: Direction, frame: &Frame);
}

/// Render the log line for one frame, without colour.
///
/// Success renders the message type and, unless it is Null, the decoded
/// data tree; failure renders a single-line parse-error record. Either
/// way this is total: every frame produces exactly one line.
#[must_use]
pub fn render_line(direction: Direction, frame: &Frame) -> String {
    match ParsedPacket::parse(frame) {
        Ok(packet) => {
            let mut line = format!("{}: {{\"type\":{}", direction.label(), packet.message_type());
            if !packet.data().is_null() {
                line.push_str(",\"data\":");
                line.push_str(&packet.data().to_json());
            }
            line.push('}');
            line
        },
        Err(e) => {
            format!("{}: {{\"type\":\"parse_error\",\"error\":\"{}\"}}", direction.label(), e)
        },
    }
}

/// Stdout observer used by the proxy binary.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    colour: bool,
}

impl LogObserver {
    /// Create an observer; `colour` enables per-direction ANSI styling.
    #[must_use]
    pub fn new(colour: bool) -> Self {
        Self { colour }
    }
}

impl PacketObserver for LogObserver {
    fn observe(&self, direction: Direction, frame: &Frame) {
        let line = render_line(direction, frame);
        if self.colour {
            match direction {
                Direction::ClientToServer => println!("{}", line.yellow()),
                Direction::ServerToClient => println!("{}", line.magenta()),
            }
        } else {
            println!("{line}");
        }
    }
}
