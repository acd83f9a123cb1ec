//! Capture-side error types.
//!
//! Unlike frame errors, everything here is fatal to the session: a vanished
//! or reconfigured device must not be silently retried against, since the
//! subsequent reads could be garbage from a different device.

use thiserror::Error;

/// Transport-level failures (opening, enumerating, or reading the port).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial read error: {0}")]
    Read(#[source] std::io::Error),

    #[error("Port enumeration failed: {0}")]
    Enumerate(#[source] serialport::Error),
}

/// Failures that terminate a capture session.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The sink could not durably append a record.
    #[error("Sink error: {0}")]
    Sink(#[from] std::io::Error),
}
