//! Serial capture pipeline: transport seam, record sink, and the ingestion
//! loop that ties them to the protocol crates.
//!
//! The pipeline is one sequential cycle,
//!
//! ```text
//! transport bytes -> LineReassembler -> parse_frame -> SensorRecord -> sink
//! ```
//!
//! driven by a single thread of control. The only suspension point is the
//! bounded-timeout transport read; everything else is synchronous. Frame
//! failures are logged and skipped; transport failures end the session.

#![deny(static_mut_refs)]

pub mod error;
pub mod session;
pub mod sink;
pub mod source;

pub use error::{CaptureError, TransportError};
pub use session::{CaptureSession, CaptureStats};
pub use sink::{CSV_HEADER, CsvSink, RecordSink};
pub use source::{
    ByteSource, DEFAULT_BAUD, DEFAULT_READ_TIMEOUT, SerialConfig, SerialPortInfo, SerialPortType,
    SerialSource, UsbPortInfo, list_ports,
};
