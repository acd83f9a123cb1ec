//! Wire protocol for framed, checksummed sensor readings.
//!
//! This crate is intentionally I/O-free: it provides pure functions and types
//! that can be tested and fuzzed without a serial port or OS-level plumbing.
//! Devices emit ASCII frames of the form
//!
//! ```text
//! [<index>,<timestamp>,<sensor_id>,<value>]*<HH>\n
//! ```
//!
//! (the bracket pair is optional) where `<HH>` is the CRC-8 of the
//! bracket-stripped data segment, rendered as two hex digits.
//!
//! # Key Features
//! - CRC-8 checksum (polynomial 0x07) matching the firmware implementation
//! - Frame validation and positional field decoding
//! - Frame encoding for fixture generation and loopback testing
//! - Classified, recoverable parse failures

#![deny(static_mut_refs)]

pub mod crc;
pub mod error;
pub mod frame;
pub mod record;

pub use crc::crc8;
pub use error::{FrameError, FrameResult};
pub use frame::{CHECKSUM_SEPARATOR, FIELD_COUNT, encode_frame, parse_frame};
pub use record::SensorRecord;
