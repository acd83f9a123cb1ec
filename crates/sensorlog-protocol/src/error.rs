//! Frame parsing error types.
//!
//! Every variant is recoverable: the ingestion loop logs the failure and
//! moves on to the next frame. No partial record is ever produced.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The frame carries no `*` checksum separator.
    #[error("Malformed frame: no checksum separator")]
    MissingSeparator,

    /// The trailing checksum segment is not a valid hex byte.
    ///
    /// This also covers segments that parse as hex but do not fit in one
    /// byte (the wire format promises exactly two hex digits); such frames
    /// are classified here rather than as a checksum mismatch.
    #[error("Invalid checksum encoding: {segment:?}")]
    ChecksumNotHex { segment: String },

    /// Computed and received checksums disagree.
    #[error("CRC mismatch: calculated {computed:02X}, received {received:02X}")]
    ChecksumMismatch { computed: u8, received: u8 },

    /// The data segment does not carry exactly the expected field count.
    #[error("Invalid field count: {actual}")]
    FieldCount { actual: usize },

    /// A positional field failed integer decoding.
    #[error("Invalid {name} field (position {index}): {value:?}")]
    InvalidField {
        index: usize,
        name: &'static str,
        value: String,
    },
}

pub type FrameResult<T> = Result<T, FrameError>;
