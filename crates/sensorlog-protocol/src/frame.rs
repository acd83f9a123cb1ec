//! Frame validation and field decoding.
//!
//! A frame is one newline-delimited line of the form
//! `[<index>,<timestamp>,<sensor_id>,<value>]*<HH>` (brackets optional).
//! Validation short-circuits on the first failure; see [`FrameError`] for
//! the classification.

use chrono::Utc;

use crate::crc::crc8;
use crate::error::{FrameError, FrameResult};
use crate::record::SensorRecord;

/// Separator between the data segment and the trailing checksum.
pub const CHECKSUM_SEPARATOR: char = '*';

/// Comma-separated fields every data segment must carry.
pub const FIELD_COUNT: usize = 4;

/// Parse and validate one delimited frame.
///
/// The split happens at the *last* separator occurrence: the checksum is
/// always the trailing token, so this stays correct even if a data field
/// ever contained a `*` itself.
///
/// # Errors
/// Returns a [`FrameError`] classifying the first validation failure. All
/// failures are recoverable; the caller logs and continues.
pub fn parse_frame(text: &str) -> FrameResult<SensorRecord> {
    let (data, checksum) = text
        .rsplit_once(CHECKSUM_SEPARATOR)
        .ok_or(FrameError::MissingSeparator)?;

    // Strip exactly one bracket layer if both sides are present.
    let data = data
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(data);

    let computed = crc8(data.as_bytes());

    let checksum = checksum.trim();
    let received = match u8::from_str_radix(checksum, 16) {
        Ok(value) => value,
        Err(_) => {
            return Err(FrameError::ChecksumNotHex {
                segment: checksum.to_string(),
            });
        }
    };

    if computed != received {
        return Err(FrameError::ChecksumMismatch { computed, received });
    }

    let fields: Vec<&str> = data.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(FrameError::FieldCount {
            actual: fields.len(),
        });
    }

    Ok(SensorRecord {
        index: parse_int(fields[0], 0, "index")?,
        device_timestamp_ms: parse_int(fields[1], 1, "timestamp")?,
        sensor_id: fields[2].to_string(),
        value: parse_int(fields[3], 3, "value")?,
        ingested_at: Utc::now(),
    })
}

/// Render a record back into its wire form with a freshly computed checksum.
///
/// Used for fixture generation and loopback tests; the device side of the
/// protocol does the equivalent in firmware.
#[must_use]
pub fn encode_frame(record: &SensorRecord, bracketed: bool) -> String {
    let data = format!(
        "{},{},{},{}",
        record.index, record.device_timestamp_ms, record.sensor_id, record.value
    );
    let crc = crc8(data.as_bytes());
    if bracketed {
        format!("[{data}]{CHECKSUM_SEPARATOR}{crc:02X}")
    } else {
        format!("{data}{CHECKSUM_SEPARATOR}{crc:02X}")
    }
}

fn parse_int<T: std::str::FromStr>(
    raw: &str,
    index: usize,
    name: &'static str,
) -> FrameResult<T> {
    match raw.parse() {
        Ok(value) => Ok(value),
        Err(_) => Err(FrameError::InvalidField {
            index,
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_frame() -> Result<(), FrameError> {
        let record = parse_frame("1,1000,PHOTO,512*0C")?;
        assert_eq!(record.index, 1);
        assert_eq!(record.device_timestamp_ms, 1000);
        assert_eq!(record.sensor_id, "PHOTO");
        assert_eq!(record.value, 512);
        Ok(())
    }

    #[test]
    fn test_parse_bracketed_frame() -> Result<(), FrameError> {
        let record = parse_frame("[1,1000,PHOTO,512]*0C")?;
        assert_eq!(record.index, 1);
        assert_eq!(record.sensor_id, "PHOTO");
        Ok(())
    }

    #[test]
    fn test_bracketed_and_bare_decode_identically() -> Result<(), FrameError> {
        let bare = parse_frame("1,1000,PHOTO,512*0C")?;
        let bracketed = parse_frame("[1,1000,PHOTO,512]*0C")?;
        assert!(bare.same_reading(&bracketed));
        Ok(())
    }

    #[test]
    fn test_lowercase_hex_accepted() -> Result<(), FrameError> {
        let record = parse_frame("[5,250,GYRO,-3]*eb")?;
        assert_eq!(record.value, -3);
        Ok(())
    }

    #[test]
    fn test_checksum_segment_whitespace_trimmed() -> Result<(), FrameError> {
        let record = parse_frame("1,1000,PHOTO,512* 0C ")?;
        assert_eq!(record.index, 1);
        Ok(())
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(
            parse_frame("1,1000,PHOTO,512"),
            Err(FrameError::MissingSeparator)
        );
    }

    #[test]
    fn test_checksum_not_hex() {
        assert!(matches!(
            parse_frame("1,1000,PHOTO,512*ZZ"),
            Err(FrameError::ChecksumNotHex { .. })
        ));
    }

    #[test]
    fn test_checksum_wider_than_a_byte_rejected() {
        assert!(matches!(
            parse_frame("1,1000,PHOTO,512*1FF"),
            Err(FrameError::ChecksumNotHex { .. })
        ));
    }

    #[test]
    fn test_empty_checksum_segment_rejected() {
        assert!(matches!(
            parse_frame("1,1000,PHOTO,512*"),
            Err(FrameError::ChecksumNotHex { .. })
        ));
    }

    #[test]
    fn test_checksum_mismatch_reports_both_values() {
        assert_eq!(
            parse_frame("1,1000,PHOTO,512*FF"),
            Err(FrameError::ChecksumMismatch {
                computed: 0x0C,
                received: 0xFF,
            })
        );
    }

    #[test]
    fn test_mutated_data_segment_fails_checksum() {
        // One character changed (512 -> 513) under the original checksum.
        assert!(matches!(
            parse_frame("1,1000,PHOTO,513*0C"),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_three_fields_rejected() {
        assert_eq!(
            parse_frame("1,2,3*EE"),
            Err(FrameError::FieldCount { actual: 3 })
        );
    }

    #[test]
    fn test_five_fields_rejected() {
        assert_eq!(
            parse_frame("1,2,3,4,5*15"),
            Err(FrameError::FieldCount { actual: 5 })
        );
    }

    #[test]
    fn test_empty_data_segment_is_field_count_failure() {
        // crc8("") == 0x00, so validation proceeds to field counting.
        assert_eq!(parse_frame("*00"), Err(FrameError::FieldCount { actual: 1 }));
    }

    #[test]
    fn test_split_happens_at_last_separator() -> Result<(), FrameError> {
        // A stray '*' inside a field: the trailing token is still the checksum.
        let record = parse_frame("1,10,A*B,5*6F")?;
        assert_eq!(record.sensor_id, "A*B");
        Ok(())
    }

    #[test]
    fn test_negative_index_rejected() {
        assert!(matches!(
            parse_frame(&encode_frame_raw("-1,1000,PHOTO,512")),
            Err(FrameError::InvalidField { index: 0, name: "index", .. })
        ));
    }

    #[test]
    fn test_non_integer_timestamp_rejected() {
        assert!(matches!(
            parse_frame(&encode_frame_raw("1,abc,PHOTO,512")),
            Err(FrameError::InvalidField { index: 1, name: "timestamp", .. })
        ));
    }

    #[test]
    fn test_non_integer_value_rejected() {
        assert!(matches!(
            parse_frame(&encode_frame_raw("1,1000,PHOTO,high")),
            Err(FrameError::InvalidField { index: 3, name: "value", .. })
        ));
    }

    #[test]
    fn test_negative_value_accepted() -> Result<(), FrameError> {
        let record = parse_frame("5,250,GYRO,-3*EB")?;
        assert_eq!(record.value, -3);
        Ok(())
    }

    #[test]
    fn test_unbalanced_bracket_left_intact() {
        // Leading '[' without a trailing ']' is part of the data, so the
        // index field fails integer decoding after the checksum passes.
        let frame = encode_frame_raw("[1,1000,PHOTO,512");
        assert!(matches!(
            parse_frame(&frame),
            Err(FrameError::InvalidField { index: 0, .. })
        ));
    }

    #[test]
    fn test_encode_parse_roundtrip() -> Result<(), FrameError> {
        let original = SensorRecord {
            index: 42,
            device_timestamp_ms: 123_456,
            sensor_id: "TEMP".to_string(),
            value: -17,
            ingested_at: Utc::now(),
        };
        for bracketed in [false, true] {
            let wire = encode_frame(&original, bracketed);
            let reparsed = parse_frame(&wire)?;
            assert!(original.same_reading(&reparsed), "wire form: {wire}");
        }
        Ok(())
    }

    #[test]
    fn test_encode_frame_wire_form() {
        let record = SensorRecord {
            index: 1,
            device_timestamp_ms: 1000,
            sensor_id: "PHOTO".to_string(),
            value: 512,
            ingested_at: Utc::now(),
        };
        assert_eq!(encode_frame(&record, true), "[1,1000,PHOTO,512]*0C");
        assert_eq!(encode_frame(&record, false), "1,1000,PHOTO,512*0C");
    }

    /// Append a valid checksum to an arbitrary data segment.
    fn encode_frame_raw(data: &str) -> String {
        format!("{data}*{:02X}", crc8(data.as_bytes()))
    }
}
