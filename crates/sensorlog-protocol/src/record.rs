//! Decoded sensor readings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One validated sensor reading.
///
/// A `SensorRecord` only ever comes out of a frame that passed checksum
/// verification and carried exactly the expected field count. Records are
/// immutable once decoded and are consumed exactly once by the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Source-assigned sequence number.
    pub index: u64,
    /// Device-local timestamp in milliseconds. Monotonically non-decreasing
    /// per device, but not comparable across devices.
    pub device_timestamp_ms: i64,
    /// Short sensor identifier, taken verbatim from the frame.
    pub sensor_id: String,
    /// Raw integer reading.
    pub value: i64,
    /// Host wall-clock time stamped at decode time, not derived from the
    /// device clock.
    pub ingested_at: DateTime<Utc>,
}

impl SensorRecord {
    /// Device timestamp converted to seconds, the unit downstream plots use.
    #[must_use]
    pub fn device_time_secs(&self) -> f64 {
        self.device_timestamp_ms as f64 / 1000.0
    }

    /// Equality ignoring `ingested_at`, which is freshly stamped per decode.
    #[must_use]
    pub fn same_reading(&self, other: &Self) -> bool {
        self.index == other.index
            && self.device_timestamp_ms == other.device_timestamp_ms
            && self.sensor_id == other.sensor_id
            && self.value == other.value
    }
}
