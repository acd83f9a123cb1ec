//! Record sinks: the persistence seam and its CSV implementation.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::SecondsFormat;
use sensorlog_protocol::SensorRecord;
use tracing::info;

/// Header row emitted once per fresh destination.
pub const CSV_HEADER: &str = "index,timestamp,sensor_id,value,pc_timestamp";

/// Anything the capture loop can persist records into.
///
/// `append` must leave the record durable before returning: the loop
/// acknowledges each record immediately, so a crash right afterwards may
/// lose at most data the sink never accepted.
pub trait RecordSink: Send {
    fn append(&mut self, record: &SensorRecord) -> io::Result<()>;
}

/// Append-only CSV log.
///
/// Columns are `index,timestamp,sensor_id,value,pc_timestamp`, where
/// `timestamp` is the device-local millisecond counter and `pc_timestamp`
/// is the host ingest time as an ISO-8601 string. The destination is never
/// truncated or rewritten; reopening an existing log appends below the
/// rows already there.
#[derive(Debug)]
pub struct CsvSink {
    writer: BufWriter<std::fs::File>,
}

impl CsvSink {
    /// Open (or create) the log at `path`, writing the header row only if
    /// the destination is fresh — absent or zero-length.
    ///
    /// # Errors
    /// Propagates filesystem errors from opening or the initial header
    /// write.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let fresh = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        if fresh {
            writeln!(writer, "{CSV_HEADER}")?;
            writer.flush()?;
        }
        info!(path = %path.display(), fresh, "csv sink opened");
        Ok(Self { writer })
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, record: &SensorRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "{},{},{},{},{}",
            record.index,
            record.device_timestamp_ms,
            record.sensor_id,
            record.value,
            record
                .ingested_at
                .to_rfc3339_opts(SecondsFormat::Micros, true)
        )?;
        // Flush per record: durability over throughput.
        self.writer.flush()
    }
}
