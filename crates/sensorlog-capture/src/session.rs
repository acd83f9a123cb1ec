//! The capture session: one sequential read → reassemble → parse → write
//! cycle, run until cancelled or the transport dies.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sensorlog_framing::LineReassembler;
use sensorlog_protocol::parse_frame;
use tracing::{debug, info, warn};

use crate::error::CaptureError;
use crate::sink::RecordSink;
use crate::source::ByteSource;

/// Pause between read attempts that returned no data.
pub const DEFAULT_IDLE_WAIT: Duration = Duration::from_millis(10);

const READ_BUF_LEN: usize = 512;

/// Counters reported when a session ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStats {
    pub records_written: u64,
    pub frames_rejected: u64,
    pub bytes_read: u64,
}

/// Owns the transport, the sink, and the reassembly buffer for one capture
/// run.
///
/// Cancellation is cooperative: the shared flag is checked between read
/// attempts, so shutdown latency is bounded by the transport read timeout
/// plus the idle wait. Dropping the session releases the transport handle.
pub struct CaptureSession<S: ByteSource, K: RecordSink> {
    source: S,
    sink: K,
    reassembler: LineReassembler,
    idle_wait: Duration,
    shutdown: Arc<AtomicBool>,
}

impl<S: ByteSource, K: RecordSink> CaptureSession<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            reassembler: LineReassembler::new(),
            idle_wait: DEFAULT_IDLE_WAIT,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn with_idle_wait(mut self, idle_wait: Duration) -> Self {
        self.idle_wait = idle_wait;
        self
    }

    /// Use a caller-owned shutdown flag instead of the session's own.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Flag that stops the loop when set; hand this to a signal handler.
    #[must_use]
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Run until the shutdown flag is set or the transport fails.
    ///
    /// Frame-level failures are logged and counted, never fatal. Transport
    /// and sink failures terminate the session; the transport handle is
    /// released when the consumed `self` drops.
    ///
    /// # Errors
    /// [`CaptureError::Transport`] on a fatal read error,
    /// [`CaptureError::Sink`] if a record could not be durably appended.
    pub fn run(mut self) -> Result<CaptureStats, CaptureError> {
        let mut buf = [0u8; READ_BUF_LEN];
        let mut stats = CaptureStats::default();
        info!("capture session started");

        while !self.shutdown.load(Ordering::SeqCst) {
            let n = self.source.read_chunk(&mut buf)?;
            if n == 0 {
                std::thread::sleep(self.idle_wait);
                continue;
            }
            stats.bytes_read += n as u64;

            for candidate in self.reassembler.push(&buf[..n]) {
                match parse_frame(&candidate) {
                    Ok(record) => {
                        self.sink.append(&record)?;
                        stats.records_written += 1;
                        debug!(
                            index = record.index,
                            sensor_id = %record.sensor_id,
                            value = record.value,
                            "record written"
                        );
                    }
                    Err(err) => {
                        stats.frames_rejected += 1;
                        warn!(frame = %candidate, error = %err, "rejected frame");
                    }
                }
            }
        }

        info!(
            records = stats.records_written,
            rejected = stats.frames_rejected,
            bytes = stats.bytes_read,
            "capture session stopped"
        );
        Ok(stats)
    }
}
