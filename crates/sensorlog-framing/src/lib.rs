//! Reassembles newline-delimited frames out of arbitrarily chunked byte
//! reads.
//!
//! Serial reads hand back whatever happens to be in the OS buffer, so a
//! frame routinely arrives split across several chunks and a single chunk
//! routinely carries several frames. [`LineReassembler`] buffers the
//! unresolved tail between reads and yields complete, trimmed lines in
//! arrival order.
//!
//! The transport is noisy by nature: invalid UTF-8 sequences are replaced
//! during decoding rather than treated as errors, and blank lines are
//! dropped.

#![deny(static_mut_refs)]

use tracing::trace;

/// Accumulates chunked input and splits it into complete lines.
///
/// The internal buffer holds bytes received but not yet terminated by a
/// newline; it persists across calls indefinitely. If the device never
/// sends a delimiter the buffer grows without bound. That matches the
/// deployed behavior; callers wanting a cap should layer one on top.
#[derive(Debug, Default)]
pub struct LineReassembler {
    buffer: String,
}

impl LineReassembler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(256),
        }
    }

    /// Feed one chunk of transport bytes; returns every frame candidate the
    /// chunk completed, in arrival order.
    ///
    /// A candidate is a maximal newline-free run, trimmed of surrounding
    /// whitespace (including any `\r` from CRLF devices). Whitespace-only
    /// lines yield nothing.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        let mut candidates = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let rest = self.buffer.split_off(pos + 1);
            let line = std::mem::replace(&mut self.buffer, rest);
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                candidates.push(trimmed.to_string());
            }
        }

        if !candidates.is_empty() || !self.buffer.is_empty() {
            trace!(
                yielded = candidates.len(),
                pending = self.buffer.len(),
                "reassembled chunk"
            );
        }
        candidates
    }

    /// Bytes buffered but not yet resolved into a complete frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any buffered remainder (e.g. after reopening the transport).
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
