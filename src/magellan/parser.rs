//! # Frame Parser
//!
//! Accumulates raw serial bytes and splits them into complete frames.
//!
//! The device writes CR-terminated ASCII lines; reads can split a frame at
//! any byte boundary, so leftover bytes stay buffered until the terminator
//! arrives. Unknown kind identifiers are reported and skipped; the next
//! terminator restores framing after a corrupted frame.

use bytes::BytesMut;
use tracing::{debug, warn};

use super::protocol::{Frame, FrameKind, FRAME_TERMINATOR};
use crate::error::MagellanError;

/// Upper bound on buffered bytes without a terminator. A healthy link never
/// comes close; past this the stream is garbage and is dropped to resync.
const MAX_PENDING_BYTES: usize = 1024;

/// Stateful frame assembler over an owned growable buffer.
#[derive(Debug, Default)]
pub struct FrameParser {
    buffer: BytesMut,
}

impl FrameParser {
    /// Create an empty parser
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Append a chunk of received bytes and extract every complete frame.
    ///
    /// Complete frames are removed from the buffer and returned in arrival
    /// order; bytes after the last terminator remain buffered for the next
    /// call. Segments with an unrecognised kind identifier are skipped with
    /// a log entry and do not interrupt scanning.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self
            .buffer
            .iter()
            .position(|&b| b == FRAME_TERMINATOR)
        {
            let segment = self.buffer.split_to(pos + 1);
            // Drop the terminator, plus any LF the device appends
            let line: &[u8] = &segment[..pos];
            let line = match line.first() {
                Some(&b'\n') => &line[1..],
                _ => line,
            };

            if line.is_empty() {
                continue;
            }

            match FrameKind::from_id(line[0]) {
                Some(kind) => frames.push(Frame {
                    kind,
                    payload: line[1..].to_vec(),
                }),
                None => {
                    // Version banner and command echoes land here too, so
                    // this is routine, not an alarm.
                    let err = MagellanError::FrameSync(format!(
                        "unrecognised kind identifier 0x{:02X} ({} payload bytes)",
                        line[0],
                        line.len() - 1
                    ));
                    debug!("skipping frame: {}", err);
                }
            }
        }

        if self.buffer.len() > MAX_PENDING_BYTES {
            let err = MagellanError::FrameSync(format!(
                "{} unterminated bytes buffered; discarding to resync",
                self.buffer.len()
            ));
            warn!("{}", err);
            self.buffer.clear();
        }

        frames
    }

    /// Discard all buffered bytes. Used when a connection is (re)established
    /// so stale partial frames from a previous session cannot leak in.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Number of bytes awaiting a terminator
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
