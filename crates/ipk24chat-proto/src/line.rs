//! Line reassembly for the byte stream.
//!
//! A single receive may carry half a frame or several frames. [`LineBuffer`]
//! accumulates raw bytes and hands out complete lines in arrival order.

use bytes::{Buf, Bytes, BytesMut};

use crate::{ProtocolError, Result};

/// Initial buffer capacity.
const INITIAL_CAPACITY: usize = 4096;

/// Longest accepted line, terminator included.
pub const MAX_LINE_LENGTH: usize = 4096;

/// Accumulates received bytes and splits them into lines.
///
/// # Invariants
///
/// - Returned lines always end with `\n` (the terminator is kept so the codec
///   sees exactly what arrived).
/// - Bytes after the last `\n` stay buffered until more data arrives.
/// - Never holds more than [`MAX_LINE_LENGTH`] bytes of one partial line. An
///   over-long line is reported once and its remaining bytes are skipped up to
///   the next `\n`.
#[derive(Debug)]
pub struct LineBuffer {
    buf: BytesMut,
    discarding: bool,
}

impl LineBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { buf: BytesMut::with_capacity(INITIAL_CAPACITY), discarding: false }
    }

    /// Append received bytes.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Take the next complete line, terminator included. `None` if no
    /// complete line is buffered.
    ///
    /// # Errors
    ///
    /// `ProtocolError::LineTooLong` once per line longer than
    /// [`MAX_LINE_LENGTH`]. The line's bytes are dropped.
    pub fn next_line(&mut self) -> Option<Result<Bytes>> {
        if self.discarding {
            match self.newline() {
                Some(end) => {
                    self.buf.advance(end + 1);
                    self.discarding = false;
                },
                None => {
                    self.buf.clear();
                    return None;
                },
            }
        }

        match self.newline() {
            Some(end) if end < MAX_LINE_LENGTH => Some(Ok(self.buf.split_to(end + 1).freeze())),
            Some(end) => {
                self.buf.advance(end + 1);
                Some(Err(ProtocolError::LineTooLong { limit: MAX_LINE_LENGTH }))
            },
            None if self.buf.len() >= MAX_LINE_LENGTH => {
                self.buf.clear();
                self.discarding = true;
                Some(Err(ProtocolError::LineTooLong { limit: MAX_LINE_LENGTH }))
            },
            None => None,
        }
    }

    /// Number of buffered bytes not yet returned as a line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }

    fn newline(&self) -> Option<usize> {
        self.buf.iter().position(|&b| b == b'\n')
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_across_receives() {
        let mut lines = LineBuffer::new();
        lines.extend(b"REPLY OK ");
        assert_eq!(lines.next_line(), None);

        lines.extend(b"IS Welcome\r\nMSG FROM Bob");
        assert_eq!(lines.next_line(), Some(Ok(Bytes::from_static(b"REPLY OK IS Welcome\r\n"))));
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.pending(), b"MSG FROM Bob".len());
    }

    #[test]
    fn several_lines_in_one_receive() {
        let mut lines = LineBuffer::new();
        lines.extend(b"BYE\r\nBYE\r\n");
        assert!(matches!(lines.next_line(), Some(Ok(_))));
        assert!(matches!(lines.next_line(), Some(Ok(_))));
        assert!(lines.next_line().is_none());
        assert_eq!(lines.pending(), 0);
    }

    #[test]
    fn clear_drops_partial_line() {
        let mut lines = LineBuffer::new();
        lines.extend(b"MSG FR");
        lines.clear();
        assert_eq!(lines.pending(), 0);
    }

    #[test]
    fn unterminated_flood_is_capped() {
        let mut lines = LineBuffer::new();
        lines.extend(&[b'a'; MAX_LINE_LENGTH]);

        assert_eq!(lines.next_line(), Some(Err(ProtocolError::LineTooLong {
            limit: MAX_LINE_LENGTH
        })));
        assert_eq!(lines.pending(), 0);

        // Rest of the same line is skipped, reported only once.
        lines.extend(&[b'a'; 100]);
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.pending(), 0);

        lines.extend(b"aaa\r\nBYE\r\n");
        assert_eq!(lines.next_line(), Some(Ok(Bytes::from_static(b"BYE\r\n"))));
    }

    #[test]
    fn terminated_over_long_line_is_rejected() {
        let mut line = vec![b'x'; MAX_LINE_LENGTH];
        line.extend_from_slice(b"\nBYE\n");

        let mut lines = LineBuffer::new();
        lines.extend(&line);

        assert!(matches!(lines.next_line(), Some(Err(ProtocolError::LineTooLong { .. }))));
        assert_eq!(lines.next_line(), Some(Ok(Bytes::from_static(b"BYE\n"))));
    }

    #[test]
    fn line_at_limit_is_accepted() {
        let mut line = vec![b'x'; MAX_LINE_LENGTH - 1];
        line.push(b'\n');

        let mut lines = LineBuffer::new();
        lines.extend(&line);
        assert!(matches!(lines.next_line(), Some(Ok(bytes)) if bytes.len() == MAX_LINE_LENGTH));
    }
}
