//! An owned, growable byte window with a read cursor.
//!
//! The I/O layer appends at the tail; decoders advance the cursor at the
//! head. Backtracking never copies bytes: a checkpoint is a plain cursor
//! position, and a failed decode leaves the cursor exactly where it was.

use crate::decode::Decoder;

/// A saved cursor position. Restoring a mark abandons any checkpoints
/// taken after it; marks do not survive [`ParseBuffer::compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// A growable byte window with a read cursor.
#[derive(Debug, Clone)]
pub struct ParseBuffer {
    data: Vec<u8>,
    cursor: usize,
    max_message_size: usize,
}

impl ParseBuffer {
    pub fn new() -> Self {
        Self::with_max_message_size(usize::MAX)
    }

    /// A buffer that refuses to accumulate more than `max_message_size`
    /// octets without completing a message. Bounds the damage of an
    /// adversarial `{N}` literal announcement.
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self {
            data: Vec::new(),
            cursor: 0,
            max_message_size,
        }
    }

    /// Append bytes arriving from the transport.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// The unconsumed window, `[cursor, end)`.
    pub fn unconsumed(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    /// Number of unconsumed bytes.
    pub fn readable(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// The next `n` bytes without advancing, or `None` if fewer remain.
    pub fn peek(&self, n: usize) -> Option<&[u8]> {
        self.unconsumed().get(..n)
    }

    /// Advance the cursor. Must not exceed the unconsumed length.
    pub fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.readable());

        self.cursor += n.min(self.readable());
    }

    /// Take up to `n` payload bytes off the head of the window.
    ///
    /// Used to drain streamed APPEND/FETCH payloads: after a begin event
    /// announcing `length` octets, call this repeatedly (it returns fewer
    /// bytes when the transport is behind) until `length` octets came out,
    /// then re-enter the decoder.
    pub fn take_streamed(&mut self, n: usize) -> &[u8] {
        let n = n.min(self.readable());
        let start = self.cursor;

        self.cursor += n;

        &self.data[start..start + n]
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.cursor)
    }

    /// Rewind to a previously taken checkpoint.
    pub fn restore(&mut self, mark: Checkpoint) {
        debug_assert!(mark.0 <= self.cursor);

        self.cursor = mark.0.min(self.data.len());
    }

    /// Drop consumed bytes. Invalidates outstanding checkpoints, so only
    /// call between messages.
    pub fn compact(&mut self) {
        if self.cursor > 0 {
            self.data.drain(..self.cursor);
            self.cursor = 0;
        }
    }

    /// Run a decoder over the unconsumed window, advancing the cursor on
    /// success only.
    ///
    /// When the decoder asks for more data but the window has already
    /// outgrown the configured maximum message size, the incomplete state
    /// is turned into the decoder's "too long" failure.
    pub fn decode<D: Decoder>(&mut self, codec: &D) -> Result<D::Message, D::Error> {
        let result = codec.decode(self.unconsumed());

        match result {
            Ok((remaining, message)) => {
                let consumed = self.readable() - remaining.len();
                self.consume(consumed);

                Ok(message)
            }
            Err(error) => {
                if D::is_incomplete(&error) && self.readable() > self.max_message_size {
                    return Err(D::too_long(self.max_message_size));
                }

                Err(error)
            }
        }
    }
}

impl Default for ParseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{CommandCodec, CommandDecodeError, Decoder};

    #[test]
    fn test_cursor_movement() {
        let mut buf = ParseBuffer::new();
        buf.extend(b"hello world");

        assert_eq!(buf.readable(), 11);
        assert_eq!(buf.peek(5), Some(b"hello".as_ref()));
        assert_eq!(buf.peek(12), None);

        buf.consume(6);
        assert_eq!(buf.unconsumed(), b"world");
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut buf = ParseBuffer::new();
        buf.extend(b"abcdef");

        let mark = buf.checkpoint();
        buf.consume(4);
        assert_eq!(buf.unconsumed(), b"ef");

        buf.restore(mark);
        assert_eq!(buf.unconsumed(), b"abcdef");
    }

    #[test]
    fn test_compact() {
        let mut buf = ParseBuffer::new();
        buf.extend(b"abcdef");
        buf.consume(4);
        buf.compact();

        assert_eq!(buf.unconsumed(), b"ef");
        assert_eq!(buf.readable(), 2);
    }

    #[test]
    fn test_take_streamed_is_bounded_by_available_bytes() {
        let mut buf = ParseBuffer::new();
        buf.extend(b"abc");

        assert_eq!(buf.take_streamed(2), b"ab");
        assert_eq!(buf.take_streamed(5), b"c");
        assert_eq!(buf.take_streamed(5), b"");
    }

    #[test]
    fn test_decode_leaves_cursor_on_failure() {
        let codec = CommandCodec::default();

        let mut buf = ParseBuffer::new();
        buf.extend(b"a noop");

        // Incomplete: cursor untouched.
        assert_eq!(buf.decode(&codec), Err(CommandDecodeError::Incomplete));
        assert_eq!(buf.unconsumed(), b"a noop");

        buf.extend(b"\r\nrest");
        let command = buf.decode(&codec).unwrap();
        assert_eq!(command.name(), "NOOP");
        assert_eq!(buf.unconsumed(), b"rest");
    }

    #[test]
    fn test_decode_rejects_overlong_message() {
        let codec = CommandCodec::default();

        let mut buf = ParseBuffer::with_max_message_size(8);
        buf.extend(b"a login 0123456789");

        assert!(matches!(
            buf.decode(&codec),
            Err(CommandDecodeError::Failed { .. })
        ));
    }

    #[test]
    fn test_decode_failure_keeps_cursor() {
        let codec = CommandCodec::default();

        let mut buf = ParseBuffer::new();
        buf.extend(b"* noop\r\n");

        assert!(matches!(
            buf.decode(&codec),
            Err(CommandDecodeError::Failed { .. })
        ));
        assert_eq!(buf.unconsumed(), b"* noop\r\n");
    }
}
