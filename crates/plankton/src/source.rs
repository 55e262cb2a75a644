//! Buffered pull reader shared by both parsers.

use std::io::{self, BufRead, BufReader, Read};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DecodeError {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Byte stream with one byte of lookahead and a running offset.
///
/// `Interrupted` reads are retried; every other I/O error is returned to the
/// caller unchanged.
#[derive(Debug)]
pub(crate) struct ByteStream<R> {
    reader: BufReader<R>,
    offset: usize,
}

impl<R: Read> ByteStream<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            offset: 0,
        }
    }

    /// Number of bytes consumed so far.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn peek(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    pub(crate) fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.reader.consume(1);
            self.offset += 1;
        }
        Ok(byte)
    }

    /// Decodes the next UTF-8 encoded character.
    ///
    /// Continuation bytes are only consumed while they are valid, so after an
    /// error the stream is positioned at the first byte that broke the
    /// sequence.
    pub(crate) fn next_char(&mut self) -> Result<Option<char>, DecodeError> {
        let Some(lead) = self.next_byte()? else {
            return Ok(None);
        };
        if lead.is_ascii() {
            return Ok(Some(char::from(lead)));
        }

        let width = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(DecodeError::InvalidUtf8),
        };
        let mut bytes = [lead, 0, 0, 0];
        for slot in &mut bytes[1..width] {
            match self.peek()? {
                Some(byte @ 0x80..=0xBF) => {
                    *slot = byte;
                    self.next_byte()?;
                }
                _ => return Err(DecodeError::InvalidUtf8),
            }
        }

        match bstr::decode_utf8(&bytes[..width]) {
            (Some(c), len) if len == width => Ok(Some(c)),
            _ => Err(DecodeError::InvalidUtf8),
        }
    }
}
