//! `application/x-www-form-urlencoded` decoding.
//!
//! The decoder is a two-state machine (`Key`, `Value`). Every input byte is
//! classified into an `Event`; the current state and the event select a
//! `Transition` from a static table, and its `Action` appends to the
//! buffer of the current state or commits the pair accumulated so far.
//!
//! | state | `c` | `%XY` | `+` | `=` | `&` |
//! |-------|-----|-------|-----|-----|-----|
//! | Key   | append | append decoded | append space | go to Value | commit |
//! | Value | append | append decoded | append space | append `=` | commit, go to Key |
//!
//! Bytes are decoded to text only when a pair is committed, so multi-byte
//! characters may be freely split across escapes (`%C3%A9`).

mod data;
mod encode;
mod error;

use std::io::Read;

use bstr::ByteSlice;

pub use self::{
    data::FormData,
    encode::{encode_pairs, percent_encode},
    error::{FormError, FormErrorKind},
};
use crate::{
    buffer::ByteBuffer,
    options::{DecodeMode, FormOptions},
    source::ByteStream,
    table::{Transition, TransitionTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Key,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Char,
    Equal,
    Ampersand,
    Percent,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Append the event's byte to the buffer of the current state.
    Append,
    AppendSpace,
    TakePair,
}

const STATES: usize = 2;
const EVENTS: usize = 5;

static TRANSITIONS: TransitionTable<State, Action, STATES, EVENTS> = {
    use self::{Action::*, Event::*, State::*};
    const K: usize = Key as usize;
    const V: usize = Value as usize;
    TransitionTable::new()
        .on(K, Char as usize, Key, Append)
        .on(K, Percent as usize, Key, Append)
        .on(K, Plus as usize, Key, AppendSpace)
        .to(K, Equal as usize, Value)
        .on(K, Ampersand as usize, Key, TakePair)
        .on(V, Char as usize, Value, Append)
        .on(V, Percent as usize, Value, Append)
        .on(V, Plus as usize, Value, AppendSpace)
        .on(V, Equal as usize, Value, Append)
        .on(V, Ampersand as usize, Key, TakePair)
};

/// Decoder for URL-encoded payloads.
///
/// The parser only holds its options; every [`parse`](Self::parse) call owns
/// its buffers and result, so one parser can serve many threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormParser {
    options: FormOptions,
}

impl FormParser {
    /// Creates a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    #[must_use]
    pub fn with_options(options: FormOptions) -> Self {
        Self { options }
    }

    /// Decodes every pair of `reader` until end of stream.
    ///
    /// # Errors
    ///
    /// Fails on a malformed or truncated `%` escape, on invalid UTF-8 when
    /// decoding strictly, and when the reader fails. No partial result is
    /// returned.
    pub fn parse<R: Read>(&self, reader: R) -> Result<FormData, FormError> {
        let mut stream = ByteStream::new(reader);
        let mut context = FormContext::new(&self.options);
        let mut state = State::Key;

        while let Some((event, byte)) = scan(&mut stream)? {
            let Some(Transition { next, action }) =
                TRANSITIONS.get(state as usize, event as usize)
            else {
                unreachable!("every event is accepted in {state:?}");
            };
            log::trace!("{state:?} --{event:?}--> {next:?}");
            match action {
                Some(Action::Append) => context.buffer(state).push(byte),
                Some(Action::AppendSpace) => context.buffer(state).push(b' '),
                Some(Action::TakePair) => context.take_pair(stream.offset() - 1)?,
                None => {}
            }
            state = next;
        }
        context.take_pair(stream.offset())?;

        log::debug!(
            "decoded {} pairs under {} keys from {} bytes",
            context.pairs,
            context.data.len(),
            stream.offset()
        );
        Ok(context.data)
    }
}

/// Decodes a URL-encoded payload with default options.
///
/// # Errors
///
/// See [`FormParser::parse`].
pub fn parse_url_encoded<R: Read>(reader: R) -> Result<FormData, FormError> {
    FormParser::new().parse(reader)
}

struct FormContext {
    key: ByteBuffer,
    value: ByteBuffer,
    data: FormData,
    mode: DecodeMode,
    pairs: usize,
}

impl FormContext {
    fn new(options: &FormOptions) -> Self {
        Self {
            key: ByteBuffer::with_chunk_size(options.buffer_chunk_size),
            value: ByteBuffer::with_chunk_size(options.buffer_chunk_size),
            data: FormData::new(),
            mode: options.decode_mode,
            pairs: 0,
        }
    }

    fn buffer(&mut self, state: State) -> &mut ByteBuffer {
        match state {
            State::Key => &mut self.key,
            State::Value => &mut self.value,
        }
    }

    fn take_pair(&mut self, offset: usize) -> Result<(), FormError> {
        if self.key.is_empty() && self.value.is_empty() {
            return Ok(());
        }
        let key = decode_text(self.key.as_slice(), self.mode, offset)?;
        let value = decode_text(self.value.as_slice(), self.mode, offset)?;
        self.data.insert(key, value);
        self.key.reset();
        self.value.reset();
        self.pairs += 1;
        Ok(())
    }
}

fn decode_text(bytes: &[u8], mode: DecodeMode, offset: usize) -> Result<Option<String>, FormError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    let text = match mode {
        DecodeMode::ReplaceInvalid => bytes.to_str_lossy().into_owned(),
        DecodeMode::Strict => bytes
            .to_str()
            .map_err(|_| FormError::new(FormErrorKind::InvalidUtf8, offset))?
            .to_owned(),
    };
    Ok(Some(text))
}

/// Reads one input unit: a plain byte or a complete `%XY` escape.
fn scan<R: Read>(stream: &mut ByteStream<R>) -> Result<Option<(Event, u8)>, FormError> {
    let offset = stream.offset();
    let byte = stream
        .next_byte()
        .map_err(|e| FormError::new(e.into(), offset))?;
    let scanned = match byte {
        None => return Ok(None),
        Some(b'=') => (Event::Equal, b'='),
        Some(b'&') => (Event::Ampersand, b'&'),
        Some(b'+') => (Event::Plus, b' '),
        Some(b'%') => {
            let high = hex_digit(stream, offset)?;
            let low = hex_digit(stream, offset)?;
            (Event::Percent, (high << 4) | low)
        }
        Some(other) => (Event::Char, other),
    };
    Ok(Some(scanned))
}

fn hex_digit<R: Read>(stream: &mut ByteStream<R>, escape_offset: usize) -> Result<u8, FormError> {
    let byte = stream
        .next_byte()
        .map_err(|e| FormError::new(e.into(), stream.offset()))?;
    let kind = match byte {
        Some(b @ b'0'..=b'9') => return Ok(b - b'0'),
        Some(b @ b'a'..=b'f') => return Ok(b - b'a' + 10),
        Some(b @ b'A'..=b'F') => return Ok(b - b'A' + 10),
        Some(b) => FormErrorKind::HexOutOfRange(b),
        None => FormErrorKind::TruncatedEscape,
    };
    Err(FormError::new(kind, escape_offset))
}
