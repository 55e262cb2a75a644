//! Splits a byte stream into JSON terminals.
//!
//! The lexer decodes UTF-8, skips the four JSON whitespace characters, and
//! tracks the 1-based line and column of every character it consumes. A
//! `\r\n` pair counts as a single line break.

use core::fmt;
use std::io::Read;

use super::error::{ErrorSource, ParserError, SyntaxError};
use crate::{
    buffer::CharBuffer,
    options::ParserOptions,
    source::{ByteStream, DecodeError},
};

/// Classification of a [`Terminal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    /// End of stream.
    Eos,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `null`, `true`, `false` or a number.
    ValueLiteral,
    /// A quoted string, unescaped.
    StringLiteral,
}

impl TerminalKind {
    pub(crate) const COUNT: usize = 9;

    pub(crate) const ALL: [Self; Self::COUNT] = [
        Self::Eos,
        Self::OpenBrace,
        Self::CloseBrace,
        Self::OpenBracket,
        Self::CloseBracket,
        Self::Colon,
        Self::Comma,
        Self::ValueLiteral,
        Self::StringLiteral,
    ];
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eos => "end of stream",
            Self::OpenBrace => "`{`",
            Self::CloseBrace => "`}`",
            Self::OpenBracket => "`[`",
            Self::CloseBracket => "`]`",
            Self::Colon => "`:`",
            Self::Comma => "`,`",
            Self::ValueLiteral => "literal",
            Self::StringLiteral => "string",
        })
    }
}

/// A classified token and the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    /// What was read.
    pub kind: TerminalKind,
    /// Unescaped text of a string, the text of `true`, `false` and numbers;
    /// `None` for punctuation, `null` and end of stream.
    pub value: Option<String>,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {:?}", self.line, self.column, self.kind)?;
        if let Some(value) = &self.value {
            write!(f, " {value:?}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: usize,
    column: usize,
}

type Result<T> = core::result::Result<T, ParserError>;

/// Pull lexer over any [`Read`].
///
/// ```
/// use plankton::{Lexer, TerminalKind};
///
/// let kinds: Vec<_> = Lexer::new(r#"{"a": null}"#.as_bytes())
///     .map(|terminal| terminal.unwrap().kind)
///     .collect();
/// assert_eq!(
///     kinds,
///     [
///         TerminalKind::OpenBrace,
///         TerminalKind::StringLiteral,
///         TerminalKind::Colon,
///         TerminalKind::ValueLiteral,
///         TerminalKind::CloseBrace,
///         TerminalKind::Eos,
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct Lexer<R> {
    stream: ByteStream<R>,
    buffer: CharBuffer,
    line: usize,
    column: usize,
    last_was_cr: bool,
    exhausted: bool,
}

impl<R: Read> Lexer<R> {
    /// Creates a lexer with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, &ParserOptions::default())
    }

    /// Creates a lexer using the buffer settings of `options`.
    pub fn with_options(reader: R, options: &ParserOptions) -> Self {
        Self {
            stream: ByteStream::new(reader),
            buffer: CharBuffer::with_chunk_size(options.buffer_chunk_size),
            line: 1,
            column: 1,
            last_was_cr: false,
            exhausted: false,
        }
    }

    /// Line of the next unread character.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the next unread character.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Reads the next terminal.
    ///
    /// Once the input is exhausted every call returns an
    /// [`Eos`](TerminalKind::Eos) terminal at the same position.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] for malformed input and an I/O error when the
    /// reader fails.
    pub fn next_terminal(&mut self) -> Result<Terminal> {
        loop {
            let Some((c, at)) = self.read()? else {
                return Ok(self.terminal(TerminalKind::Eos, None, self.here()));
            };
            let kind = match c {
                ' ' | '\t' | '\n' | '\r' => continue,
                '{' => TerminalKind::OpenBrace,
                '}' => TerminalKind::CloseBrace,
                '[' => TerminalKind::OpenBracket,
                ']' => TerminalKind::CloseBracket,
                ':' => TerminalKind::Colon,
                ',' => TerminalKind::Comma,
                '"' => return self.string(at),
                'n' => {
                    self.expect_rest("null")?;
                    return Ok(self.terminal(TerminalKind::ValueLiteral, None, at));
                }
                't' | 'f' => {
                    let word = if c == 't' { "true" } else { "false" };
                    self.expect_rest(word)?;
                    let value = Some(word.into());
                    return Ok(self.terminal(TerminalKind::ValueLiteral, value, at));
                }
                '-' | '0'..='9' => return self.number(c, at),
                other => return Err(error(SyntaxError::InvalidCharacter(other), at)),
            };
            return Ok(self.terminal(kind, None, at));
        }
    }

    fn terminal(&self, kind: TerminalKind, value: Option<String>, at: Position) -> Terminal {
        log::trace!("terminal {kind:?} at {}:{}", at.line, at.column);
        Terminal {
            kind,
            value,
            line: at.line,
            column: at.column,
        }
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Consumes one character and returns it with its position.
    fn read(&mut self) -> Result<Option<(char, Position)>> {
        let at = self.here();
        let c = match self.stream.next_char() {
            Ok(Some(c)) => c,
            Ok(None) => return Ok(None),
            Err(DecodeError::InvalidUtf8) => return Err(error(SyntaxError::InvalidUtf8, at)),
            Err(DecodeError::Io(err)) => return Err(error(err, at)),
        };
        match c {
            '\r' => {
                self.line += 1;
                self.column = 1;
            }
            '\n' if self.last_was_cr => {}
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        self.last_was_cr = c == '\r';
        Ok(Some((c, at)))
    }

    fn expect_rest(&mut self, word: &'static str) -> Result<()> {
        for expected in word.chars().skip(1) {
            match self.read()? {
                Some((c, _)) if c == expected => {}
                Some((_, at)) => {
                    return Err(error(SyntaxError::InvalidLiteral { expected: word }, at));
                }
                None => {
                    let at = self.here();
                    return Err(error(SyntaxError::InvalidLiteral { expected: word }, at));
                }
            }
        }
        Ok(())
    }

    fn number(&mut self, first: char, at: Position) -> Result<Terminal> {
        self.buffer.reset();
        self.buffer.push(first);
        loop {
            let next = self
                .stream
                .peek()
                .map_err(|err| error(err, self.here()))?;
            match next {
                Some(byte @ (b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')) => {
                    self.read()?;
                    self.buffer.push(char::from(byte));
                }
                _ => break,
            }
        }
        let text = self.buffer.to_string();
        Ok(self.terminal(TerminalKind::ValueLiteral, Some(text), at))
    }

    fn string(&mut self, at: Position) -> Result<Terminal> {
        self.buffer.reset();
        loop {
            match self.read()? {
                None => return Err(error(SyntaxError::UnterminatedString, at)),
                Some(('"', _)) => break,
                Some(('\\', escape_at)) => {
                    let c = self.escape(at, escape_at)?;
                    self.buffer.push(c);
                }
                Some((c, _)) => self.buffer.push(c),
            }
        }
        let text = self.buffer.to_string();
        Ok(self.terminal(TerminalKind::StringLiteral, Some(text), at))
    }

    fn escape(&mut self, string_at: Position, escape_at: Position) -> Result<char> {
        let Some((c, at)) = self.read()? else {
            return Err(error(SyntaxError::UnterminatedString, string_at));
        };
        Ok(match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => return self.unicode_escape(string_at, escape_at),
            other => return Err(error(SyntaxError::InvalidEscape(other), at)),
        })
    }

    /// Decodes the digits after `\u`, joining a surrogate pair into one
    /// character.
    fn unicode_escape(&mut self, string_at: Position, escape_at: Position) -> Result<char> {
        let invalid = |unit| error(SyntaxError::InvalidUnicodeEscapeSequence(unit), escape_at);
        let unit = self.hex4(string_at)?;
        let code = match unit {
            0xD800..=0xDBFF => {
                let paired = matches!(self.read()?, Some(('\\', _)))
                    && matches!(self.read()?, Some(('u', _)));
                if !paired {
                    return Err(invalid(unit));
                }
                let low = self.hex4(string_at)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(invalid(low));
                }
                0x1_0000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(invalid(unit)),
            _ => unit,
        };
        char::from_u32(code).ok_or_else(|| invalid(code))
    }

    fn hex4(&mut self, string_at: Position) -> Result<u32> {
        let mut unit = 0;
        for _ in 0..4 {
            let Some((c, at)) = self.read()? else {
                return Err(error(SyntaxError::UnterminatedString, string_at));
            };
            let digit = c
                .to_digit(16)
                .ok_or_else(|| error(SyntaxError::InvalidUnicodeEscapeChar(c), at))?;
            unit = unit * 16 + digit;
        }
        Ok(unit)
    }
}

fn error(source: impl Into<ErrorSource>, at: Position) -> ParserError {
    ParserError::new(source, at.line, at.column)
}

impl<R: Read> Iterator for Lexer<R> {
    type Item = Result<Terminal>;

    /// Yields terminals up to and including the first
    /// [`Eos`](TerminalKind::Eos) or error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let item = self.next_terminal();
        self.exhausted = match &item {
            Ok(terminal) => terminal.kind == TerminalKind::Eos,
            Err(_) => true,
        };
        Some(item)
    }
}
