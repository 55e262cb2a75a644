use core::{convert::Infallible, error::Error as StdError, fmt};
use std::io;

use thiserror::Error;

use super::lexer::TerminalKind;

/// A failed JSON parse, located at the 1-based line and column where it was
/// detected.
///
/// `E` is the error type of the [`Builder`](super::Builder) driven by the
/// parse; lexing on its own cannot fail with a builder error and uses the
/// default, [`Infallible`].
#[derive(Error, Debug)]
#[error("{source} at {line}:{column}")]
pub struct ParserError<E: StdError + 'static = Infallible> {
    /// What went wrong.
    pub source: ErrorSource<E>,
    /// Line of the offending character or terminal.
    pub line: usize,
    /// Column of the offending character or terminal.
    pub column: usize,
}

/// Origin of a [`ParserError`].
#[derive(Error, Debug)]
pub enum ErrorSource<E: StdError + 'static = Infallible> {
    /// The builder rejected an event.
    #[error("builder error: {0}")]
    Builder(E),
    /// The input is not well-formed.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// The underlying reader failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

/// Lexical and grammatical errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SyntaxError {
    /// A character that cannot start a terminal.
    #[error("invalid character '{}'", .0.escape_debug())]
    InvalidCharacter(char),
    /// A backslash followed by something other than a JSON escape.
    #[error("invalid escape character '{}'", .0.escape_debug())]
    InvalidEscape(char),
    /// A non-hex digit inside a four-digit unicode escape.
    #[error("invalid unicode escape sequence at character: '{}'", .0.escape_debug())]
    InvalidUnicodeEscapeChar(char),
    /// A lone or mismatched UTF-16 surrogate.
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscapeSequence(u32),
    /// A misspelled `null`, `true` or `false`.
    #[error("invalid literal, expected `{expected}`")]
    InvalidLiteral {
        /// The literal the input started to spell.
        expected: &'static str,
    },
    /// The input is not valid UTF-8.
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    /// End of stream inside a string.
    #[error("unterminated string")]
    UnterminatedString,
    /// The grammar has no transition for `found` in `state`.
    #[error("unexpected {} in state {state}, expected {expected}", describe(.found, .value.as_deref()))]
    UnexpectedTerminal {
        /// Name of the parser state.
        state: &'static str,
        /// Kind of the rejected terminal.
        found: TerminalKind,
        /// Text of the rejected terminal, if it carries any.
        value: Option<String>,
        /// What the state accepts.
        expected: Expected,
    },
}

fn describe(kind: &TerminalKind, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("{kind} `{value}`"),
        None => kind.to_string(),
    }
}

/// The terminal kinds a parser state would have accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expected(pub(crate) Vec<TerminalKind>);

impl Expected {
    /// The accepted kinds, in declaration order of [`TerminalKind`].
    #[must_use]
    pub fn kinds(&self) -> &[TerminalKind] {
        &self.0
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => f.write_str("nothing"),
            [only] => write!(f, "{only}"),
            [first, second] => write!(f, "{first} or {second}"),
            [rest @ .., last] => {
                f.write_str("one of ")?;
                for kind in rest {
                    write!(f, "{kind}, ")?;
                }
                write!(f, "or {last}")
            }
        }
    }
}

impl<E: StdError + 'static> ParserError<E> {
    pub(crate) fn new(source: impl Into<ErrorSource<E>>, line: usize, column: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }

    /// Returns the syntax error, if that is what failed.
    #[must_use]
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match &self.source {
            ErrorSource::Syntax(err) => Some(err),
            _ => None,
        }
    }
}

impl ParserError {
    /// Lifts a lexer error into the error type of a builder-driven parse.
    pub(crate) fn widen<E: StdError + 'static>(self) -> ParserError<E> {
        let source = match self.source {
            ErrorSource::Builder(never) => match never {},
            ErrorSource::Syntax(err) => ErrorSource::Syntax(err),
            ErrorSource::Io(err) => ErrorSource::Io(err),
        };
        ParserError {
            source,
            line: self.line,
            column: self.column,
        }
    }
}
