//! Pushdown automaton over lexer terminals.
//!
//! The current state and the kind of the next terminal select a transition
//! from a static table. Opening a container pushes the state to resume once
//! it closes; a closing bracket pops it.

use core::fmt;
use std::io::Read;

use super::{
    builder::{Builder, Scalar},
    error::{ErrorSource, Expected, ParserError, SyntaxError},
    lexer::{Lexer, Terminal, TerminalKind},
};
use crate::{
    options::ParserOptions,
    table::{Transition, TransitionTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Initial,
    Map,
    MapKey,
    MapAssign,
    MapValue,
    Array,
    ArrayValue,
    Finished,
}

impl ParseState {
    const COUNT: usize = 8;

    fn name(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::Map => "Map",
            Self::MapKey => "MapKey",
            Self::MapAssign => "MapAssign",
            Self::MapValue => "MapValue",
            Self::Array => "Array",
            Self::ArrayValue => "ArrayValue",
            Self::Finished => "Finished",
        }
    }
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    State(ParseState),
    /// Resume the state saved when the innermost container opened.
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    /// Open a map and save the state to resume after it.
    OpenMap(ParseState),
    OpenArray(ParseState),
    EmptyStream,
    MapKey,
    MapValue,
    ArrayValue,
    CloseMap,
    CloseArray,
}

#[rustfmt::skip]
static TRANSITIONS: TransitionTable<Target, Operation, { ParseState::COUNT }, { TerminalKind::COUNT }> = {
    use self::{Operation as Op, ParseState as S, TerminalKind as T};
    const fn s(state: S) -> Target {
        Target::State(state)
    }
    TransitionTable::new()
        .on(S::Initial as usize, T::OpenBrace as usize, s(S::Map), Op::OpenMap(S::Finished))
        .on(S::Initial as usize, T::OpenBracket as usize, s(S::Array), Op::OpenArray(S::Finished))
        .on(S::Initial as usize, T::Eos as usize, s(S::Finished), Op::EmptyStream)
        .on(S::Map as usize, T::StringLiteral as usize, s(S::MapKey), Op::MapKey)
        .on(S::Map as usize, T::CloseBrace as usize, Target::Return, Op::CloseMap)
        .to(S::MapKey as usize, T::Colon as usize, s(S::MapAssign))
        .on(S::MapAssign as usize, T::StringLiteral as usize, s(S::MapValue), Op::MapValue)
        .on(S::MapAssign as usize, T::ValueLiteral as usize, s(S::MapValue), Op::MapValue)
        .on(S::MapAssign as usize, T::OpenBrace as usize, s(S::Map), Op::OpenMap(S::MapValue))
        .on(S::MapAssign as usize, T::OpenBracket as usize, s(S::Array), Op::OpenArray(S::MapValue))
        .on(S::MapValue as usize, T::CloseBrace as usize, Target::Return, Op::CloseMap)
        .to(S::MapValue as usize, T::Comma as usize, s(S::Map))
        .on(S::Array as usize, T::StringLiteral as usize, s(S::ArrayValue), Op::ArrayValue)
        .on(S::Array as usize, T::ValueLiteral as usize, s(S::ArrayValue), Op::ArrayValue)
        .on(S::Array as usize, T::OpenBracket as usize, s(S::Array), Op::OpenArray(S::ArrayValue))
        .on(S::Array as usize, T::OpenBrace as usize, s(S::Map), Op::OpenMap(S::ArrayValue))
        .on(S::Array as usize, T::CloseBracket as usize, Target::Return, Op::CloseArray)
        .to(S::ArrayValue as usize, T::Comma as usize, s(S::Array))
        .on(S::ArrayValue as usize, T::CloseBracket as usize, Target::Return, Op::CloseArray)
};

/// Table-driven JSON parser.
///
/// Like [`FormParser`](crate::FormParser) it only holds options, so a single
/// parser value can be shared freely; all parse state lives in the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser {
    options: ParserOptions,
}

impl JsonParser {
    /// Creates a parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given options.
    #[must_use]
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Parses one document from `reader`, reporting its structure to
    /// `builder`, and returns what the builder produced.
    ///
    /// # Errors
    ///
    /// Fails on malformed input, when the reader fails, and when the builder
    /// rejects an event.
    pub fn parse<R: Read, B: Builder>(
        &self,
        reader: R,
        mut builder: B,
    ) -> Result<B::Output, ParserError<B::Error>> {
        let mut lexer = Lexer::with_options(reader, &self.options);
        self.parse_terminals(&mut lexer, &mut builder)?;
        let (line, column) = (lexer.line(), lexer.column());
        builder
            .into_result()
            .map_err(|err| ParserError::new(ErrorSource::Builder(err), line, column))
    }

    /// Drives `builder` with terminals from an existing lexer until the root
    /// value closes.
    ///
    /// Unless [`ParserOptions::reject_trailing_content`] is set, the lexer is
    /// left positioned right after the root value, so the caller may keep
    /// reading from it.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn parse_terminals<R: Read, B: Builder>(
        &self,
        lexer: &mut Lexer<R>,
        builder: &mut B,
    ) -> Result<(), ParserError<B::Error>> {
        let mut state = ParseState::Initial;
        let mut stack = Vec::new();
        let mut terminals = 0_usize;

        while state != ParseState::Finished {
            let terminal = lexer.next_terminal().map_err(ParserError::widen::<B::Error>)?;
            terminals += 1;
            let Some(Transition { next, action }) =
                TRANSITIONS.get(state as usize, terminal.kind as usize)
            else {
                return Err(unexpected(state, terminal).widen());
            };
            if let Some(operation) = action {
                apply(operation, &terminal, builder, &mut stack).map_err(|err| {
                    ParserError::new(ErrorSource::Builder(err), terminal.line, terminal.column)
                })?;
            }
            let resumed = match next {
                Target::State(next) => next,
                Target::Return => {
                    let Some(saved) = stack.pop() else {
                        unreachable!("every container pushes a return state");
                    };
                    saved
                }
            };
            log::trace!("{state} --{:?}--> {resumed}", terminal.kind);
            state = resumed;
        }

        if self.options.reject_trailing_content {
            let terminal = lexer.next_terminal().map_err(ParserError::widen::<B::Error>)?;
            if terminal.kind != TerminalKind::Eos {
                return Err(unexpected(state, terminal).widen());
            }
        }

        log::debug!(
            "parsed {terminals} terminals, stopped at {}:{}",
            lexer.line(),
            lexer.column()
        );
        Ok(())
    }
}

/// Parses one document with default options.
///
/// ```
/// use plankton::{DefaultBuilder, parse_json};
///
/// let value = parse_json(r#"{"a": [1, 2, 3, {"a": 1}]}"#.as_bytes(), DefaultBuilder::new()).unwrap();
/// assert_eq!(value["a"][3]["a"].as_str(), Some("1"));
/// ```
///
/// # Errors
///
/// See [`JsonParser::parse`].
pub fn parse_json<R: Read, B: Builder>(
    reader: R,
    builder: B,
) -> Result<B::Output, ParserError<B::Error>> {
    JsonParser::new().parse(reader, builder)
}

fn apply<B: Builder>(
    operation: Operation,
    terminal: &Terminal,
    builder: &mut B,
    stack: &mut Vec<ParseState>,
) -> Result<(), B::Error> {
    match operation {
        Operation::OpenMap(resume) => {
            stack.push(resume);
            builder.build_map()
        }
        Operation::OpenArray(resume) => {
            stack.push(resume);
            builder.build_array()
        }
        Operation::EmptyStream => builder.empty_stream(),
        Operation::MapKey => builder.build_map_key(terminal.value.as_deref().unwrap_or_default()),
        Operation::MapValue => builder.build_map_value(scalar(terminal)),
        Operation::ArrayValue => builder.build_array_value(scalar(terminal)),
        Operation::CloseMap => builder.finish_map(),
        Operation::CloseArray => builder.finish_array(),
    }
}

fn scalar(terminal: &Terminal) -> Scalar<'_> {
    match (terminal.kind, terminal.value.as_deref()) {
        (TerminalKind::StringLiteral, text) => Scalar::String(text.unwrap_or_default()),
        (_, Some(text)) => Scalar::Literal(text),
        (_, None) => Scalar::Null,
    }
}

fn unexpected(state: ParseState, terminal: Terminal) -> ParserError {
    let expected = match state {
        ParseState::Finished => vec![TerminalKind::Eos],
        _ => TRANSITIONS
            .accepted(state as usize)
            .map(|kind| TerminalKind::ALL[kind])
            .collect(),
    };
    let error = SyntaxError::UnexpectedTerminal {
        state: state.name(),
        found: terminal.kind,
        value: terminal.value,
        expected: Expected(expected),
    };
    ParserError::new(error, terminal.line, terminal.column)
}
