//! JSON lexing and parsing.
//!
//! [`Lexer`] turns bytes into [`Terminal`]s, [`JsonParser`] runs them through
//! a pushdown automaton and reports the document structure to a [`Builder`].

mod builder;
mod error;
mod lexer;
mod parser;
mod print;
mod value;

pub use self::{
    builder::{Builder, Scalar},
    error::{ErrorSource, Expected, ParserError, SyntaxError},
    lexer::{Lexer, Terminal, TerminalKind},
    parser::{JsonParser, parse_json},
    print::PrintBuilder,
    value::{Array, DefaultBuilder, Map, Value, ValueError},
};
