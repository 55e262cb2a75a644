//! Streaming, table-driven parsers for `application/x-www-form-urlencoded`
//! payloads and JSON documents.
//!
//! Both parsers pull bytes from any [`std::io::Read`], classify each input
//! unit, and look up the next step in a dense, statically built transition
//! table. Neither builds an AST on its own:
//!
//! - the URL-encoded decoder accumulates pairs into [`FormData`], and
//! - the JSON parser reports structure to a caller-supplied [`Builder`]. Two
//!   builders ship with the crate: [`DefaultBuilder`] materializes a
//!   [`Value`] and [`PrintBuilder`] streams an indented re-serialization.
//!
//! ```rust
//! use plankton::{DefaultBuilder, Value, parse_json, parse_url_encoded};
//!
//! let form = parse_url_encoded("a=1&a=2&b=3".as_bytes()).unwrap();
//! assert_eq!(form.get("a"), Some(&[Some("1".into()), Some("2".into())][..]));
//!
//! let value = parse_json(r#"{"a": [1, null]}"#.as_bytes(), DefaultBuilder::new()).unwrap();
//! assert_eq!(value.to_string(), r#"{"a":["1",null]}"#);
//! # let _: Value = value;
//! ```

mod buffer;
mod content;
mod form;
mod json;
mod options;
mod source;
mod table;

#[cfg(test)]
mod tests;

pub use buffer::{ByteBuffer, CharBuffer, DEFAULT_CHUNK_SIZE, GrowableBuffer};
pub use content::{Content, ContentError, ContentParser, media_type};
pub use form::{
    FormData, FormError, FormErrorKind, FormParser, encode_pairs, parse_url_encoded,
    percent_encode,
};
pub use json::{
    Array, Builder, DefaultBuilder, ErrorSource, Expected, JsonParser, Lexer, Map, ParserError,
    PrintBuilder, Scalar, SyntaxError, Terminal, TerminalKind, Value, ValueError, parse_json,
};
pub use options::{DecodeMode, FormOptions, ParserOptions, ScalarMode};
