//! Picks a parser for a request body from its `Content-Type`.

use std::io::Read;

use thiserror::Error;

use crate::{
    form::{FormData, FormError, FormParser},
    json::{DefaultBuilder, JsonParser, ParserError, Value, ValueError},
    options::{FormOptions, ParserOptions},
};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";

/// The media type of a `Content-Type` header value: everything before the
/// first `;`, without surrounding whitespace.
///
/// ```
/// assert_eq!(plankton::media_type(" application/json ; charset=utf-8"), "application/json");
/// ```
#[must_use]
pub fn media_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
}

/// A decoded request body.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Content {
    /// `application/x-www-form-urlencoded`
    Form(FormData),
    /// `application/json`, with raw scalars.
    Json(Value),
    /// Any other or missing content type. The body was not read.
    Unsupported,
}

/// Failure of the parser selected by [`ContentParser`].
#[derive(Debug, Error)]
pub enum ContentError {
    /// The URL-encoded decoder failed.
    #[error(transparent)]
    Form(#[from] FormError),
    /// The JSON parser failed.
    #[error(transparent)]
    Json(#[from] ParserError<ValueError>),
}

/// Dispatches request bodies to the matching parser.
///
/// Media types are compared ASCII case-insensitively. Multipart bodies are
/// not handled and come back as [`Content::Unsupported`].
///
/// ```
/// use plankton::{Content, ContentParser};
///
/// let parser = ContentParser::new();
/// let body = parser
///     .parse(Some("application/x-www-form-urlencoded; charset=UTF-8"), "q=fsm".as_bytes())
///     .unwrap();
/// let Content::Form(form) = body else { panic!() };
/// assert_eq!(form.first("q"), Some("fsm"));
///
/// let body = parser.parse(Some("text/plain"), "q=fsm".as_bytes()).unwrap();
/// assert_eq!(body, Content::Unsupported);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentParser {
    form: FormParser,
    json: JsonParser,
}

impl ContentParser {
    /// Creates a dispatcher whose parsers use default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher with explicit options for each parser.
    #[must_use]
    pub fn with_options(form: FormOptions, json: ParserOptions) -> Self {
        Self {
            form: FormParser::with_options(form),
            json: JsonParser::with_options(json),
        }
    }

    /// Parses `reader` according to `content_type`.
    ///
    /// # Errors
    ///
    /// Returns the error of the selected parser.
    pub fn parse<R: Read>(
        &self,
        content_type: Option<&str>,
        reader: R,
    ) -> Result<Content, ContentError> {
        let media = content_type.map(media_type).unwrap_or_default();
        if media.eq_ignore_ascii_case(FORM_URLENCODED) {
            log::debug!("decoding {media} body as form data");
            Ok(Content::Form(self.form.parse(reader)?))
        } else if media.eq_ignore_ascii_case(JSON) {
            log::debug!("decoding {media} body as JSON");
            let value = self.json.parse(reader, DefaultBuilder::new())?;
            Ok(Content::Json(value))
        } else {
            log::debug!("no parser for content type {content_type:?}");
            Ok(Content::Unsupported)
        }
    }
}
