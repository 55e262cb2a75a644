use crate::buffer::DEFAULT_CHUNK_SIZE;

/// Configuration options for the JSON lexer and parser.
///
/// # Examples
///
/// ```rust
/// use plankton::{DefaultBuilder, JsonParser, ParserOptions};
///
/// let parser = JsonParser::with_options(ParserOptions {
///     reject_trailing_content: true,
///     ..Default::default()
/// });
/// assert!(parser.parse("[] []".as_bytes(), DefaultBuilder::new()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether input after the root value is a grammar error.
    ///
    /// By default the parser stops reading once the root container closes
    /// and ignores whatever follows. When `true`, the parser reads one more
    /// terminal and fails unless it is the end of the stream.
    ///
    /// # Default
    ///
    /// `false`
    pub reject_trailing_content: bool,

    /// Minimum growth step, in characters, of the lexer's token buffer.
    ///
    /// Zero is treated as one.
    ///
    /// # Default
    ///
    /// `32`
    pub buffer_chunk_size: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            reject_trailing_content: false,
            buffer_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// How decoded key and value bytes are turned into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Invalid UTF-8 sequences become U+FFFD REPLACEMENT CHARACTER.
    #[default]
    ReplaceInvalid,
    /// Invalid UTF-8 fails the parse with [`FormErrorKind::InvalidUtf8`].
    ///
    /// [`FormErrorKind::InvalidUtf8`]: crate::FormErrorKind::InvalidUtf8
    Strict,
}

/// Configuration options for the URL-encoded decoder.
///
/// # Examples
///
/// ```rust
/// use plankton::{DecodeMode, FormOptions, FormParser};
///
/// let parser = FormParser::with_options(FormOptions {
///     decode_mode: DecodeMode::Strict,
///     ..Default::default()
/// });
/// assert!(parser.parse("k=%FF".as_bytes()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    /// Treatment of percent-decoded bytes that are not valid UTF-8.
    ///
    /// # Default
    ///
    /// [`DecodeMode::ReplaceInvalid`]
    pub decode_mode: DecodeMode,

    /// Minimum growth step, in bytes, of the key and value buffers.
    ///
    /// # Default
    ///
    /// `32`
    pub buffer_chunk_size: usize,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            decode_mode: DecodeMode::default(),
            buffer_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// How [`DefaultBuilder`](crate::DefaultBuilder) materializes scalar leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScalarMode {
    /// Every non-null leaf becomes [`Value::String`](crate::Value::String)
    /// holding its lexical text, so `1.50` stays `"1.50"`.
    #[default]
    Raw,
    /// `true`/`false` become booleans and numeric literals become `f64`
    /// numbers.
    Typed,
}
