use std::io;

use thiserror::Error;

/// Failure while decoding a URL-encoded payload.
#[derive(Debug, Error)]
#[error("{kind} at byte {offset}")]
pub struct FormError {
    /// What went wrong.
    pub kind: FormErrorKind,
    /// Byte offset of the `%` for escape errors, of the pair separator (or
    /// end of input) for text errors, and of the failed read for I/O errors.
    pub offset: usize,
}

/// Reason a [`FormError`] was raised.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormErrorKind {
    /// A `%` escape contained something other than a hex digit.
    #[error("hex value out of range: '{}'", char::from(*.0))]
    HexOutOfRange(u8),
    /// The input ended before both digits of a `%` escape.
    #[error("truncated percent escape")]
    TruncatedEscape,
    /// A decoded key or value was not UTF-8 under [`DecodeMode::Strict`].
    ///
    /// [`DecodeMode::Strict`]: crate::DecodeMode::Strict
    #[error("invalid UTF-8 in decoded text")]
    InvalidUtf8,
    /// The underlying reader failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

impl FormError {
    pub(crate) fn new(kind: FormErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}
