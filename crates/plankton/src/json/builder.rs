use core::error::Error as StdError;

/// A scalar leaf handed to a [`Builder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar<'a> {
    /// The `null` literal.
    Null,
    /// An unescaped string literal.
    String(&'a str),
    /// The text of `true`, `false` or a number, exactly as it appeared.
    Literal(&'a str),
}

/// Receives the structure of a JSON document as the parser recognizes it.
///
/// The parser calls the methods in document order. Every `build_map` and
/// `build_array` is matched by a `finish_map` or `finish_array`, and inside a
/// map every value (scalar or container) is preceded by `build_map_key`. A
/// document without any content produces a single `empty_stream` call.
///
/// Returning an error aborts the parse; it surfaces as
/// [`ErrorSource::Builder`](crate::ErrorSource::Builder).
///
/// # Examples
///
/// Counting leaves without materializing anything:
///
/// ```
/// use core::convert::Infallible;
///
/// use plankton::{Builder, Scalar, parse_json};
///
/// #[derive(Default)]
/// struct Leaves(usize);
///
/// impl Builder for Leaves {
///     type Output = usize;
///     type Error = Infallible;
///
///     fn empty_stream(&mut self) -> Result<(), Infallible> { Ok(()) }
///     fn build_map(&mut self) -> Result<(), Infallible> { Ok(()) }
///     fn build_map_key(&mut self, _: &str) -> Result<(), Infallible> { Ok(()) }
///     fn build_map_value(&mut self, _: Scalar<'_>) -> Result<(), Infallible> {
///         self.0 += 1;
///         Ok(())
///     }
///     fn finish_map(&mut self) -> Result<(), Infallible> { Ok(()) }
///     fn build_array(&mut self) -> Result<(), Infallible> { Ok(()) }
///     fn build_array_value(&mut self, _: Scalar<'_>) -> Result<(), Infallible> {
///         self.0 += 1;
///         Ok(())
///     }
///     fn finish_array(&mut self) -> Result<(), Infallible> { Ok(()) }
///     fn into_result(self) -> Result<usize, Infallible> { Ok(self.0) }
/// }
///
/// let leaves = parse_json(r#"{"a": [1, 2, {"b": null}]}"#.as_bytes(), Leaves::default());
/// assert_eq!(leaves.unwrap(), 3);
/// ```
pub trait Builder {
    /// What [`into_result`](Self::into_result) produces.
    type Output;
    /// Error raised to abort the parse.
    type Error: StdError + 'static;

    /// The input held nothing but whitespace.
    fn empty_stream(&mut self) -> Result<(), Self::Error>;
    /// A map opens.
    fn build_map(&mut self) -> Result<(), Self::Error>;
    /// The key of the next map entry.
    fn build_map_key(&mut self, key: &str) -> Result<(), Self::Error>;
    /// A scalar value for the last key.
    fn build_map_value(&mut self, value: Scalar<'_>) -> Result<(), Self::Error>;
    /// The innermost open map closes.
    fn finish_map(&mut self) -> Result<(), Self::Error>;
    /// An array opens.
    fn build_array(&mut self) -> Result<(), Self::Error>;
    /// A scalar element of the innermost open array.
    fn build_array_value(&mut self, value: Scalar<'_>) -> Result<(), Self::Error>;
    /// The innermost open array closes.
    fn finish_array(&mut self) -> Result<(), Self::Error>;
    /// Consumes the builder once the document is complete.
    fn into_result(self) -> Result<Self::Output, Self::Error>;
}
