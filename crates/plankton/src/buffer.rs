//! Append-only accumulation buffers shared by both parsers.
//!
//! A [`GrowableBuffer`] collects the characters (JSON) or bytes (URL-encoded)
//! of the token currently being assembled. Growth is explicit: whenever the
//! remaining capacity cannot hold an append, the buffer reserves
//! `max(requested, chunk_size)` additional slots beyond its current length.
//! [`GrowableBuffer::reset`] only forgets the logical contents, so one buffer
//! is reused for every token of a parse without reallocating.

use core::fmt;

/// Growth step used when no explicit chunk size is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 32;

/// Growable accumulator with chunked, amortized O(1) appends.
#[derive(Debug, Clone)]
pub struct GrowableBuffer<T> {
    items: Vec<T>,
    chunk_size: usize,
}

/// Character accumulator used by the JSON lexer.
pub type CharBuffer = GrowableBuffer<char>;

/// Byte accumulator used by the URL-encoded decoder.
pub type ByteBuffer = GrowableBuffer<u8>;

impl<T: Copy> GrowableBuffer<T> {
    /// Creates an empty buffer growing in steps of [`DEFAULT_CHUNK_SIZE`].
    ///
    /// No storage is allocated until the first append.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Creates an empty buffer growing in steps of at least `chunk_size`
    /// elements. A chunk size of zero is treated as one.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            items: Vec::new(),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Appends one element.
    pub fn push(&mut self, item: T) {
        self.ensure_additional_space(1);
        self.items.push(item);
    }

    /// Appends every element of `items`, in order.
    pub fn extend_from_slice(&mut self, items: &[T]) {
        self.ensure_additional_space(items.len());
        self.items.extend_from_slice(items);
    }

    /// Forgets the contents while keeping the backing storage.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// Number of elements appended since the last reset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing was appended since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements the buffer holds before it must grow again.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Minimum growth step.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// The accumulated elements.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Copies the accumulated elements into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    fn ensure_additional_space(&mut self, space: usize) {
        if self.items.capacity() - self.items.len() < space {
            self.items.reserve_exact(space.max(self.chunk_size));
        }
    }
}

impl<T: Copy> Default for GrowableBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.items.iter().try_for_each(|c| fmt::Write::write_char(f, *c))
    }
}
