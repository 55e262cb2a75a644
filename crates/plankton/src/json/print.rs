use core::fmt;

use super::{
    builder::{Builder, Scalar},
    value::write_escaped_string,
};

/// Streams parser events back out as JSON text.
///
/// The default layout indents nested members with one tab per level, writes
/// map entries as `"key" : value`, keeps empty containers on one line as `{}`
/// and `[]`, and ends the document with a newline. [`PrintBuilder::compact`]
/// writes the same document without any whitespace. Either way the output
/// is valid JSON that parses back to the same structure; numbers and
/// booleans are written exactly as they appeared in the input.
///
/// ```
/// use plankton::{PrintBuilder, parse_json};
///
/// let text = parse_json(r#"{"a":{},"b":[true]}"#.as_bytes(), PrintBuilder::new()).unwrap();
/// assert_eq!(text, "{\n\t\"a\" : {},\n\t\"b\" : [\n\t\ttrue\n\t]\n}\n");
/// ```
#[derive(Debug, Default)]
pub struct PrintBuilder<W = String> {
    out: W,
    /// One entry per open container: whether it already has a child.
    frames: Vec<bool>,
    after_key: bool,
    compact: bool,
}

impl PrintBuilder {
    /// Prints indented text into a new `String`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: fmt::Write> PrintBuilder<W> {
    /// Prints indented text into `out`.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            frames: Vec::new(),
            after_key: false,
            compact: false,
        }
    }

    /// Prints compact text into `out`.
    pub fn compact(out: W) -> Self {
        Self {
            compact: true,
            ..Self::with_writer(out)
        }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Starts a new member of the innermost container.
    fn separate(&mut self) -> fmt::Result {
        let Some(has_children) = self.frames.last_mut() else {
            return Ok(());
        };
        if core::mem::replace(has_children, true) {
            self.out.write_char(',')?;
        }
        self.newline(self.frames.len())
    }

    fn newline(&mut self, depth: usize) -> fmt::Result {
        if self.compact {
            return Ok(());
        }
        self.out.write_char('\n')?;
        for _ in 0..depth {
            self.out.write_char('\t')?;
        }
        Ok(())
    }

    /// Positions the output for a value: inline after a key, otherwise as a
    /// new member.
    fn begin_value(&mut self) -> fmt::Result {
        if core::mem::take(&mut self.after_key) {
            Ok(())
        } else {
            self.separate()
        }
    }

    fn open(&mut self, bracket: char) -> fmt::Result {
        self.begin_value()?;
        self.out.write_char(bracket)?;
        self.frames.push(false);
        Ok(())
    }

    fn close(&mut self, bracket: char) -> fmt::Result {
        if self.frames.pop() == Some(true) {
            self.newline(self.frames.len())?;
        }
        self.out.write_char(bracket)?;
        if self.frames.is_empty() && !self.compact {
            self.out.write_char('\n')?;
        }
        Ok(())
    }

    fn scalar(&mut self, value: Scalar<'_>) -> fmt::Result {
        self.begin_value()?;
        match value {
            Scalar::Null => self.out.write_str("null"),
            Scalar::Literal(text) => self.out.write_str(text),
            Scalar::String(text) => self.string(text),
        }
    }

    fn string(&mut self, text: &str) -> fmt::Result {
        self.out.write_char('"')?;
        write_escaped_string(text, &mut self.out)?;
        self.out.write_char('"')
    }
}

impl<W: fmt::Write> Builder for PrintBuilder<W> {
    type Output = W;
    type Error = fmt::Error;

    fn empty_stream(&mut self) -> fmt::Result {
        Ok(())
    }

    fn build_map(&mut self) -> fmt::Result {
        self.open('{')
    }

    fn build_map_key(&mut self, key: &str) -> fmt::Result {
        self.separate()?;
        self.string(key)?;
        self.out
            .write_str(if self.compact { ":" } else { " : " })?;
        self.after_key = true;
        Ok(())
    }

    fn build_map_value(&mut self, value: Scalar<'_>) -> fmt::Result {
        self.scalar(value)
    }

    fn finish_map(&mut self) -> fmt::Result {
        self.close('}')
    }

    fn build_array(&mut self) -> fmt::Result {
        self.open('[')
    }

    fn build_array_value(&mut self, value: Scalar<'_>) -> fmt::Result {
        self.scalar(value)
    }

    fn finish_array(&mut self) -> fmt::Result {
        self.close(']')
    }

    fn into_result(self) -> Result<W, fmt::Error> {
        Ok(self.out)
    }
}
