//! JSON value types and the builder that materializes them.
//!
//! This module defines the [`Value`] enum, which represents any JSON value,
//! [`DefaultBuilder`], which assembles a [`Value`] from parser events, and
//! helpers for escaping JSON strings.
use core::{fmt, mem, ops::Index, slice};
use std::collections::{BTreeMap, btree_map};

use thiserror::Error;

use super::{builder::Builder, builder::Scalar, print::PrintBuilder};
use crate::options::ScalarMode;

/// Members of a JSON object.
pub type Map = BTreeMap<String, Value>;
/// Elements of a JSON array.
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use plankton::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
// Enable serde support for tests and when the optional `serde` feature is
// activated by downstream crates.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(test, feature = "serde"), serde(untagged))]
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// `null`.
    #[default]
    Null,
    /// `true` or `false`; parsing only produces it in [`ScalarMode::Typed`].
    Boolean(bool),
    /// A number; parsing only produces finite ones, in [`ScalarMode::Typed`].
    Number(f64),
    /// A string, or in [`ScalarMode::Raw`] the text of any non-null scalar.
    String(String),
    /// An ordered sequence of values.
    Array(Array),
    /// Members keyed by name; a repeated key keeps the last value.
    Object(Map),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Drop for Value {
    /// Empties nested containers into a worklist, so dropping a deeply nested
    /// value does not recurse once per level.
    fn drop(&mut self) {
        let mut pending = match self {
            Self::Array(items) if !items.is_empty() => mem::take(items),
            Self::Object(map) if !map.is_empty() => mem::take(map).into_values().collect(),
            _ => return,
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Self::Array(items) => pending.append(items),
                Self::Object(map) => pending.extend(mem::take(map).into_values()),
                _ => {}
            }
        }
    }
}

static NULL: Value = Value::Null;

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Array`](Value::Array).
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`](Value::Object).
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// The text of a [`String`](Value::String).
    ///
    /// ```
    /// use plankton::{DefaultBuilder, parse_json};
    ///
    /// let v = parse_json(r#"{"n": 1.50}"#.as_bytes(), DefaultBuilder::new()).unwrap();
    /// assert_eq!(v["n"].as_str(), Some("1.50"));
    /// ```
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The flag of a [`Boolean`](Value::Boolean).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The number of a [`Number`](Value::Number).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The items of an [`Array`](Value::Array).
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The members of an [`Object`](Value::Object).
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Emits this value to `builder` as if it had been parsed.
    ///
    /// Nesting is walked with an explicit stack, so arbitrarily deep values
    /// replay without recursion. The parser only produces container roots; a
    /// scalar `self` is replayed as a one-element array.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first builder error.
    pub fn replay<B: Builder>(&self, builder: &mut B) -> Result<(), B::Error> {
        enum Cursor<'a> {
            Object(btree_map::Iter<'a, String, Value>),
            Array(slice::Iter<'a, Value>),
        }

        let mut stack = match self {
            Self::Object(map) => {
                builder.build_map()?;
                vec![Cursor::Object(map.iter())]
            }
            Self::Array(items) => {
                builder.build_array()?;
                vec![Cursor::Array(items.iter())]
            }
            scalar => {
                builder.build_array()?;
                emit_scalar(builder, false, scalar)?;
                return builder.finish_array();
            }
        };

        loop {
            let (child, in_object) = match stack.last_mut() {
                None => return Ok(()),
                Some(Cursor::Object(entries)) => {
                    if let Some((key, value)) = entries.next() {
                        builder.build_map_key(key)?;
                        (value, true)
                    } else {
                        stack.pop();
                        builder.finish_map()?;
                        continue;
                    }
                }
                Some(Cursor::Array(items)) => {
                    if let Some(value) = items.next() {
                        (value, false)
                    } else {
                        stack.pop();
                        builder.finish_array()?;
                        continue;
                    }
                }
            };
            match child {
                Self::Object(map) => {
                    builder.build_map()?;
                    stack.push(Cursor::Object(map.iter()));
                }
                Self::Array(items) => {
                    builder.build_array()?;
                    stack.push(Cursor::Array(items.iter()));
                }
                scalar => emit_scalar(builder, in_object, scalar)?,
            }
        }
    }

    /// Indented rendering produced by [`PrintBuilder`].
    ///
    /// ```
    /// use plankton::{DefaultBuilder, parse_json};
    ///
    /// let v = parse_json(r#"{"a":[1,null]}"#.as_bytes(), DefaultBuilder::typed()).unwrap();
    /// assert_eq!(v.to_pretty_string(), "{\n\t\"a\" : [\n\t\t1,\n\t\tnull\n\t]\n}\n");
    /// ```
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let mut printer = PrintBuilder::new();
        self.replay(&mut printer)
            .expect("writing to a String cannot fail");
        printer.into_inner()
    }
}

fn emit_scalar<B: Builder>(
    builder: &mut B,
    in_object: bool,
    value: &Value,
) -> Result<(), B::Error> {
    let emit = |builder: &mut B, scalar: Scalar<'_>| {
        if in_object {
            builder.build_map_value(scalar)
        } else {
            builder.build_array_value(scalar)
        }
    };
    match value {
        Value::Null => emit(builder, Scalar::Null),
        Value::Boolean(true) => emit(builder, Scalar::Literal("true")),
        Value::Boolean(false) => emit(builder, Scalar::Literal("false")),
        Value::Number(n) if n.is_finite() => emit(builder, Scalar::Literal(&n.to_string())),
        // JSON has no spelling for NaN or the infinities.
        Value::Number(_) => emit(builder, Scalar::Null),
        Value::String(s) => emit(builder, Scalar::String(s)),
        Value::Array(_) | Value::Object(_) => unreachable!("containers are walked by replay"),
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Member `key` of an object, or [`Value::Null`] when absent.
    fn index(&self, key: &str) -> &Value {
        self.as_object()
            .and_then(|map| map.get(key))
            .unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Element `index` of an array, or [`Value::Null`] when absent.
    fn index(&self, index: usize) -> &Value {
        self.as_array()
            .and_then(|items| items.get(index))
            .unwrap_or(&NULL)
    }
}

/// Escapes a string for inclusion in a JSON string literal.
///
/// Quotes, backslashes, control characters (<= U+001F) and the Unicode line
/// separators are written as JSON escape sequences.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            // Pre-2019 JSON parsers may not accept these raw.
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_control() && (c as u32) <= 0xFFFF => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Value {
    /// Compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) if n.is_finite() => write!(f, "{n}"),
            Value::Number(_) => f.write_str("null"),
            Value::String(s) => {
                f.write_str("\"")?;
                write_escaped_string(s, f)?;
                f.write_str("\"")
            }
            Value::Array(_) | Value::Object(_) => self.replay(&mut PrintBuilder::compact(f)),
        }
    }
}

/// Errors raised by [`DefaultBuilder`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueError {
    /// A numeric literal that does not parse as a finite `f64` in typed mode.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    /// A map value arrived without a key.
    #[error("map value without a key")]
    MissingKey,
    /// A container closed that was not open, or a key arrived outside a map.
    #[error("unbalanced container events")]
    Unbalanced,
    /// The event stream ended before the root value was complete.
    #[error("incomplete document")]
    Incomplete,
}

#[derive(Debug)]
enum Frame {
    Object { map: Map, key: Option<String> },
    Array(Array),
}

/// Builds a [`Value`] from parser events.
///
/// In the default [`ScalarMode::Raw`] every non-null leaf becomes a
/// [`Value::String`] holding its lexical text. [`ScalarMode::Typed`] turns
/// `true`/`false` into booleans and numeric text into numbers instead.
/// An empty stream produces an empty object; a repeated key keeps the last
/// value.
///
/// ```
/// use plankton::{DefaultBuilder, Value, parse_json};
///
/// let doc = r#"{"n": 2, "ok": true}"#;
/// let raw = parse_json(doc.as_bytes(), DefaultBuilder::new()).unwrap();
/// assert_eq!(raw["n"], Value::String("2".into()));
///
/// let typed = parse_json(doc.as_bytes(), DefaultBuilder::typed()).unwrap();
/// assert_eq!(typed["n"], Value::Number(2.0));
/// assert_eq!(typed["ok"], Value::Boolean(true));
/// ```
#[derive(Debug, Default)]
pub struct DefaultBuilder {
    mode: ScalarMode,
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl DefaultBuilder {
    /// A builder in [`ScalarMode::Raw`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder in [`ScalarMode::Typed`].
    #[must_use]
    pub fn typed() -> Self {
        Self::with_mode(ScalarMode::Typed)
    }

    /// A builder that handles scalars according to `mode`.
    #[must_use]
    pub fn with_mode(mode: ScalarMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    fn scalar(&self, scalar: Scalar<'_>) -> Result<Value, ValueError> {
        Ok(match (self.mode, scalar) {
            (_, Scalar::Null) => Value::Null,
            (ScalarMode::Raw, Scalar::String(s) | Scalar::Literal(s))
            | (ScalarMode::Typed, Scalar::String(s)) => Value::String(s.to_owned()),
            (ScalarMode::Typed, Scalar::Literal("true")) => Value::Boolean(true),
            (ScalarMode::Typed, Scalar::Literal("false")) => Value::Boolean(false),
            (ScalarMode::Typed, Scalar::Literal(text)) => match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Number(n),
                _ => return Err(ValueError::InvalidNumber(text.to_owned())),
            },
        })
    }

    /// Places a completed value into the innermost open container.
    fn attach(&mut self, value: Value) -> Result<(), ValueError> {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Object { map, key }) => {
                let key = key.take().ok_or(ValueError::MissingKey)?;
                map.insert(key, value);
            }
            Some(Frame::Array(items)) => items.push(value),
        }
        Ok(())
    }
}

impl Builder for DefaultBuilder {
    type Output = Value;
    type Error = ValueError;

    fn empty_stream(&mut self) -> Result<(), ValueError> {
        self.root = Some(Value::Object(Map::new()));
        Ok(())
    }

    fn build_map(&mut self) -> Result<(), ValueError> {
        self.stack.push(Frame::Object {
            map: Map::new(),
            key: None,
        });
        Ok(())
    }

    fn build_map_key(&mut self, key: &str) -> Result<(), ValueError> {
        match self.stack.last_mut() {
            Some(Frame::Object { key: slot, .. }) => {
                *slot = Some(key.to_owned());
                Ok(())
            }
            _ => Err(ValueError::Unbalanced),
        }
    }

    fn build_map_value(&mut self, value: Scalar<'_>) -> Result<(), ValueError> {
        if !matches!(self.stack.last(), Some(Frame::Object { .. })) {
            return Err(ValueError::Unbalanced);
        }
        let value = self.scalar(value)?;
        self.attach(value)
    }

    fn finish_map(&mut self) -> Result<(), ValueError> {
        match self.stack.pop() {
            Some(Frame::Object { map, .. }) => self.attach(Value::Object(map)),
            _ => Err(ValueError::Unbalanced),
        }
    }

    fn build_array(&mut self) -> Result<(), ValueError> {
        self.stack.push(Frame::Array(Array::new()));
        Ok(())
    }

    fn build_array_value(&mut self, value: Scalar<'_>) -> Result<(), ValueError> {
        if !matches!(self.stack.last(), Some(Frame::Array(_))) {
            return Err(ValueError::Unbalanced);
        }
        let value = self.scalar(value)?;
        self.attach(value)
    }

    fn finish_array(&mut self) -> Result<(), ValueError> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.attach(Value::Array(items)),
            _ => Err(ValueError::Unbalanced),
        }
    }

    fn into_result(self) -> Result<Value, ValueError> {
        if !self.stack.is_empty() {
            return Err(ValueError::Incomplete);
        }
        self.root.ok_or(ValueError::Incomplete)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn object(entries: &[(&str, Value)]) -> Value {
        Value::Object(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn builds_nested_containers() {
        let mut builder = DefaultBuilder::new();
        builder.build_map().unwrap();
        builder.build_map_key("list").unwrap();
        builder.build_array().unwrap();
        builder.build_array_value(Scalar::Literal("1")).unwrap();
        builder.build_map().unwrap();
        builder.build_map_key("x").unwrap();
        builder.build_map_value(Scalar::Null).unwrap();
        builder.finish_map().unwrap();
        builder.finish_array().unwrap();
        builder.build_map_key("s").unwrap();
        builder.build_map_value(Scalar::String("t")).unwrap();
        builder.finish_map().unwrap();

        let value = builder.into_result().unwrap();
        assert_eq!(
            value,
            object(&[
                (
                    "list",
                    Value::Array(vec!["1".into(), object(&[("x", Value::Null)])])
                ),
                ("s", "t".into()),
            ])
        );
    }

    #[test]
    fn empty_stream_is_an_empty_object() {
        let mut builder = DefaultBuilder::new();
        builder.empty_stream().unwrap();
        assert_eq!(builder.into_result().unwrap(), Value::Object(Map::new()));
    }

    #[test]
    fn duplicate_key_keeps_last_value() {
        let mut builder = DefaultBuilder::new();
        builder.build_map().unwrap();
        for value in ["1", "2"] {
            builder.build_map_key("k").unwrap();
            builder.build_map_value(Scalar::Literal(value)).unwrap();
        }
        builder.finish_map().unwrap();
        assert_eq!(builder.into_result().unwrap()["k"], "2".into());
    }

    #[rstest]
    #[case(Scalar::Literal("true"), Value::Boolean(true))]
    #[case(Scalar::Literal("false"), Value::Boolean(false))]
    #[case(Scalar::Literal("-1.5e2"), Value::Number(-150.0))]
    #[case(Scalar::String("true"), Value::String("true".into()))]
    #[case(Scalar::Null, Value::Null)]
    fn typed_scalars(#[case] scalar: Scalar<'static>, #[case] expected: Value) {
        assert_eq!(DefaultBuilder::typed().scalar(scalar).unwrap(), expected);
    }

    #[test]
    fn typed_mode_rejects_malformed_numbers() {
        let err = DefaultBuilder::typed()
            .scalar(Scalar::Literal("1.2.3"))
            .unwrap_err();
        assert_eq!(err, ValueError::InvalidNumber("1.2.3".into()));
    }

    #[test]
    fn non_finite_numbers_print_as_null() {
        let value = Value::Array(vec![f64::INFINITY.into(), f64::NAN.into(), 2.5.into()]);
        assert_eq!(value.to_string(), "[null,null,2.5]");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "null");
    }

    #[test]
    fn dropping_deep_values_does_not_recurse() {
        let depth = if cfg!(miri) { 100 } else { 1_000_000 };
        let mut value = Value::Array(vec![]);
        for i in 0..depth {
            value = if i % 2 == 0 {
                Value::Array(vec![value, Value::Null])
            } else {
                let mut map = Map::new();
                map.insert("k".into(), value);
                Value::Object(map)
            };
        }
        drop(value);
    }

    #[test]
    fn misordered_events_are_rejected() {
        let mut builder = DefaultBuilder::new();
        assert_eq!(builder.finish_map(), Err(ValueError::Unbalanced));
        builder.build_array().unwrap();
        assert_eq!(builder.build_map_key("k"), Err(ValueError::Unbalanced));
        let unbalanced = builder.build_map_value(Scalar::Null);
        assert_eq!(unbalanced, Err(ValueError::Unbalanced));

        builder.build_map().unwrap();
        let keyless = builder.build_map_value(Scalar::Null);
        assert_eq!(keyless, Err(ValueError::MissingKey));
        assert_eq!(builder.into_result(), Err(ValueError::Incomplete));
    }

    #[test]
    fn index_missing_is_null() {
        let value = object(&[("a", Value::Array(vec![Value::Null]))]);
        assert!(value["a"][0].is_null());
        assert!(value["a"][5].is_null());
        assert!(value["b"]["c"].is_null());
    }

    #[test]
    fn replay_reproduces_the_value() {
        let value = object(&[
            ("a", Value::Array(vec![Value::Number(1.5), Value::Boolean(false)])),
            ("b", object(&[])),
            ("c", Value::Array(vec![])),
        ]);
        let mut builder = DefaultBuilder::typed();
        value.replay(&mut builder).unwrap();
        assert_eq!(builder.into_result().unwrap(), value);
    }

    #[test]
    fn replay_of_a_scalar_wraps_it() {
        let mut builder = DefaultBuilder::new();
        Value::String("x".into()).replay(&mut builder).unwrap();
        let wrapped = builder.into_result().unwrap();
        assert_eq!(wrapped, Value::Array(vec!["x".into()]));
    }

    #[test]
    fn display_escapes_strings() {
        let value = object(&[("q\"", "line\nbreak\u{1}\u{2028}".into())]);
        assert_eq!(
            value.to_string(),
            "{\"q\\\"\":\"line\\nbreak\\u0001\\u2028\"}"
        );
    }

    #[test]
    fn serde_json_agrees_on_compact_output() {
        let value = object(&[
            ("a", Value::Array(vec![Value::Number(1.5), Value::Null])),
            ("b", Value::Boolean(true)),
            ("c", "\u{7f}".into()),
        ]);
        let via_serde = serde_json::to_string(&value).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&value.to_string()).unwrap();
        let expected: serde_json::Value = serde_json::from_str(&via_serde).unwrap();
        assert_eq!(reparsed, expected);
    }
}
