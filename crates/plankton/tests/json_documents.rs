#![expect(missing_docs)]

use core::{convert::Infallible, fmt};
use std::io::{self, BufReader, Cursor, Read};

use plankton::{
    Builder, DefaultBuilder, ErrorSource, JsonParser, Lexer, ParserOptions, PrintBuilder, Scalar,
    Value, parse_json,
};
use rstest::rstest;

const ORDER: &str = r#"
{
    "id": "ord-1042",
    "customer": {"name": "Grace", "vip": true, "notes": null},
    "lines": [
        {"sku": "A-1", "qty": 2, "price": 9.5},
        {"sku": "B-7", "qty": 1, "price": 120}
    ],
    "tags": []
}
"#;

/// Lists every leaf with its path from the root.
#[derive(Default)]
struct Paths {
    /// One entry per open container: the next index of an array, `None` for
    /// a map.
    frames: Vec<Option<usize>>,
    path: Vec<String>,
    leaves: Vec<String>,
}

impl Paths {
    fn enter(&mut self) {
        if let Some(Some(index)) = self.frames.last_mut() {
            self.path.push(index.to_string());
            *index += 1;
        }
    }

    fn leave(&mut self) {
        if !self.frames.is_empty() {
            self.path.pop();
        }
    }

    fn leaf(&mut self, value: Scalar<'_>) {
        self.enter();
        let text = match value {
            Scalar::Null => "null".to_owned(),
            Scalar::String(s) => format!("{s:?}"),
            Scalar::Literal(s) => s.to_owned(),
        };
        let path = self.path.join("/");
        self.leaves.push(format!("/{path} = {text}"));
        self.leave();
    }
}

impl Builder for Paths {
    type Output = Vec<String>;
    type Error = Infallible;

    fn empty_stream(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn build_map(&mut self) -> Result<(), Infallible> {
        self.enter();
        self.frames.push(None);
        Ok(())
    }

    fn build_map_key(&mut self, key: &str) -> Result<(), Infallible> {
        self.path.push(key.to_owned());
        Ok(())
    }

    fn build_map_value(&mut self, value: Scalar<'_>) -> Result<(), Infallible> {
        self.leaf(value);
        Ok(())
    }

    fn finish_map(&mut self) -> Result<(), Infallible> {
        self.frames.pop();
        self.leave();
        Ok(())
    }

    fn build_array(&mut self) -> Result<(), Infallible> {
        self.enter();
        self.frames.push(Some(0));
        Ok(())
    }

    fn build_array_value(&mut self, value: Scalar<'_>) -> Result<(), Infallible> {
        self.leaf(value);
        Ok(())
    }

    fn finish_array(&mut self) -> Result<(), Infallible> {
        self.frames.pop();
        self.leave();
        Ok(())
    }

    fn into_result(self) -> Result<Vec<String>, Infallible> {
        Ok(self.leaves)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("nesting deeper than {0}")]
struct TooDeep(usize);

/// Rejects documents nested deeper than its limit.
struct DepthLimit {
    limit: usize,
    depth: usize,
}

impl DepthLimit {
    fn open(&mut self) -> Result<(), TooDeep> {
        self.depth += 1;
        if self.depth > self.limit {
            return Err(TooDeep(self.limit));
        }
        Ok(())
    }
}

impl Builder for DepthLimit {
    type Output = usize;
    type Error = TooDeep;

    fn empty_stream(&mut self) -> Result<(), TooDeep> {
        Ok(())
    }

    fn build_map(&mut self) -> Result<(), TooDeep> {
        self.open()
    }

    fn build_map_key(&mut self, _: &str) -> Result<(), TooDeep> {
        Ok(())
    }

    fn build_map_value(&mut self, _: Scalar<'_>) -> Result<(), TooDeep> {
        Ok(())
    }

    fn finish_map(&mut self) -> Result<(), TooDeep> {
        self.depth -= 1;
        Ok(())
    }

    fn build_array(&mut self) -> Result<(), TooDeep> {
        self.open()
    }

    fn build_array_value(&mut self, _: Scalar<'_>) -> Result<(), TooDeep> {
        Ok(())
    }

    fn finish_array(&mut self) -> Result<(), TooDeep> {
        self.depth -= 1;
        Ok(())
    }

    fn into_result(self) -> Result<usize, TooDeep> {
        Ok(self.limit)
    }
}

#[test]
fn custom_builder_sees_document_order() {
    let leaves = parse_json(ORDER.as_bytes(), Paths::default()).unwrap();
    insta::assert_snapshot!(leaves.join("\n"), @r#"
    /id = "ord-1042"
    /customer/name = "Grace"
    /customer/vip = true
    /customer/notes = null
    /lines/0/sku = "A-1"
    /lines/0/qty = 2
    /lines/0/price = 9.5
    /lines/1/sku = "B-7"
    /lines/1/qty = 1
    /lines/1/price = 120
    "#);
}

#[test]
fn builder_errors_stop_the_parse() {
    let err = parse_json("[[[1]]]".as_bytes(), DepthLimit { limit: 2, depth: 0 }).unwrap_err();
    assert!(matches!(err.source, ErrorSource::Builder(TooDeep(2))));
    assert_eq!(
        err.to_string(),
        "builder error: nesting deeper than 2 at 1:3"
    );

    let limit = parse_json("[[1], {}]".as_bytes(), DepthLimit { limit: 2, depth: 0 }).unwrap();
    assert_eq!(limit, 2);
}

#[test]
fn raw_and_typed_values() {
    let raw = parse_json(ORDER.as_bytes(), DefaultBuilder::new()).unwrap();
    assert_eq!(raw["lines"][1]["price"].as_str(), Some("120"));
    assert_eq!(raw["customer"]["vip"].as_str(), Some("true"));

    let typed = parse_json(ORDER.as_bytes(), DefaultBuilder::typed()).unwrap();
    let total: f64 = typed["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["qty"].as_f64().unwrap() * line["price"].as_f64().unwrap())
        .sum();
    assert!((total - 139.0).abs() < f64::EPSILON);
    assert_eq!(typed["customer"]["vip"].as_bool(), Some(true));
    assert!(typed["customer"]["notes"].is_null());
    assert_eq!(typed["tags"], Value::Array(vec![]));
}

#[test]
fn tiny_buffers_and_buffered_readers() {
    let parser = JsonParser::with_options(ParserOptions {
        buffer_chunk_size: 1,
        ..ParserOptions::default()
    });
    let reader = BufReader::with_capacity(3, Cursor::new(ORDER));
    let from_file = parser.parse(reader, DefaultBuilder::new()).unwrap();
    let whole = parse_json(ORDER.as_bytes(), DefaultBuilder::new()).unwrap();
    assert_eq!(from_file, whole);
}

#[test]
fn concatenated_documents_share_a_lexer() {
    let parser = JsonParser::new();
    let mut lexer = Lexer::new("{\"a\": 1} [2]\n{}".as_bytes());

    let mut documents = Vec::new();
    for _ in 0..3 {
        let mut builder = DefaultBuilder::new();
        parser.parse_terminals(&mut lexer, &mut builder).unwrap();
        documents.push(builder.into_result().unwrap().to_string());
    }
    assert_eq!(documents, [r#"{"a":"1"}"#, r#"["2"]"#, "{}"]);
    assert_eq!((lexer.line(), lexer.column()), (2, 3));
}

#[test]
fn printing_into_any_writer() {
    /// Counts what it is given instead of storing it.
    #[derive(Default)]
    struct Tally {
        chars: usize,
        newlines: usize,
    }

    impl fmt::Write for Tally {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            self.chars += s.chars().count();
            self.newlines += s.matches('\n').count();
            Ok(())
        }
    }

    let writer = PrintBuilder::with_writer(Tally::default());
    let tally = parse_json(ORDER.as_bytes(), writer).unwrap();
    let text = parse_json(ORDER.as_bytes(), PrintBuilder::new()).unwrap();
    assert_eq!(tally.chars, text.chars().count());
    assert_eq!(tally.newlines, text.lines().count());
}

/// Serves `data` in one read, then fails every later read.
struct Severed {
    data: &'static [u8],
}

impl Read for Severed {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.data.is_empty() {
            let reset = io::Error::new(io::ErrorKind::ConnectionReset, "peer went away");
            return Err(reset);
        }
        let size = self.data.len().min(buf.len());
        buf[..size].copy_from_slice(&self.data[..size]);
        self.data = &self.data[size..];
        Ok(size)
    }
}

#[rstest]
#[case::before_any_input("", 1, 1)]
#[case::inside_a_number("[12", 1, 4)]
#[case::inside_a_string("[\"ab", 1, 5)]
#[case::between_terminals("{\"a\": 1,\n", 2, 1)]
fn read_errors_are_reported(
    #[case] data: &'static str,
    #[case] line: usize,
    #[case] column: usize,
) {
    let reader = Severed {
        data: data.as_bytes(),
    };
    let err = parse_json(reader, DefaultBuilder::new()).unwrap_err();
    let ErrorSource::Io(io_err) = &err.source else {
        panic!("expected a read error");
    };
    assert_eq!(io_err.kind(), io::ErrorKind::ConnectionReset);
    assert_eq!((err.line, err.column), (line, column));
    assert_eq!(
        err.to_string(),
        format!("read error: peer went away at {line}:{column}")
    );
}
