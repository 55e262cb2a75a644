#![expect(missing_docs)]

use core::fmt::Write;
use std::io::{self, Read};

use plankton::{
    DecodeMode, FormData, FormErrorKind, FormOptions, FormParser, encode_pairs, parse_url_encoded,
};

fn render(data: &FormData) -> String {
    let mut out = String::new();
    for (key, values) in data.iter() {
        writeln!(out, "{key:?} = {values:?}").unwrap();
    }
    out
}

/// Serves its input one byte per read.
struct Dribble<'a>(&'a [u8]);

impl Read for Dribble<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some((first, rest)) = self.0.split_first() else {
            return Ok(0);
        };
        if buf.is_empty() {
            return Ok(0);
        }
        buf[0] = *first;
        self.0 = rest;
        Ok(1)
    }
}

#[test]
fn login_form() {
    let body = "user=ada%40example.com&password=p%26ss+w%3Drd&remember&redirect=%2Fhome%3Ftab%3D1";
    insta::assert_snapshot!(render(&parse_url_encoded(body.as_bytes()).unwrap()), @r#"
    Some("password") = [Some("p&ss w=rd")]
    Some("redirect") = [Some("/home?tab=1")]
    Some("remember") = [None]
    Some("user") = [Some("ada@example.com")]
    "#);
}

#[test]
fn repeated_and_unnamed_fields() {
    let body = "tag=a&=orphan&tag=b&&tag=&=second";
    insta::assert_snapshot!(render(&parse_url_encoded(body.as_bytes()).unwrap()), @r#"
    None = [Some("orphan"), Some("second")]
    Some("tag") = [Some("a"), Some("b"), None]
    "#);
}

#[test]
fn byte_at_a_time_reader() {
    let body = "city=Z%C3%BCrich&note=%E2%82%AC+5";
    let data = parse_url_encoded(Dribble(body.as_bytes())).unwrap();
    assert_eq!(data.first("city"), Some("Zürich"));
    assert_eq!(data.first("note"), Some("€ 5"));
}

#[test]
fn encoded_requests_decode_to_the_same_pairs() {
    let pairs = [
        ("q", Some("rust & state machines")),
        ("page", Some("2")),
        ("lang", Some("日本語")),
        ("debug", None),
    ];
    let body = encode_pairs(pairs);
    assert_eq!(
        body,
        "q=rust+%26+state+machines&page=2&lang=%E6%97%A5%E6%9C%AC%E8%AA%9E&debug"
    );

    let data = parse_url_encoded(body.as_bytes()).unwrap();
    for (key, value) in pairs {
        assert_eq!(data.get(key), Some(&[value.map(String::from)][..]));
    }
}

#[test]
fn strict_and_lenient_decoding() {
    let body = "name=%C3%28&ok=1";

    let lenient = parse_url_encoded(body.as_bytes()).unwrap();
    assert_eq!(lenient.first("name"), Some("\u{FFFD}("));

    let strict = FormParser::with_options(FormOptions {
        decode_mode: DecodeMode::Strict,
        ..FormOptions::default()
    });
    let err = strict.parse(body.as_bytes()).unwrap_err();
    assert!(matches!(err.kind, FormErrorKind::InvalidUtf8));
    assert_eq!(err.offset, 11);
}

#[test]
fn malformed_escapes() {
    let err = parse_url_encoded("a=1&b=%2".as_bytes()).unwrap_err();
    assert!(matches!(err.kind, FormErrorKind::TruncatedEscape));
    assert_eq!(err.to_string(), "truncated percent escape at byte 6");

    let err = parse_url_encoded("a=%x1".as_bytes()).unwrap_err();
    assert_eq!(err.to_string(), "hex value out of range: 'x' at byte 2");
}

#[test]
fn read_errors_are_reported() {
    struct Refused;
    impl Read for Refused {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            let reset = io::Error::new(io::ErrorKind::ConnectionReset, "peer went away");
            Err(reset)
        }
    }

    let err = parse_url_encoded(Refused).unwrap_err();
    assert!(matches!(err.kind, FormErrorKind::Io(_)));
    assert_eq!(err.to_string(), "read error: peer went away at byte 0");
}
