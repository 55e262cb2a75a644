use quickcheck::QuickCheck;

use crate::{
    DecodeMode, FormData, FormOptions, FormParser, encode_pairs, parse_url_encoded, percent_encode,
};

fn tests() -> u64 {
    if cfg!(miri) {
        10
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}

fn encode(data: &FormData) -> String {
    encode_pairs(data.iter().flat_map(|(key, values)| {
        values
            .iter()
            .map(move |value| (key.unwrap_or_default(), value.as_deref()))
    }))
}

/// Property: encoding form data and decoding the result restores it.
#[test]
fn encode_decode_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(data: FormData) -> bool {
        parse_url_encoded(encode(&data).as_bytes()).is_ok_and(|parsed| parsed == data)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(FormData) -> bool);
}

/// Property: percent-encoded text never needs lossy decoding.
#[test]
fn strict_mode_accepts_encoded_text_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(key: String, value: String) -> bool {
        let body = format!("{}={}", percent_encode(&key), percent_encode(&value));
        let parser = FormParser::with_options(FormOptions {
            decode_mode: DecodeMode::Strict,
            ..FormOptions::default()
        });
        let expected: FormData = [(key, value)]
            .into_iter()
            .map(|(key, value)| {
                (
                    Some(key).filter(|k| !k.is_empty()),
                    Some(value).filter(|v| !v.is_empty()),
                )
            })
            .filter(|(key, value)| key.is_some() || value.is_some())
            .collect();
        parser
            .parse(body.as_bytes())
            .is_ok_and(|parsed| parsed == expected)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(String, String) -> bool);
}

/// Property: decoding arbitrary bytes never panics, and every failure points
/// inside the input.
#[test]
fn arbitrary_bytes_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(bytes: Vec<u8>) -> bool {
        match parse_url_encoded(bytes.as_slice()) {
            Ok(_) => true,
            Err(err) => err.offset < bytes.len(),
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Vec<u8>) -> bool);
}
