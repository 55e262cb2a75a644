#![no_main]
use std::io::{self, Read};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use plankton::{
    ContentParser, DecodeMode, DefaultBuilder, FormOptions, FormParser, PrintBuilder, parse_json,
};

#[derive(Debug, Arbitrary)]
enum Target {
    Form { strict: bool },
    Json,
    Dispatch { content_type: Option<String> },
}

#[derive(Debug, Arbitrary)]
struct Input {
    target: Target,
    /// Read sizes for the chunked reader; cycled.
    splits: Vec<u8>,
    body: Vec<u8>,
}

/// Serves `data` in reads of the given sizes.
struct Chunked<'a> {
    data: &'a [u8],
    splits: &'a [u8],
    next: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let size = match self.splits {
            [] => self.data.len(),
            splits => {
                self.next = (self.next + 1) % splits.len();
                usize::from(splits[self.next]).max(1)
            }
        };
        let size = size.min(buf.len()).min(self.data.len());
        buf[..size].copy_from_slice(&self.data[..size]);
        self.data = &self.data[size..];
        Ok(size)
    }
}

fuzz_target!(|input: Input| {
    let reader = Chunked {
        data: &input.body,
        splits: &input.splits,
        next: 0,
    };

    match input.target {
        Target::Form { strict } => {
            let decode_mode = if strict {
                DecodeMode::Strict
            } else {
                DecodeMode::ReplaceInvalid
            };
            let parser = FormParser::with_options(FormOptions {
                decode_mode,
                ..FormOptions::default()
            });
            let chunked = parser.parse(reader).map_err(|e| e.offset);
            let whole = parser.parse(input.body.as_slice()).map_err(|e| e.offset);
            assert_eq!(chunked, whole);
            if let Err(offset) = whole {
                assert!(offset < input.body.len());
            }
        }
        Target::Json => {
            let chunked = parse_json(reader, DefaultBuilder::new());
            let whole = parse_json(input.body.as_slice(), DefaultBuilder::new());
            match (&chunked, &whole) {
                (Ok(a), Ok(b)) => assert_eq!(a, b),
                (Err(a), Err(b)) => assert_eq!((a.line, a.column), (b.line, b.column)),
                _ => panic!("chunking changed the outcome: {chunked:?} vs {whole:?}"),
            }

            if let Ok(value) = &whole {
                // The printed form re-parses to the same raw value.
                let printed = parse_json(input.body.as_slice(), PrintBuilder::new()).unwrap();
                let reparsed = parse_json(printed.as_bytes(), DefaultBuilder::new()).unwrap();
                assert_eq!(&reparsed, value);
            }

            // Everything serde_json accepts with a container root parses here
            // too; the converse does not hold (trailing commas, raw control
            // characters, trailing content).
            if let Ok(reference) = serde_json::from_slice::<serde_json::Value>(&input.body) {
                if reference.is_array() || reference.is_object() {
                    assert!(whole.is_ok(), "serde_json accepted, got {whole:?}");
                }
            }
        }
        Target::Dispatch { content_type } => {
            let _ = ContentParser::new().parse(content_type.as_deref(), reader);
        }
    }
});
