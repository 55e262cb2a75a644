//! Decodes a few request bodies the way an HTTP handler would: pick the
//! parser from the `Content-Type` header, then work with the result.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=debug cargo run -p plankton --example dispatch_request
//! ```

use plankton::{Content, ContentError, ContentParser, PrintBuilder, parse_json};

fn describe(
    parser: &ContentParser,
    content_type: Option<&str>,
    body: &str,
) -> Result<(), ContentError> {
    println!("--- {} ---", content_type.unwrap_or("(no content type)"));
    match parser.parse(content_type, body.as_bytes())? {
        Content::Form(form) => {
            for (key, values) in form.iter() {
                let key = key.unwrap_or("(unnamed)");
                for value in values {
                    println!("{key} = {}", value.as_deref().unwrap_or("(no value)"));
                }
            }
        }
        Content::Json(value) => {
            println!("{}", value.to_pretty_string().trim_end());
            if let Some(user) = value["user"].as_str() {
                println!("request from {user}");
            }
        }
        Content::Unsupported => println!("left {} bytes unread", body.len()),
        _ => println!("unrecognized content"),
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let parser = ContentParser::new();
    let requests = [
        (
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            "user=grace&roles=admin&roles=ops&note=back+in+5%E2%80%AF%25&flag",
        ),
        (
            Some("application/json"),
            r#"{"user": "ada", "items": [{"sku": "A-1", "qty": 2}], "gift": false}"#,
        ),
        (Some("text/csv"), "sku,qty\nA-1,2\n"),
        (Some("application/json"), r#"{"user": "ada" "items": []}"#),
    ];

    for (content_type, body) in requests {
        if let Err(err) = describe(&parser, content_type, body) {
            println!("rejected: {err}");
        }
    }

    // The structure can also be echoed without building a value.
    let (_, body) = requests[1];
    match parse_json(body.as_bytes(), PrintBuilder::compact(String::new())) {
        Ok(text) => println!("compact: {text}"),
        Err(err) => println!("rejected: {err}"),
    }
}
