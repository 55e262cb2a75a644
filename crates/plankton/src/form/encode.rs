const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'*' | b'~')
}

fn push_encoded(out: &mut String, text: &str) {
    for &byte in text.as_bytes() {
        if is_unreserved(byte) {
            out.push(char::from(byte));
        } else if byte == b' ' {
            out.push('+');
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(byte >> 4)]));
            out.push(char::from(HEX[usize::from(byte & 0xF)]));
        }
    }
}

/// Encodes `text` for use as a form key or value.
///
/// ASCII letters, digits and `-_.*~` are kept, a space becomes `+`, and every
/// other byte of the UTF-8 encoding becomes an uppercase `%XX` escape.
///
/// ```
/// assert_eq!(plankton::percent_encode("a b&c=\u{e9}"), "a+b%26c%3D%C3%A9");
/// ```
#[must_use]
pub fn percent_encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_encoded(&mut out, text);
    out
}

/// Joins encoded `key=value` pairs with `&`.
///
/// A `None` value emits the bare key.
///
/// ```
/// let body = plankton::encode_pairs([("q", Some("rust fsm")), ("raw", None)]);
/// assert_eq!(body, "q=rust+fsm&raw");
/// ```
pub fn encode_pairs<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::new();
    for (index, (key, value)) in pairs.into_iter().enumerate() {
        if index > 0 {
            out.push('&');
        }
        push_encoded(&mut out, key.as_ref());
        if let Some(value) = value {
            out.push('=');
            push_encoded(&mut out, value.as_ref());
        }
    }
    out
}
