const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Splits a raw query/fragment string into decoded `(key, value)` pairs.
///
/// Keys are unique: a repeated key keeps its first position and takes the
/// last value. A chunk without `=` becomes a key with an empty value.
pub(crate) fn decode_pairs(raw: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for chunk in raw.split('&') {
        if chunk.is_empty() {
            continue;
        }
        let (key, value) = match chunk.split_once('=') {
            Some((key, value)) => (key, value),
            None => (chunk, ""),
        };
        let key = percent_decode(key);
        let value = percent_decode(value);
        match pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => pairs.push((key, value)),
        }
    }
    pairs
}

/// Serializes pairs as `key=value&key=value`, percent-encoding both sides
/// so `&`, `=`, and `#` can never collide with the separators.
pub(crate) fn encode_pairs(pairs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        if !out.is_empty() {
            out.push('&');
        }
        out.push_str(&percent_encode(key));
        out.push('=');
        out.push_str(&percent_encode(value));
    }
    out
}

// Unreserved set of JS encodeURIComponent.
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')'
        )
}

pub(crate) fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(HEX_UPPER[(byte >> 4) as usize] as char);
            out.push(HEX_UPPER[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

/// Lossy percent-decoding: a `%` not followed by two hex digits is kept
/// literally, and invalid UTF-8 decodes with replacement characters.
pub(crate) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' && index + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_value(bytes[index + 1]), hex_value(bytes[index + 2]))
            {
                out.push((high << 4) | low);
                index += 3;
                continue;
            }
        }
        out.push(bytes[index]);
        index += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|digit| digit as u8)
}
