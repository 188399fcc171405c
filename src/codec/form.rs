//! `application/x-www-form-urlencoded` payload decoding.
//!
//! The payload is split on raw `&` and `=` bytes before any unescaping, so an
//! escaped separator (`%26`, `%3D`) inside a key or value stays data.

use std::borrow::Cow;
use std::collections::BTreeMap;

use percent_encoding::percent_decode;

/// Decoded form fields. Duplicate keys keep the last value.
pub type DecodedFields = BTreeMap<String, String>;

/// Reasons a payload cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A `&`-delimited segment did not contain exactly one `=`.
    #[error("segment {index} is not a key=value pair: '{segment}'")]
    MalformedSegment { index: usize, segment: String },

    /// Unescaped bytes are not valid UTF-8.
    #[error("segment {index} does not decode to UTF-8 text")]
    InvalidUtf8 { index: usize },
}

/// Decode a URL-encoded form body.
///
/// Fails on the first malformed segment; no partial mapping is ever returned.
pub fn decode(raw: &[u8]) -> Result<DecodedFields, DecodeError> {
    let mut fields = DecodedFields::new();

    for (index, segment) in raw.split(|&b| b == b'&').enumerate() {
        let mut parts = segment.split(|&b| b == b'=');
        let (key, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => (key, value),
            _ => {
                return Err(DecodeError::MalformedSegment {
                    index,
                    segment: String::from_utf8_lossy(segment).into_owned(),
                })
            }
        };

        let key = unescape(key).ok_or(DecodeError::InvalidUtf8 { index })?;
        let value = unescape(value).ok_or(DecodeError::InvalidUtf8 { index })?;
        fields.insert(key, value);
    }

    Ok(fields)
}

/// Reverse plus and percent escaping. `None` when the result is not UTF-8.
fn unescape(input: &[u8]) -> Option<String> {
    let plus_free: Cow<'_, [u8]> = if input.contains(&b'+') {
        Cow::Owned(
            input
                .iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(input)
    };

    percent_decode(&plus_free)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}
