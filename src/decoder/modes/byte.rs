use super::BitSource;
use crate::error::DecodeError;

/// Decode a byte segment: `count` raw 8-bit values.
///
/// The raw bytes are kept as a segment for callers that need the binary
/// content. For the text rendering the bytes are interpreted as UTF-8 when
/// they form a valid sequence, otherwise as ISO-8859-1.
pub fn decode(
    source: &mut BitSource<'_>,
    count: usize,
    result: &mut String,
    segments: &mut Vec<Vec<u8>>,
) -> Result<(), DecodeError> {
    if count * 8 > source.available() {
        return Err(DecodeError::FormatInvalid);
    }

    let mut bytes = Vec::with_capacity(count);
    for _ in 0..count {
        bytes.push(source.read_bits(8)? as u8);
    }

    match std::str::from_utf8(&bytes) {
        Ok(text) => result.push_str(text),
        Err(_) => result.extend(bytes.iter().map(|&b| char::from(b))),
    }
    segments.push(bytes);

    Ok(())
}
