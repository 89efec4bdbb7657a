use super::BitSource;
use crate::error::DecodeError;

/// Decode a kanji segment: 13-bit values that unpack to two-byte Shift JIS
/// code units.
///
/// The bytes are appended to the text lossily; code points outside the ASCII
/// range surface as replacement characters since no charset tables are
/// carried. The exact bytes remain available through the raw codewords.
pub fn decode(
    source: &mut BitSource<'_>,
    count: usize,
    result: &mut String,
) -> Result<(), DecodeError> {
    if count * 13 > source.available() {
        return Err(DecodeError::FormatInvalid);
    }

    let mut sjis = Vec::with_capacity(count * 2);
    for _ in 0..count {
        let packed = source.read_bits(13)?;
        let mut assembled = ((packed / 0xC0) << 8) | (packed % 0xC0);
        if assembled < 0x1F00 {
            assembled += 0x8140;
        } else {
            assembled += 0xC140;
        }
        sjis.push((assembled >> 8) as u8);
        sjis.push((assembled & 0xFF) as u8);
    }

    result.push_str(&String::from_utf8_lossy(&sjis));
    Ok(())
}
