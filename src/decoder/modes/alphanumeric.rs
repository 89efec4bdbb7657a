use super::BitSource;
use crate::error::DecodeError;

/// Alphanumeric character set: digits, upper-case letters, and nine symbols
const ALPHANUMERIC_CHARS: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Decode an alphanumeric segment: character pairs packed as value*45+value
/// in 11 bits, with a 6-bit tail for an odd final character.
///
/// When an FNC1 indicator preceded this segment, "%%" collapses to a literal
/// percent sign and a lone "%" becomes the GS separator (0x1D).
pub fn decode(
    source: &mut BitSource<'_>,
    count: usize,
    fc1_in_effect: bool,
    result: &mut String,
) -> Result<(), DecodeError> {
    let start = result.len();
    let mut remaining = count;

    while remaining > 1 {
        let pair = source.read_bits(11)?;
        result.push(to_char(pair / 45)?);
        result.push(to_char(pair % 45)?);
        remaining -= 2;
    }
    if remaining == 1 {
        result.push(to_char(source.read_bits(6)?)?);
    }

    if fc1_in_effect {
        let decoded = result.split_off(start);
        let mut chars = decoded.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '%' {
                if chars.peek() == Some(&'%') {
                    chars.next();
                    result.push('%');
                } else {
                    result.push('\u{1D}');
                }
            } else {
                result.push(c);
            }
        }
    }

    Ok(())
}

fn to_char(value: u32) -> Result<char, DecodeError> {
    ALPHANUMERIC_CHARS
        .get(value as usize)
        .map(|&b| char::from(b))
        .ok_or(DecodeError::FormatInvalid)
}
