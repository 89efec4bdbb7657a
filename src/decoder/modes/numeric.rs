use super::BitSource;
use crate::error::DecodeError;

/// Decode a numeric segment: digits packed three per 10 bits, with 7-bit
/// and 4-bit tail groups for the final two or one digits.
pub fn decode(source: &mut BitSource<'_>, count: usize, result: &mut String) -> Result<(), DecodeError> {
    let mut remaining = count;

    while remaining >= 3 {
        let group = source.read_bits(10)?;
        if group >= 1000 {
            return Err(DecodeError::FormatInvalid);
        }
        result.push(digit(group / 100));
        result.push(digit((group / 10) % 10));
        result.push(digit(group % 10));
        remaining -= 3;
    }

    if remaining == 2 {
        let group = source.read_bits(7)?;
        if group >= 100 {
            return Err(DecodeError::FormatInvalid);
        }
        result.push(digit(group / 10));
        result.push(digit(group % 10));
    } else if remaining == 1 {
        let digit_bits = source.read_bits(4)?;
        if digit_bits >= 10 {
            return Err(DecodeError::FormatInvalid);
        }
        result.push(digit(digit_bits));
    }

    Ok(())
}

fn digit(value: u32) -> char {
    char::from(b'0' + value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
        // bits given as 0/1, MSB first, zero-padded to whole bytes
        let mut bytes = vec![0u8; bits.len().div_ceil(8)];
        for (i, &b) in bits.iter().enumerate() {
            if b != 0 {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        bytes
    }

    #[test]
    fn decodes_digit_groups() {
        // 493 = 0b0111101101 (10 bits), then 87 = 0b1010111 (7 bits),
        // then 6 = 0b0110 (4 bits)
        let bits = [
            0, 1, 1, 1, 1, 0, 1, 1, 0, 1, //
            1, 0, 1, 0, 1, 1, 1, //
            0, 1, 1, 0,
        ];
        let bytes = bits_to_bytes(&bits);
        let mut source = BitSource::new(&bytes);
        let mut result = String::new();
        decode(&mut source, 6, &mut result).unwrap();
        assert_eq!(result, "493876");
    }

    #[test]
    fn rejects_out_of_range_group() {
        // 1001 does not encode three digits
        let bits = [1, 1, 1, 1, 1, 0, 1, 0, 0, 1];
        let bytes = bits_to_bytes(&bits);
        let mut source = BitSource::new(&bytes);
        let mut result = String::new();
        assert_eq!(
            decode(&mut source, 3, &mut result),
            Err(DecodeError::FormatInvalid)
        );
    }

    #[test]
    fn rejects_truncated_stream() {
        let bytes = [0u8];
        let mut source = BitSource::new(&bytes);
        let mut result = String::new();
        assert_eq!(
            decode(&mut source, 3, &mut result),
            Err(DecodeError::FormatInvalid)
        );
    }
}
