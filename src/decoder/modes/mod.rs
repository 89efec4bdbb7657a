//! Data segment parsers for the QR payload bitstream.
//!
//! A payload is a sequence of segments, each introduced by a 4-bit mode
//! indicator and a character count field whose width depends on the symbol
//! version.

pub mod alphanumeric;
pub mod byte;
pub mod kanji;
pub mod numeric;

use crate::error::DecodeError;
use crate::models::Version;

/// Segment mode indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Terminator,
    Numeric,
    Alphanumeric,
    StructuredAppend,
    Byte,
    Fnc1FirstPosition,
    Eci,
    Kanji,
    Fnc1SecondPosition,
}

impl Mode {
    pub fn from_bits(bits: u32) -> Result<Self, DecodeError> {
        match bits {
            0x0 => Ok(Self::Terminator),
            0x1 => Ok(Self::Numeric),
            0x2 => Ok(Self::Alphanumeric),
            0x3 => Ok(Self::StructuredAppend),
            0x4 => Ok(Self::Byte),
            0x5 => Ok(Self::Fnc1FirstPosition),
            0x7 => Ok(Self::Eci),
            0x8 => Ok(Self::Kanji),
            0x9 => Ok(Self::Fnc1SecondPosition),
            _ => Err(DecodeError::FormatInvalid),
        }
    }

    /// Width of the character count field for this mode and version
    pub fn character_count_bits(self, version: Version) -> usize {
        let v = version.number();
        match self {
            Self::Numeric => {
                if v <= 9 {
                    10
                } else if v <= 26 {
                    12
                } else {
                    14
                }
            }
            Self::Alphanumeric => {
                if v <= 9 {
                    9
                } else if v <= 26 {
                    11
                } else {
                    13
                }
            }
            Self::Byte => {
                if v <= 9 {
                    8
                } else {
                    16
                }
            }
            Self::Kanji => {
                if v <= 9 {
                    8
                } else if v <= 26 {
                    10
                } else {
                    12
                }
            }
            _ => 0,
        }
    }
}

/// Sequential bit reader over the corrected data codewords
pub struct BitSource<'a> {
    bytes: &'a [u8],
    byte_offset: usize,
    bit_offset: usize,
}

impl<'a> BitSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            byte_offset: 0,
            bit_offset: 0,
        }
    }

    pub fn available(&self) -> usize {
        8 * (self.bytes.len() - self.byte_offset) - self.bit_offset
    }

    /// Read `count` bits (1..=32), MSB first
    pub fn read_bits(&mut self, count: usize) -> Result<u32, DecodeError> {
        if count == 0 || count > 32 || count > self.available() {
            return Err(DecodeError::FormatInvalid);
        }

        let mut result = 0u32;
        let mut remaining = count;

        // Finish a partially consumed byte first
        if self.bit_offset > 0 {
            let bits_left = 8 - self.bit_offset;
            let to_read = remaining.min(bits_left);
            let shift = bits_left - to_read;
            let mask = (0xFFu32 >> (8 - to_read)) as u8;
            let bits = (self.bytes[self.byte_offset] >> shift) & mask;
            result = u32::from(bits);
            remaining -= to_read;
            self.bit_offset += to_read;
            if self.bit_offset == 8 {
                self.bit_offset = 0;
                self.byte_offset += 1;
            }
        }

        while remaining >= 8 {
            result = (result << 8) | u32::from(self.bytes[self.byte_offset]);
            self.byte_offset += 1;
            remaining -= 8;
        }

        if remaining > 0 {
            let shift = 8 - remaining;
            result = (result << remaining) | u32::from(self.bytes[self.byte_offset] >> shift);
            self.bit_offset = remaining;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_source_reads_msb_first() {
        let mut source = BitSource::new(&[0b1011_0001, 0b0100_1110]);
        assert_eq!(source.available(), 16);
        assert_eq!(source.read_bits(4).unwrap(), 0b1011);
        assert_eq!(source.read_bits(3).unwrap(), 0b000);
        assert_eq!(source.available(), 9);
        assert_eq!(source.read_bits(9).unwrap(), 0b1_0100_1110);
        assert_eq!(source.available(), 0);
        assert!(source.read_bits(1).is_err());
    }

    #[test]
    fn bit_source_spans_bytes() {
        let mut source = BitSource::new(&[0xAB, 0xCD, 0xEF]);
        assert_eq!(source.read_bits(12).unwrap(), 0xABC);
        assert_eq!(source.read_bits(12).unwrap(), 0xDEF);
    }

    #[test]
    fn mode_indicator_mapping() {
        assert_eq!(Mode::from_bits(0x1).unwrap(), Mode::Numeric);
        assert_eq!(Mode::from_bits(0x4).unwrap(), Mode::Byte);
        assert_eq!(Mode::from_bits(0x8).unwrap(), Mode::Kanji);
        assert_eq!(Mode::from_bits(0x6), Err(DecodeError::FormatInvalid));
        assert_eq!(Mode::from_bits(0xD), Err(DecodeError::FormatInvalid));
    }

    #[test]
    fn character_count_widths() {
        let v1 = Version::new(1).unwrap();
        let v10 = Version::new(10).unwrap();
        let v40 = Version::new(40).unwrap();
        assert_eq!(Mode::Numeric.character_count_bits(v1), 10);
        assert_eq!(Mode::Numeric.character_count_bits(v10), 12);
        assert_eq!(Mode::Numeric.character_count_bits(v40), 14);
        assert_eq!(Mode::Byte.character_count_bits(v1), 8);
        assert_eq!(Mode::Byte.character_count_bits(v40), 16);
        assert_eq!(Mode::Kanji.character_count_bits(v10), 10);
    }
}
