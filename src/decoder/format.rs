use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// XOR pattern applied to format info so it is never all zeros
const FORMAT_INFO_MASK: u16 = 0x5412;

/// BCH(15,5) generator polynomial x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u16 = 0x537;

/// Decoded format information: error correction level and data mask pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Read and decode the format information from a symbol matrix.
    ///
    /// Both copies are tried: the one bordering the top-left finder pattern,
    /// then the split copy along the other two finders. Up to 3 bit errors
    /// per copy are tolerated.
    pub fn read(matrix: &BitMatrix) -> Option<Self> {
        let copy1 = Self::read_top_left(matrix);
        let copy2 = Self::read_split(matrix);
        Self::decode(copy1).or_else(|| Self::decode(copy2))
    }

    /// First copy, around the top-left finder pattern (MSB first)
    fn read_top_left(matrix: &BitMatrix) -> u16 {
        let mut bits = 0u16;
        for x in 0..6 {
            bits = (bits << 1) | u16::from(matrix.get(x, 8));
        }
        bits = (bits << 1) | u16::from(matrix.get(7, 8));
        bits = (bits << 1) | u16::from(matrix.get(8, 8));
        bits = (bits << 1) | u16::from(matrix.get(8, 7));
        for y in (0..6).rev() {
            bits = (bits << 1) | u16::from(matrix.get(8, y));
        }
        bits
    }

    /// Second copy, split between the top-right and bottom-left finders
    fn read_split(matrix: &BitMatrix) -> u16 {
        let dim = matrix.width();
        let mut bits = 0u16;
        for y in (dim - 7..dim).rev() {
            bits = (bits << 1) | u16::from(matrix.get(8, y));
        }
        for x in dim - 8..dim {
            bits = (bits << 1) | u16::from(matrix.get(x, 8));
        }
        bits
    }

    /// Find the valid format codeword closest to the raw masked bits.
    /// Accepts up to 3 differing bits, the BCH(15,5) correction capacity.
    fn decode(raw_bits: u16) -> Option<Self> {
        let mut best: Option<(u32, u8)> = None;
        for data in 0..32u16 {
            let candidate = Self::encode(data) ^ FORMAT_INFO_MASK;
            let distance = (candidate ^ raw_bits).count_ones();
            if distance == 0 {
                return Some(Self::from_data_bits(data as u8));
            }
            if distance <= 3 && best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, data as u8));
            }
        }
        best.map(|(_, data)| Self::from_data_bits(data))
    }

    /// BCH(15,5) encode: 5 data bits into a 15-bit codeword
    fn encode(data: u16) -> u16 {
        let value = data << 10;
        let mut rem = value;
        for bit in (10..15).rev() {
            if rem & (1 << bit) != 0 {
                rem ^= FORMAT_GENERATOR << (bit - 10);
            }
        }
        value | rem
    }

    fn from_data_bits(data: u8) -> Self {
        Self {
            ec_level: ECLevel::from_format_bits((data >> 3) & 0x03),
            mask_pattern: MaskPattern::from_bits(data & 0x07),
        }
    }
}
