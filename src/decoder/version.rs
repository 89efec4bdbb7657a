use crate::models::{BitMatrix, Version};

/// BCH(18,6) generator polynomial x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const VERSION_GENERATOR: u32 = 0x1F25;

/// Reads the 18-bit version information blocks present in symbols of
/// version 7 and above (45 modules or larger).
pub struct VersionInfo;

impl VersionInfo {
    /// Determine the symbol version from a matrix.
    ///
    /// Small symbols carry no version blocks, so the version is derived from
    /// the dimension alone. Larger symbols are read from the block beside the
    /// top-right finder, falling back to the transposed copy beside the
    /// bottom-left finder. Up to 3 bit errors per copy are tolerated.
    pub fn read(matrix: &BitMatrix) -> Option<Version> {
        let dim = matrix.width();
        let provisional = Version::from_dimension(dim)?;
        if dim < 45 {
            return Some(provisional);
        }

        let copy1 = Self::read_top_right(matrix);
        let copy2 = Self::read_bottom_left(matrix);
        Self::decode(copy1).or_else(|| Self::decode(copy2))
    }

    /// 3x6 block left of the top-right finder pattern, MSB at
    /// (dim-9, 5), scanning rows bottom-up and columns right-to-left
    fn read_top_right(matrix: &BitMatrix) -> u32 {
        let dim = matrix.width();
        let mut bits = 0u32;
        for y in (0..6).rev() {
            for x in (dim - 11..dim - 8).rev() {
                bits = (bits << 1) | u32::from(matrix.get(x, y));
            }
        }
        bits
    }

    /// Transposed copy above the bottom-left finder pattern
    fn read_bottom_left(matrix: &BitMatrix) -> u32 {
        let dim = matrix.width();
        let mut bits = 0u32;
        for x in (0..6).rev() {
            for y in (dim - 11..dim - 8).rev() {
                bits = (bits << 1) | u32::from(matrix.get(x, y));
            }
        }
        bits
    }

    /// Find the valid version codeword closest to the raw bits
    fn decode(raw_bits: u32) -> Option<Version> {
        let mut best: Option<(u32, u8)> = None;
        for number in 7..=40u8 {
            let candidate = Self::encode(number);
            let distance = (candidate ^ raw_bits).count_ones();
            if distance == 0 {
                return Version::new(number);
            }
            if distance <= 3 && best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, number));
            }
        }
        best.and_then(|(_, number)| Version::new(number))
    }

    /// BCH(18,6) encode: 6-bit version number into an 18-bit codeword
    fn encode(number: u8) -> u32 {
        let value = u32::from(number) << 12;
        let mut rem = value;
        for bit in (12..18).rev() {
            if rem & (1 << bit) != 0 {
                rem ^= VERSION_GENERATOR << (bit - 12);
            }
        }
        value | rem
    }
}
