use std::fmt;

/// QR code version (Model 2, versions 1-40)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version(u8);

impl Version {
    /// Construct a version, rejecting anything outside 1..=40
    pub fn new(number: u8) -> Option<Self> {
        if (1..=40).contains(&number) {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Derive the version from a symbol side length (17 + 4k modules)
    pub fn from_dimension(dimension: usize) -> Option<Self> {
        if dimension < 21 || (dimension - 17) % 4 != 0 {
            return None;
        }
        Self::new(((dimension - 17) / 4) as u8)
    }

    /// Version number (1-40)
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Side length in modules
    pub fn dimension(&self) -> usize {
        17 + 4 * self.0 as usize
    }

    /// Total codewords in the symbol
    pub fn total_codewords(&self) -> usize {
        // Derived from the module count: dimension^2 minus function modules,
        // divided by 8. Table form per the QR specification.
        const TOTALS: [u16; 41] = [
            0, 26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815,
            901, 991, 1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323,
            2465, 2611, 2761, 2876, 3034, 3196, 3362, 3532, 3706,
        ];
        TOTALS[self.0 as usize] as usize
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// Decode the two format-info indicator bits (00=M, 01=L, 10=H, 11=Q)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => ECLevel::M,
            1 => ECLevel::L,
            2 => ECLevel::H,
            _ => ECLevel::Q,
        }
    }
}

impl fmt::Display for ECLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ECLevel::L => "L",
            ECLevel::M => "M",
            ECLevel::Q => "Q",
            ECLevel::H => "H",
        };
        f.write_str(s)
    }
}

/// Data mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskPattern(u8);

impl MaskPattern {
    /// Construct from the three format-info mask bits
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x07)
    }

    /// Pattern reference (0-7)
    pub fn reference(&self) -> u8 {
        self.0
    }

    /// Whether the module at (row, col) is inverted by this mask
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        let (i, j) = (row, col);
        match self.0 {
            0 => (i + j) % 2 == 0,
            1 => i % 2 == 0,
            2 => j % 3 == 0,
            3 => (i + j) % 3 == 0,
            4 => (i / 2 + j / 3) % 2 == 0,
            5 => (i * j) % 2 + (i * j) % 3 == 0,
            6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
            _ => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        }
    }
}
