use crate::models::{BitMatrix, Version};

/// Function module map for a specific QR version.
/// true = function module (finder, timing, alignment, format, version),
/// false = data module.
pub struct FunctionMask {
    mask: BitMatrix,
}

impl FunctionMask {
    pub fn new(version: Version) -> Self {
        let size = version.dimension();
        let mut mask = BitMatrix::square(size);

        // Finder patterns + separators + adjoining format rows/columns
        Self::mark_region(&mut mask, 0, 0, 9, 9);
        Self::mark_region(&mut mask, size - 8, 0, 8, 9);
        Self::mark_region(&mut mask, 0, size - 8, 9, 8);

        // Timing patterns
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        // Alignment patterns
        let align = alignment_pattern_positions(version);
        for &cx in &align {
            for &cy in &align {
                let in_tl = cx <= 8 && cy <= 8;
                let in_tr = cx >= size - 9 && cy <= 8;
                let in_bl = cx <= 8 && cy >= size - 9;
                if in_tl || in_tr || in_bl {
                    continue;
                }
                Self::mark_region(&mut mask, cx - 2, cy - 2, 5, 5);
            }
        }

        // Version info blocks for v7+
        if version.number() >= 7 {
            Self::mark_region(&mut mask, size - 11, 0, 3, 6);
            Self::mark_region(&mut mask, 0, size - 11, 6, 3);
        }

        Self { mask }
    }

    pub fn size(&self) -> usize {
        self.mask.width()
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Number of modules available to carry codeword bits
    pub fn data_modules_count(&self) -> usize {
        let size = self.mask.width();
        let mut count = 0;
        for y in 0..size {
            for x in 0..size {
                if !self.mask.get(x, y) {
                    count += 1;
                }
            }
        }
        count
    }

    fn mark_region(mask: &mut BitMatrix, x: usize, y: usize, w: usize, h: usize) {
        let size = mask.width();
        for yy in y..(y + h).min(size) {
            for xx in x..(x + w).min(size) {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Alignment pattern center coordinates for a given version
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let num_align = v / 7 + 2;
    let size = version.dimension();
    let step = if v == 32 {
        26
    } else {
        (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    let mut positions = vec![0usize; num_align];
    positions[0] = 6;
    let mut pos = size as isize - 7;
    for slot in positions[1..].iter_mut().rev() {
        *slot = pos as usize;
        pos -= step as isize;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_one_data_capacity() {
        // 21x21 version 1: 26 codewords = 208 data modules
        let mask = FunctionMask::new(Version::new(1).unwrap());
        assert_eq!(mask.size(), 21);
        assert_eq!(mask.data_modules_count(), 208);
    }

    #[test]
    fn data_capacity_matches_codeword_count() {
        // Every version must expose at least total_codewords * 8 data modules,
        // with fewer than 8 remainder bits left over.
        for v in [1u8, 2, 5, 7, 10, 20, 32, 40] {
            let version = Version::new(v).unwrap();
            let mask = FunctionMask::new(version);
            let capacity = mask.data_modules_count();
            let needed = version.total_codewords() * 8;
            assert!(capacity >= needed, "v{v}: {capacity} < {needed}");
            assert!(capacity - needed < 8, "v{v}: {} remainder bits", capacity - needed);
        }
    }

    #[test]
    fn timing_and_finder_are_function_modules() {
        let mask = FunctionMask::new(Version::new(2).unwrap());
        assert!(mask.is_function(6, 10));
        assert!(mask.is_function(10, 6));
        assert!(mask.is_function(0, 0));
        assert!(mask.is_function(24, 0));
        assert!(mask.is_function(0, 24));
        // Dark module above bottom-left finder
        assert!(mask.is_function(8, 17));
        // Alignment pattern at (18, 18) for v2
        assert!(mask.is_function(18, 18));
        assert!(!mask.is_function(12, 12));
    }

    #[test]
    fn alignment_positions() {
        assert!(alignment_pattern_positions(Version::new(1).unwrap()).is_empty());
        assert_eq!(
            alignment_pattern_positions(Version::new(2).unwrap()),
            vec![6, 18]
        );
        assert_eq!(
            alignment_pattern_positions(Version::new(7).unwrap()),
            vec![6, 22, 38]
        );
    }
}
