use crate::decoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Reads the codeword bitstream out of an unmasked symbol matrix.
///
/// Traversal follows the standard zigzag: two-module columns from the right
/// edge leftward, alternating upward and downward, skipping the vertical
/// timing pattern at column 6. The right module of each pair comes first.
pub struct BitstreamReader;

impl BitstreamReader {
    /// Extract data-module bits in readout order
    pub fn read_bits(matrix: &BitMatrix, func: &FunctionMask) -> Vec<bool> {
        let dimension = func.size();
        let mut bits = Vec::with_capacity(func.data_modules_count());

        let mut upward = true;
        let mut col = dimension as i32 - 1;

        while col > 0 {
            if col == 6 {
                col -= 1;
                continue;
            }

            let rows: Box<dyn Iterator<Item = usize>> = if upward {
                Box::new((0..dimension).rev())
            } else {
                Box::new(0..dimension)
            };

            for row in rows {
                for c in [col, col - 1] {
                    let x = c as usize;
                    if !func.is_function(x, row) {
                        bits.push(matrix.get(x, row));
                    }
                }
            }

            upward = !upward;
            col -= 2;
        }

        bits
    }

    /// Pack the readout bits into 8-bit codewords, MSB first.
    /// Remainder bits that do not fill a whole codeword are dropped.
    pub fn read_codewords(matrix: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
        let bits = Self::read_bits(matrix, func);
        bits.chunks_exact(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))
            })
            .collect()
    }
}
