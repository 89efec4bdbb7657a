//! Symbol matrix decoding: format/version extraction, unmasking, codeword
//! readout, error correction, and payload parsing.

pub mod bitstream;
pub mod format;
pub mod function_mask;
pub mod modes;
pub mod reed_solomon;
pub mod tables;
pub mod unmask;
pub mod version;

use log::{debug, trace};

use crate::error::DecodeError;
use crate::models::{BitMatrix, ECLevel, Version};

use bitstream::BitstreamReader;
use format::FormatInfo;
use function_mask::FunctionMask;
use modes::{BitSource, Mode};
use reed_solomon::ReedSolomonDecoder;
use tables::ec_block_info;
use version::VersionInfo;

/// Outcome of decoding a sampled symbol matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOutput {
    /// Decoded text content
    pub text: String,
    /// Corrected data codewords, before segment parsing
    pub raw_bytes: Vec<u8>,
    /// Raw contents of each byte-mode segment, in payload order
    pub byte_segments: Vec<Vec<u8>>,
    /// Error correction level the symbol was encoded with
    pub ec_level: ECLevel,
}

/// Decodes a square module matrix into its payload
#[derive(Debug, Default)]
pub struct Decoder;

impl Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode a matrix of dark/light modules.
    ///
    /// The matrix must be square with a valid symbol dimension
    /// (21 + 4k, up to 177).
    pub fn decode(&self, matrix: &BitMatrix) -> Result<DecoderOutput, DecodeError> {
        let dimension = matrix.width();
        if matrix.height() != dimension {
            return Err(DecodeError::FormatInvalid);
        }
        let version = VersionInfo::read(matrix).ok_or(DecodeError::FormatInvalid)?;
        let format = FormatInfo::read(matrix).ok_or(DecodeError::FormatInvalid)?;
        debug!(
            "symbol: version {}, EC level {}, mask {}",
            version.number(),
            format.ec_level,
            format.mask_pattern.reference()
        );

        let func = FunctionMask::new(version);
        let mut unmasked = matrix.clone();
        unmask::unmask(&mut unmasked, format.mask_pattern, &func);

        let codewords = BitstreamReader::read_codewords(&unmasked, &func);
        if codewords.len() != version.total_codewords() {
            return Err(DecodeError::FormatInvalid);
        }

        let data = correct_codewords(&codewords, version, format.ec_level)?;
        trace!("{} corrected data codewords", data.len());

        let (text, byte_segments) = parse_segments(&data, version)?;
        Ok(DecoderOutput {
            text,
            raw_bytes: data,
            byte_segments,
            ec_level: format.ec_level,
        })
    }
}

/// Split the interleaved codeword stream into its Reed-Solomon blocks,
/// correct each block, and concatenate the data codewords in block order.
fn correct_codewords(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<u8>, DecodeError> {
    let info = ec_block_info(version, ec_level);
    let total = codewords.len();
    let ecc_total = info.num_blocks * info.ecc_per_block;
    if total <= ecc_total {
        return Err(DecodeError::FormatInvalid);
    }
    let data_total = total - ecc_total;

    // Short blocks come first; long blocks carry one extra data codeword
    let short_len = data_total / info.num_blocks;
    let num_long = data_total % info.num_blocks;
    let num_short = info.num_blocks - num_long;
    let long_len = short_len + 1;

    let mut blocks: Vec<Vec<u8>> = (0..info.num_blocks)
        .map(|_| Vec::with_capacity(long_len + info.ecc_per_block))
        .collect();

    // Data codewords are interleaved one per block per round
    let mut idx = 0;
    for round in 0..long_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            let block_data_len = if b < num_short { short_len } else { long_len };
            if round < block_data_len {
                block.push(codewords[idx]);
                idx += 1;
            }
        }
    }
    // Then the ECC codewords, also one per block per round
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.push(codewords[idx]);
            idx += 1;
        }
    }
    debug_assert_eq!(idx, total);

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data = Vec::with_capacity(data_total);
    for (b, block) in blocks.iter_mut().enumerate() {
        rs.correct(block)?;
        let block_data_len = if b < num_short { short_len } else { long_len };
        data.extend_from_slice(&block[..block_data_len]);
    }
    Ok(data)
}

/// Walk the segment stream in the corrected data codewords
fn parse_segments(data: &[u8], version: Version) -> Result<(String, Vec<Vec<u8>>), DecodeError> {
    let mut source = BitSource::new(data);
    let mut text = String::new();
    let mut byte_segments: Vec<Vec<u8>> = Vec::new();
    let mut fc1_in_effect = false;

    loop {
        // Fewer than 4 bits left means an implicit terminator
        let mode = if source.available() < 4 {
            Mode::Terminator
        } else {
            Mode::from_bits(source.read_bits(4)?)?
        };
        if mode == Mode::Terminator {
            break;
        }

        match mode {
            Mode::Fnc1FirstPosition | Mode::Fnc1SecondPosition => {
                fc1_in_effect = true;
            }
            Mode::StructuredAppend => {
                // Sequence number, total count, and parity; not exposed
                if source.available() < 16 {
                    return Err(DecodeError::FormatInvalid);
                }
                source.read_bits(16)?;
            }
            Mode::Eci => {
                // Assignment value is variable length; parsed and ignored,
                // text is rendered as UTF-8 regardless
                let value = read_eci_designator(&mut source)?;
                trace!("ECI designator {value}");
            }
            Mode::Numeric => {
                let count = source.read_bits(mode.character_count_bits(version))? as usize;
                modes::numeric::decode(&mut source, count, &mut text)?;
            }
            Mode::Alphanumeric => {
                let count = source.read_bits(mode.character_count_bits(version))? as usize;
                modes::alphanumeric::decode(&mut source, count, fc1_in_effect, &mut text)?;
            }
            Mode::Byte => {
                let count = source.read_bits(mode.character_count_bits(version))? as usize;
                modes::byte::decode(&mut source, count, &mut text, &mut byte_segments)?;
            }
            Mode::Kanji => {
                let count = source.read_bits(mode.character_count_bits(version))? as usize;
                modes::kanji::decode(&mut source, count, &mut text)?;
            }
            Mode::Terminator => unreachable!(),
        }
    }

    Ok((text, byte_segments))
}

fn read_eci_designator(source: &mut BitSource<'_>) -> Result<u32, DecodeError> {
    let first = source.read_bits(8)?;
    if first & 0x80 == 0 {
        return Ok(first & 0x7F);
    }
    if first & 0xC0 == 0x80 {
        let second = source.read_bits(8)?;
        return Ok(((first & 0x3F) << 8) | second);
    }
    if first & 0xE0 == 0xC0 {
        let rest = source.read_bits(16)?;
        return Ok(((first & 0x1F) << 16) | rest);
    }
    Err(DecodeError::FormatInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_payload() {
        // Mode 0001, count 8 (10 bits), digits "01234567" as 012/345/67,
        // then terminator. Classic specification example.
        let data = [0x10, 0x20, 0x0C, 0x56, 0x61, 0x80];
        let v1 = Version::new(1).unwrap();
        let (text, segments) = parse_segments(&data, v1).unwrap();
        assert_eq!(text, "01234567");
        assert!(segments.is_empty());
    }

    #[test]
    fn parses_byte_payload_with_segment() {
        // Mode 0100, count 2, bytes "AB", terminator
        let data = [0x40, 0x24, 0x14, 0x20];
        let v1 = Version::new(1).unwrap();
        let (text, segments) = parse_segments(&data, v1).unwrap();
        assert_eq!(text, "AB");
        assert_eq!(segments, vec![b"AB".to_vec()]);
    }

    #[test]
    fn rejects_reserved_mode() {
        // Mode 0110 is not assigned
        let data = [0x60, 0x00];
        let v1 = Version::new(1).unwrap();
        assert_eq!(parse_segments(&data, v1), Err(DecodeError::FormatInvalid));
    }

    #[test]
    fn non_square_matrix_is_invalid() {
        let matrix = BitMatrix::new(21, 25);
        assert_eq!(
            Decoder::new().decode(&matrix),
            Err(DecodeError::FormatInvalid)
        );
    }

    #[test]
    fn invalid_dimension_is_rejected() {
        let matrix = BitMatrix::square(20);
        assert_eq!(
            Decoder::new().decode(&matrix),
            Err(DecodeError::FormatInvalid)
        );
    }
}
