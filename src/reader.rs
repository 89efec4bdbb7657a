//! Top-level decode entry point tying together detection and decoding.

use log::debug;

use crate::decoder::Decoder;
use crate::detector::Detector;
use crate::error::DecodeError;
use crate::hints::DecodeHints;
use crate::models::{BarcodeFormat, BitMatrix, Decoded, MetadataKind, MetadataValue};
use crate::utils::BinaryImage;

/// A barcode reader over binarized images.
///
/// `decode` without hints is shorthand for default hints. `reset` clears any
/// state kept between calls; readers that hold none need not override it.
pub trait Reader {
    fn decode(&mut self, image: &BinaryImage) -> Result<Decoded, DecodeError> {
        self.decode_with_hints(image, &DecodeHints::default())
    }

    fn decode_with_hints(
        &mut self,
        image: &BinaryImage,
        hints: &DecodeHints,
    ) -> Result<Decoded, DecodeError>;

    fn reset(&mut self) {}
}

/// QR code reader
#[derive(Debug, Default)]
pub struct QrReader {
    decoder: Decoder,
}

impl QrReader {
    pub fn new() -> Self {
        Self {
            decoder: Decoder::new(),
        }
    }
}

impl Reader for QrReader {
    fn decode_with_hints(
        &mut self,
        image: &BinaryImage,
        hints: &DecodeHints,
    ) -> Result<Decoded, DecodeError> {
        if !hints.allows(BarcodeFormat::QrCode) {
            return Err(DecodeError::NotFound);
        }

        let (output, points) = if hints.pure_barcode {
            debug!("pure symbol hint set, skipping detection");
            let bits = extract_pure_bits(image.black_matrix())?;
            (self.decoder.decode(&bits)?, Vec::new())
        } else {
            let detected = Detector::new(image.black_matrix()).detect()?;
            (self.decoder.decode(&detected.bits)?, detected.points)
        };

        let mut result = Decoded::new(
            output.text,
            output.raw_bytes,
            points,
            BarcodeFormat::QrCode,
        );
        if !output.byte_segments.is_empty() {
            result.put_metadata(
                MetadataKind::ByteSegments,
                MetadataValue::Segments(output.byte_segments),
            );
        }
        result.put_metadata(
            MetadataKind::ErrorCorrectionLevel,
            MetadataValue::Text(output.ec_level.to_string()),
        );
        Ok(result)
    }
}

/// Sample the module grid of an axis-aligned, unrotated symbol rendered at a
/// whole number of pixels per module, as produced by screenshots or direct
/// renderings.
///
/// The white border is skipped by walking the top-left diagonal to the first
/// dark pixel; the dark run that follows gives the module size. The symbol
/// width then comes from the last dark pixel on the border row and must
/// divide evenly into modules. Sampling starts half a module in so that each
/// probe lands mid-module.
pub fn extract_pure_bits(image: &BitMatrix) -> Result<BitMatrix, DecodeError> {
    let height = image.height();
    let width = image.width();
    let min_dimension = height.min(width);

    let mut border_width = 0;
    while border_width < min_dimension && !image.get(border_width, border_width) {
        border_width += 1;
    }
    if border_width == min_dimension {
        return Err(DecodeError::NotFound);
    }

    let mut module_end = border_width;
    while module_end < min_dimension && image.get(module_end, module_end) {
        module_end += 1;
    }
    if module_end == min_dimension {
        return Err(DecodeError::NotFound);
    }
    let module_size = module_end - border_width;

    // Rightmost dark pixel on the first symbol row
    let mut x = width as i64 - 1;
    while x >= 0 && !image.get(x as usize, border_width) {
        x -= 1;
    }
    if x < 0 {
        return Err(DecodeError::NotFound);
    }
    let row_end_of_symbol = x as usize + 1;

    if (row_end_of_symbol - border_width) % module_size != 0 {
        return Err(DecodeError::NotFound);
    }
    let dimension = (row_end_of_symbol - border_width) / module_size;

    // Recenter onto module middles
    let border_width = border_width + (module_size >> 1);

    let sample_dimension = border_width + (dimension - 1) * module_size;
    if sample_dimension >= width || sample_dimension >= height {
        return Err(DecodeError::NotFound);
    }

    let mut bits = BitMatrix::square(dimension);
    for i in 0..dimension {
        let y_offset = border_width + i * module_size;
        for j in 0..dimension {
            if image.get(border_width + j * module_size, y_offset) {
                bits.set(j, i, true);
            }
        }
    }
    Ok(bits)
}
