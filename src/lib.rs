//! qrdec - QR code decoding library
//!
//! Takes a binarized image, locates a QR symbol through its finder patterns
//! (or samples it directly when the caller knows the image is a clean,
//! axis-aligned rendering), and decodes the payload with Reed-Solomon error
//! correction.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Symbol matrix decoding (format info, error correction, data modes)
pub mod decoder;
/// Symbol location (finder patterns, corner ordering, grid sampling)
pub mod detector;
/// Decode error type
pub mod error;
/// Caller-supplied decode hints
pub mod hints;
/// Core data structures (BitMatrix, Point, Decoded, etc.)
pub mod models;
/// Top-level reader API
pub mod reader;
/// Image-processing helpers (grayscale, binarization, geometry)
pub mod utils;

pub use error::DecodeError;
pub use hints::DecodeHints;
pub use models::{
    BarcodeFormat, BitMatrix, Decoded, ECLevel, MaskPattern, MetadataKind, MetadataValue, Point,
    Version,
};
pub use reader::{extract_pure_bits, QrReader, Reader};
pub use utils::BinaryImage;

/// Decode a QR code from raw RGB bytes (3 bytes per pixel).
///
/// Convenience wrapper: converts to grayscale, binarizes with Otsu's
/// threshold, and runs a [`QrReader`] with default hints.
pub fn decode_rgb(image: &[u8], width: usize, height: usize) -> Result<Decoded, DecodeError> {
    let binary = BinaryImage::from_rgb(image, width, height);
    QrReader::new().decode(&binary)
}

/// Same as [`decode_rgb`] with explicit hints, for callers that know the
/// image is a pure rendering or want to gate formats.
pub fn decode_rgb_with_hints(
    image: &[u8],
    width: usize,
    height: usize,
    hints: &DecodeHints,
) -> Result<Decoded, DecodeError> {
    let binary = BinaryImage::from_rgb(image, width, height);
    QrReader::new().decode_with_hints(&binary, hints)
}
