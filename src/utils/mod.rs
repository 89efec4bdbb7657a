//! Image-processing helpers feeding the reader pipeline:
//! grayscale conversion, binarization, and perspective geometry.

pub mod binarization;
pub mod geometry;
pub mod grayscale;

pub use binarization::BinaryImage;
