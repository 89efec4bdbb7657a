pub mod matrix;
pub mod point;
pub mod result;
pub mod symbol;

pub use matrix::BitMatrix;
pub use point::Point;
pub use result::{BarcodeFormat, Decoded, MetadataKind, MetadataValue};
pub use symbol::{ECLevel, MaskPattern, Version};
