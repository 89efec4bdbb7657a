use std::collections::BTreeMap;

use super::Point;

/// Symbology tag attached to every decode result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarcodeFormat {
    /// QR Code (ISO/IEC 18004, Model 2)
    QrCode,
}

/// Keys for the optional metadata attached to a [`Decoded`] result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetadataKind {
    /// Raw byte segments, one per byte-mode segment in the symbol
    ByteSegments,
    /// Error correction level, in display form ("L"/"M"/"Q"/"H")
    ErrorCorrectionLevel,
}

/// Values stored in the result metadata map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    /// Byte-mode segment payloads
    Segments(Vec<Vec<u8>>),
    /// Free-form text value
    Text(String),
}

/// A successfully decoded barcode
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Decoded payload as text
    pub text: String,
    /// Raw decoded payload bytes
    pub raw_bytes: Vec<u8>,
    /// Locator points in source-image coordinates; empty on the pure path
    pub points: Vec<Point>,
    /// Symbology that produced this result
    pub format: BarcodeFormat,
    metadata: BTreeMap<MetadataKind, MetadataValue>,
}

impl Decoded {
    /// Assemble a result with no metadata attached yet
    pub fn new(text: String, raw_bytes: Vec<u8>, points: Vec<Point>, format: BarcodeFormat) -> Self {
        Self {
            text,
            raw_bytes,
            points,
            format,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry, replacing any previous value for the kind
    pub fn put_metadata(&mut self, kind: MetadataKind, value: MetadataValue) {
        self.metadata.insert(kind, value);
    }

    /// Look up a metadata entry
    pub fn metadata(&self, kind: MetadataKind) -> Option<&MetadataValue> {
        self.metadata.get(&kind)
    }

    /// Byte segments, if the symbol carried any byte-mode data
    pub fn byte_segments(&self) -> Option<&[Vec<u8>]> {
        match self.metadata.get(&MetadataKind::ByteSegments) {
            Some(MetadataValue::Segments(segments)) => Some(segments),
            _ => None,
        }
    }

    /// Error correction level in display form, if known
    pub fn ec_level(&self) -> Option<&str> {
        match self.metadata.get(&MetadataKind::ErrorCorrectionLevel) {
            Some(MetadataValue::Text(level)) => Some(level),
            _ => None,
        }
    }
}
