use crate::models::BarcodeFormat;

/// Caller-supplied decoding hints.
///
/// A typed configuration bag rather than an open key/value table: each hint is
/// an explicit optional field. Hints are consumed by the reader itself: they
/// gate the accepted formats and select between the pure-symbol sampler and
/// the full detection path.
#[derive(Debug, Clone, Default)]
pub struct DecodeHints {
    /// The image contains exactly one unrotated, unskewed symbol with a plain
    /// margin; enables the fast geometric sampler and skips detection.
    pub pure_barcode: bool,
    /// Restrict decoding to these symbologies; `None` means no restriction.
    pub possible_formats: Option<Vec<BarcodeFormat>>,
}

impl DecodeHints {
    /// Hints with every field at its default (no hint given)
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt into the pure-barcode fast path
    pub fn pure_barcode(mut self) -> Self {
        self.pure_barcode = true;
        self
    }

    /// Restrict decoding to the given formats
    pub fn formats(mut self, formats: Vec<BarcodeFormat>) -> Self {
        self.possible_formats = Some(formats);
        self
    }

    /// Whether the given format is allowed by these hints
    pub fn allows(&self, format: BarcodeFormat) -> bool {
        match &self.possible_formats {
            Some(formats) => formats.contains(&format),
            None => true,
        }
    }
}
