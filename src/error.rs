/// Terminal failure kinds for a decode attempt.
///
/// All three propagate to the caller unwrapped; the reader never returns a
/// partial result alongside an error, and never retries internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// No decodable symbol present under the stated assumptions
    #[error("no barcode symbol found")]
    NotFound,
    /// A symbol was located but its bits do not parse as a valid encoded structure
    #[error("symbol bits do not form a valid encoded structure")]
    FormatInvalid,
    /// A symbol was located and parsed but error correction could not repair the data
    #[error("error correction failed to validate symbol data")]
    ChecksumFailed,
}
