/// Unified error type for all primitives operations.
///
/// Covers errors from integer conversion, hex decoding, and wire-format
/// reading.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// The integer does not fit into the requested fixed width.
    #[error("value {value} does not fit in {width} byte(s)")]
    IntOutOfRange {
        /// The value that was being encoded.
        value: u64,
        /// The requested encoding width in bytes.
        width: usize,
    },

    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The input ended before a complete value could be read.
    #[error("unexpected end of data")]
    UnexpectedEof,
}
