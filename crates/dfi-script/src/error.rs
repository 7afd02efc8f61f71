/// Error types for script and address operations.
///
/// Covers script composition failures, push-size limits, and address
/// decoding/validation problems.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A push exceeds the one-byte length-prefix form used by the
    /// fixed script templates.
    #[error("push of {0} bytes exceeds the one-byte length limit of 255")]
    PushTooLarge(usize),

    /// Push data exceeds the maximum the push encoding can express.
    #[error("data too big")]
    DataTooBig,

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid address length after Base58 decoding.
    #[error("invalid address length for '{0}'")]
    InvalidAddressLength(String),

    /// Address version byte or HRP is not recognized on any network.
    #[error("address not supported: {0}")]
    UnsupportedAddress(String),

    /// Address belongs to a different network than configured.
    #[error("address '{address}' does not belong to {expected}")]
    WrongNetwork {
        /// The offending address string.
        address: String,
        /// The network the codec was configured for.
        expected: &'static str,
    },

    /// Base58Check checksum does not match.
    #[error("checksum failed")]
    ChecksumFailed,

    /// Bech32 decoding failed (bad charset, checksum, or payload).
    #[error("invalid bech32: {0}")]
    InvalidBech32(String),

    /// Error from the primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] dfi_primitives::PrimitivesError),
}
