//! The remote chain-state abstraction.
//!
//! Construction logic pulls spendable outputs and fee estimates through the
//! [`RemoteData`] trait and hands finished transactions back to it for
//! broadcasting. Exactly one implementation is bound to a builder facade;
//! nothing in this crate ever names a concrete backend.

use serde::{Deserialize, Serialize};

use dfi_script::Script;

/// A spendable transaction output.
///
/// References the originating transaction by display-order txid and output
/// index, and carries the satoshi value plus the owning locking script.
/// Each UTXO is consumed exactly once across the lifetime of the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Display-order hex txid of the originating transaction.
    pub txid: String,
    /// Index of the output within that transaction.
    pub vout: u32,
    /// Value in satoshis.
    pub value: u64,
    /// The locking script owning this output.
    pub script: Script,
}

/// Errors from fetching chain state.
#[derive(Debug, thiserror::Error)]
pub enum RemoteDataError {
    /// The backend could not be reached or the call failed in transit.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with something the client could not interpret.
    #[error("malformed response: {0}")]
    Response(String),
}

/// Errors from broadcasting a transaction.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    /// The backend rejected the transaction. The message is the backend's
    /// raw rejection reason, surfaced verbatim so callers can distinguish
    /// fee-related rejection from a conflicting spend.
    #[error("backend rejected transaction: {0}")]
    Rejected(String),

    /// The backend could not be reached or the call failed in transit.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Capability set every chain-state backend must provide.
///
/// All calls are synchronous from the caller's point of view and perform no
/// internal retries; retry policy belongs to the implementation's host, not
/// to the construction core.
pub trait RemoteData {
    /// Fetch the spendable outputs currently owned by `address`.
    fn list_unspent(&self, address: &str) -> Result<Vec<Utxo>, RemoteDataError>;

    /// Fetch the current fee estimate in DFI per kilobyte.
    fn estimate_fee(&self) -> Result<f64, RemoteDataError>;

    /// Broadcast a serialized transaction.
    ///
    /// # Arguments
    /// * `raw_tx_hex` - The hex-encoded wire bytes.
    /// * `max_fee_rate` - Optional broadcast-time rejection threshold,
    ///   forwarded to the backend.
    ///
    /// # Returns
    /// The broadcast transaction id, or a [`BroadcastError`] carrying the
    /// backend's rejection reason.
    fn send_tx(
        &self,
        raw_tx_hex: &str,
        max_fee_rate: Option<f64>,
    ) -> Result<String, BroadcastError>;
}
