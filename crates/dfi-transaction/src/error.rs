use crate::remotedata::{BroadcastError, RemoteDataError};
use crate::transaction::TxState;

/// Error types for transaction construction.
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    /// The same (txid, vout) pair was added twice to one transaction.
    #[error("duplicate input {txid}:{vout}")]
    DuplicateInput {
        /// The display-order txid of the offending input.
        txid: String,
        /// The output index of the offending input.
        vout: u32,
    },

    /// An output amount is not acceptable (zero on a non-data output).
    #[error("invalid output amount: {0}")]
    InvalidAmount(String),

    /// The accumulated inputs cannot cover the requested outputs plus fee.
    #[error("insufficient funds: required {required} satoshi, available {available}")]
    InsufficientFunds {
        /// Satoshis needed (outputs plus fee).
        required: u64,
        /// Satoshis available in the considered input set.
        available: u64,
    },

    /// A transaction id string is not 32 bytes of hex.
    #[error("invalid transaction id: {0}")]
    InvalidTxid(String),

    /// An operation was attempted in a lifecycle state that forbids it.
    #[error("{operation} is not allowed in the {state} state")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the transaction was in.
        state: TxState,
    },

    /// The transaction structure is invalid (e.g. no inputs or outputs).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// An error occurred during binary/hex serialization or deserialization.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An underlying script error (forwarded from `dfi-script`).
    #[error("script error: {0}")]
    Script(#[from] dfi_script::ScriptError),

    /// An underlying primitives error (forwarded from `dfi-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] dfi_primitives::PrimitivesError),

    /// A remote data fetch failed while assembling the transaction.
    #[error("remote data error: {0}")]
    RemoteData(#[from] RemoteDataError),
}

/// Error types for the intent-level builder facade.
#[derive(Debug, thiserror::Error)]
pub enum TxBuilderError {
    /// Attempted to send a transaction that has not been signed.
    #[error("the transaction cannot be sent because it is not yet signed")]
    NotSigned,

    /// The facade was constructed from inconsistent parts.
    #[error("facade misconfiguration: {0}")]
    Misconfigured(String),

    /// A construction error from the raw builder.
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// The backend rejected or failed the broadcast.
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),

    /// A remote data fetch failed.
    #[error(transparent)]
    RemoteData(#[from] RemoteDataError),
}
