/// DeFiChain SDK - transaction building, accumulation, and serialization.
///
/// Provides the Transaction type with its explicit lifecycle state machine,
/// inputs/outputs with wire serialization, deterministic UTXO selection,
/// the raw transaction builder with fee and change arithmetic, DeFi
/// custom-transaction payloads, and the intent-level builder facade bound
/// to a pluggable remote data source.

pub mod account;
pub mod builder;
pub mod dftx;
pub mod input;
pub mod output;
pub mod remotedata;
pub mod transaction;
pub mod txbuilder;

mod error;
pub use account::Account;
pub use builder::{RawTransactionBuilder, SelectionPolicy};
pub use dftx::{CustomTx, TokenAmount};
pub use error::{BuilderError, TxBuilderError};
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use remotedata::{BroadcastError, RemoteData, RemoteDataError, Utxo};
pub use transaction::{Transaction, TxState};
pub use txbuilder::TxBuilder;
