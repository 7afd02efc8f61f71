#![deny(missing_docs)]

//! DeFiChain client-side transaction construction SDK - complete SDK.
//!
//! Re-exports all SDK components for convenient single-crate usage.

pub use dfi_ocean as ocean;
pub use dfi_primitives as primitives;
pub use dfi_script as script;
pub use dfi_transaction as transaction;
