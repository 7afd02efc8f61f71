#![deny(missing_docs)]

//! # dfi-ocean
//!
//! HTTP client for the Ocean REST API: spendable outputs, fee estimates,
//! and raw transaction broadcasting.
//!
//! The client is async-first and also implements the synchronous
//! [`RemoteData`](dfi_transaction::RemoteData) contract from
//! `dfi-transaction`, so it can be bound directly to a builder facade.
//!
//! # Example
//!
//! ```no_run
//! use dfi_ocean::{OceanClient, OceanConfig};
//!
//! let client = OceanClient::new(OceanConfig::default()).expect("client");
//! ```

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::OceanClient;
pub use error::OceanError;
pub use types::OceanConfig;
