//! The signing identity bound to a builder facade.
//!
//! An account knows who signs - a public key and the network it operates
//! on - and derives the default P2PKH address for that key. Private keys
//! and signature algorithms live with the external signing collaborator,
//! never here.

use dfi_primitives::hash::hash160;
use dfi_script::{Address, AddressFormat, Network};

use crate::BuilderError;

/// A signing identity: public key, network, and derived default address.
#[derive(Clone, Debug)]
pub struct Account {
    public_key: Option<Vec<u8>>,
    network: Network,
    default_address: Address,
}

impl Account {
    /// Create an account from a hex-encoded public key.
    ///
    /// Derives the default P2PKH address from the key's HASH160.
    ///
    /// # Arguments
    /// * `pub_key_hex` - Compressed or uncompressed public key hex.
    /// * `network` - The network the account operates on.
    pub fn from_public_key(pub_key_hex: &str, network: Network) -> Result<Self, BuilderError> {
        let public_key = hex::decode(pub_key_hex)
            .map_err(|e| BuilderError::Script(dfi_script::ScriptError::InvalidHex(e.to_string())))?;
        let hash = hash160(&public_key);
        let default_address = Address::from_hash(AddressFormat::P2pkh, network, &hash);
        Ok(Account {
            public_key: Some(public_key),
            network,
            default_address,
        })
    }

    /// Create an account identified only by an address it controls.
    ///
    /// Used when the public key is held exclusively by the external signer.
    pub fn from_address(address: Address) -> Self {
        Account {
            public_key: None,
            network: address.network,
            default_address: address,
        }
    }

    /// The account's public key as hex, if known.
    pub fn public_key_hex(&self) -> Option<String> {
        self.public_key.as_deref().map(hex::encode)
    }

    /// The network this account operates on.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The account's default address.
    pub fn default_address(&self) -> &Address {
        &self.default_address
    }
}
