/// DeFiChain SDK - script composition and address handling.
///
/// Provides the Script type, opcode definitions, the standard script
/// templates (P2PKH, P2SH, P2WPKH, embedded-data), and decoding/encoding
/// of the DeFiChain address families (Base58Check and bech32).

pub mod address;
pub mod opcodes;
pub mod script;

mod error;
pub use address::{Address, AddressFormat, Network};
pub use error::ScriptError;
pub use script::Script;
