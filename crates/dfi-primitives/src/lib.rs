/// DeFiChain SDK - hashing and binary conversion primitives.
///
/// This crate provides the foundational building blocks for the SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Integer/hex/byte converters with fixed-width little-endian encodings
/// - Variable-length integer encoding
/// - Cursor reader and buffer writer for transaction wire data

pub mod hash;
pub mod util;

mod error;
pub use error::PrimitivesError;
