//! Transaction output with satoshi value and locking script.
//!
//! Defines the spending conditions for the output's value. Provides
//! binary serialization/deserialization following the chain wire format.

use dfi_primitives::util::{TxReader, TxWriter, VarInt};
use dfi_script::Script;

use crate::BuilderError;

/// A single output in a DeFiChain transaction.
///
/// Each output specifies a satoshi `value` and a `script` that defines the
/// conditions under which the funds may be spent. Data-only outputs
/// (OP_RETURN scripts) carry a value of zero.
///
/// # Wire format
///
/// | Field          | Size           |
/// |----------------|----------------|
/// | value          | 8 bytes (LE)   |
/// | script length  | VarInt         |
/// | script         | variable       |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// The number of satoshis locked by this output.
    pub value: u64,

    /// The locking script that defines spending conditions.
    pub script: Script,
}

impl TransactionOutput {
    /// Create a new output.
    pub fn new(value: u64, script: Script) -> Self {
        TransactionOutput { value, script }
    }

    /// Deserialize a `TransactionOutput` from a `TxReader`.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, BuilderError> {
        let value = reader
            .read_u64_le()
            .map_err(|e| BuilderError::SerializationError(format!("reading value: {}", e)))?;

        let script_len = reader.read_varint().map_err(|e| {
            BuilderError::SerializationError(format!("reading script length: {}", e))
        })?;

        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            BuilderError::SerializationError(format!("reading locking script: {}", e))
        })?;

        Ok(TransactionOutput {
            value,
            script: Script::from_bytes(script_bytes),
        })
    }

    /// Serialize this `TransactionOutput` into a `TxWriter`.
    pub fn write_to(&self, writer: &mut TxWriter) {
        writer.write_u64_le(self.value);
        writer.write_varint(VarInt::from(self.script.len()));
        writer.write_bytes(self.script.to_bytes());
    }

    /// Serialize this output to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = TxWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}
