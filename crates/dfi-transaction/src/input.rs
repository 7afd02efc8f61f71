//! Transaction input referencing a previous output.
//!
//! Contains the source transaction ID, output index, unlocking script,
//! sequence number, and the satoshi value of the consumed output (kept
//! locally for fee arithmetic, never serialized). Provides binary
//! serialization/deserialization following the chain wire format.

use dfi_primitives::util::{TxReader, TxWriter, VarInt};
use dfi_script::Script;

use crate::remotedata::Utxo;
use crate::BuilderError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// A single input in a DeFiChain transaction.
///
/// Each input references an output from a previous transaction by its
/// transaction ID (`txid`, internal byte order) and output index (`vout`).
/// The `unlocking_script` supplies the data required to satisfy the
/// referenced output's locking script; it is `None` until an external
/// signer fills it in, and serializes as an empty placeholder until then.
///
/// # Wire format
///
/// | Field            | Size             |
/// |------------------|------------------|
/// | txid             | 32 bytes (LE)    |
/// | vout             | 4 bytes (LE)     |
/// | script length    | VarInt           |
/// | unlocking_script | variable         |
/// | sequence         | 4 bytes (LE)     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// The 32-byte transaction ID of the output being spent, in internal
    /// (little-endian) byte order.
    pub txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub vout: u32,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence: u32,

    /// The unlocking script proving authorization.
    /// `None` when the input has not yet been signed.
    pub unlocking_script: Option<Script>,

    /// Satoshi value of the consumed output. Local-only, used for fee
    /// arithmetic; not part of the wire format.
    pub value: u64,
}

impl TransactionInput {
    /// Create an input from a display-order hex txid.
    ///
    /// # Arguments
    /// * `txid_hex` - 64 hex chars, display (big-endian) order.
    /// * `vout` - The output index being spent.
    /// * `value` - Satoshi value of the consumed output.
    ///
    /// # Returns
    /// A new input with default sequence and no unlocking script, or
    /// `InvalidTxid` if the hex is malformed.
    pub fn new(txid_hex: &str, vout: u32, value: u64) -> Result<Self, BuilderError> {
        let bytes = hex::decode(txid_hex)
            .map_err(|_| BuilderError::InvalidTxid(txid_hex.to_string()))?;
        if bytes.len() != 32 {
            return Err(BuilderError::InvalidTxid(txid_hex.to_string()));
        }
        let mut txid = [0u8; 32];
        txid.copy_from_slice(&bytes);
        txid.reverse();

        Ok(TransactionInput {
            txid,
            vout,
            sequence: DEFAULT_SEQUENCE,
            unlocking_script: None,
            value,
        })
    }

    /// Create an input consuming the given spendable output.
    pub fn from_utxo(utxo: &Utxo) -> Result<Self, BuilderError> {
        Self::new(&utxo.txid, utxo.vout, utxo.value)
    }

    /// Return the txid as display-order hex.
    pub fn txid_hex(&self) -> String {
        let mut id = self.txid;
        id.reverse();
        hex::encode(id)
    }

    /// Deserialize a `TransactionInput` from a `TxReader`.
    ///
    /// Reads the standard wire format: 32-byte txid, 4-byte output index,
    /// varint-prefixed unlocking script, and 4-byte sequence number. The
    /// consumed value is not on the wire and is left at zero.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, BuilderError> {
        let txid_bytes = reader
            .read_bytes(32)
            .map_err(|e| BuilderError::SerializationError(format!("reading txid: {}", e)))?;
        let mut txid = [0u8; 32];
        txid.copy_from_slice(txid_bytes);

        let vout = reader
            .read_u32_le()
            .map_err(|e| BuilderError::SerializationError(format!("reading vout: {}", e)))?;

        let script_len = reader.read_varint().map_err(|e| {
            BuilderError::SerializationError(format!("reading script length: {}", e))
        })?;

        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            BuilderError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence = reader
            .read_u32_le()
            .map_err(|e| BuilderError::SerializationError(format!("reading sequence: {}", e)))?;

        let unlocking_script = if script_bytes.is_empty() {
            None
        } else {
            Some(Script::from_bytes(script_bytes))
        };

        Ok(TransactionInput {
            txid,
            vout,
            sequence,
            unlocking_script,
            value: 0,
        })
    }

    /// Serialize this `TransactionInput` into a `TxWriter`.
    ///
    /// An unsigned input writes a zero-length script placeholder.
    pub fn write_to(&self, writer: &mut TxWriter) {
        writer.write_bytes(&self.txid);
        writer.write_u32_le(self.vout);

        match &self.unlocking_script {
            Some(script) => {
                writer.write_varint(VarInt::from(script.len()));
                writer.write_bytes(script.to_bytes());
            }
            None => writer.write_varint(VarInt::from(0u64)),
        }

        writer.write_u32_le(self.sequence);
    }
}
