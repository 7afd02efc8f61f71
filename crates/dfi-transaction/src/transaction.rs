//! Core transaction type with an explicit lifecycle state machine.
//!
//! A transaction moves `Empty -> Accumulating -> Finalized -> Signed ->
//! Broadcast`. Inputs and outputs can only be appended before finalization,
//! unlocking scripts can only be attached between finalization and the
//! signed mark, and broadcasting is reserved for signed transactions.
//! Every illegal transition is an eager [`BuilderError::InvalidState`].

use std::fmt;

use dfi_primitives::hash::sha256d;
use dfi_primitives::util::{TxReader, TxWriter, VarInt};
use dfi_script::Script;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::BuilderError;

/// Transaction format version emitted by this SDK.
pub const DEFAULT_TX_VERSION: u32 = 4;

/// Lifecycle state of a [`Transaction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxState {
    /// Freshly created, nothing accumulated yet.
    Empty,
    /// Inputs and/or outputs have been appended.
    Accumulating,
    /// Structure is complete and validated; serializable, unsigned.
    Finalized,
    /// Unlocking scripts attached by an external signer.
    Signed,
    /// Accepted by a backend for broadcast.
    Broadcast,
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxState::Empty => "empty",
            TxState::Accumulating => "accumulating",
            TxState::Finalized => "finalized",
            TxState::Signed => "signed",
            TxState::Broadcast => "broadcast",
        };
        write!(f, "{}", name)
    }
}

/// A DeFiChain transaction consisting of a version, a set of inputs, a set
/// of outputs, and a lock time.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | VarInt                    |
/// | inputs       | variable (per input)      |
/// | output count | VarInt                    |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,

    /// Lock time. If non-zero, the transaction is not valid until the
    /// specified block height or Unix timestamp.
    pub lock_time: u32,

    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    state: TxState,
}

impl Transaction {
    /// Create a new empty transaction with the default version and lock
    /// time 0.
    pub fn new() -> Self {
        Transaction {
            version: DEFAULT_TX_VERSION,
            lock_time: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
            state: TxState::Empty,
        }
    }

    /// Return the current lifecycle state.
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Ordered list of inputs.
    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    /// Ordered list of outputs.
    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    /// Sum of the consumed input values in satoshis.
    pub fn input_value(&self) -> u64 {
        self.inputs.iter().map(|i| i.value).sum()
    }

    /// Sum of the output values in satoshis.
    pub fn output_value(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    // -----------------------------------------------------------------
    // Accumulation
    // -----------------------------------------------------------------

    /// Append an input.
    ///
    /// Only allowed before finalization. Rejects a `(txid, vout)` pair that
    /// is already consumed by this transaction.
    pub fn add_input(&mut self, input: TransactionInput) -> Result<(), BuilderError> {
        self.ensure_accumulating("add_input")?;
        if self
            .inputs
            .iter()
            .any(|i| i.txid == input.txid && i.vout == input.vout)
        {
            return Err(BuilderError::DuplicateInput {
                txid: input.txid_hex(),
                vout: input.vout,
            });
        }
        self.inputs.push(input);
        self.state = TxState::Accumulating;
        Ok(())
    }

    /// Append an output.
    ///
    /// Only allowed before finalization. A zero value is rejected unless the
    /// script is a data-only (OP_RETURN) script; amounts are unsigned, so
    /// negative values cannot be expressed at all.
    pub fn add_output(&mut self, output: TransactionOutput) -> Result<(), BuilderError> {
        self.ensure_accumulating("add_output")?;
        if output.value == 0 && !output.script.is_data() {
            return Err(BuilderError::InvalidAmount(
                "zero value on a non-data output".to_string(),
            ));
        }
        self.outputs.push(output);
        self.state = TxState::Accumulating;
        Ok(())
    }

    fn ensure_accumulating(&self, operation: &'static str) -> Result<(), BuilderError> {
        match self.state {
            TxState::Empty | TxState::Accumulating => Ok(()),
            state => Err(BuilderError::InvalidState { operation, state }),
        }
    }

    // -----------------------------------------------------------------
    // Finalization and signing lifecycle
    // -----------------------------------------------------------------

    /// Seal the structure: no further inputs or outputs can be added.
    ///
    /// Requires at least one input and one output; fails eagerly so a
    /// partial transaction never leaves the builder.
    pub fn finalize(&mut self) -> Result<(), BuilderError> {
        match self.state {
            TxState::Accumulating => {}
            state => {
                return Err(BuilderError::InvalidState {
                    operation: "finalize",
                    state,
                })
            }
        }
        if self.inputs.is_empty() {
            return Err(BuilderError::InvalidTransaction("no inputs".to_string()));
        }
        if self.outputs.is_empty() {
            return Err(BuilderError::InvalidTransaction("no outputs".to_string()));
        }
        self.state = TxState::Finalized;
        Ok(())
    }

    /// Attach the unlocking script for one input.
    ///
    /// This is the surface an external signer drives; it is only valid on a
    /// finalized, not-yet-signed transaction.
    pub fn set_unlocking_script(
        &mut self,
        index: usize,
        script: Script,
    ) -> Result<(), BuilderError> {
        if self.state != TxState::Finalized {
            return Err(BuilderError::InvalidState {
                operation: "set_unlocking_script",
                state: self.state,
            });
        }
        let input = self.inputs.get_mut(index).ok_or_else(|| {
            BuilderError::InvalidTransaction(format!("input index {} out of range", index))
        })?;
        input.unlocking_script = Some(script);
        Ok(())
    }

    /// Mark the transaction as signed.
    ///
    /// Requires every input to carry an unlocking script.
    pub fn mark_signed(&mut self) -> Result<(), BuilderError> {
        if self.state != TxState::Finalized {
            return Err(BuilderError::InvalidState {
                operation: "mark_signed",
                state: self.state,
            });
        }
        if self.inputs.iter().any(|i| i.unlocking_script.is_none()) {
            return Err(BuilderError::InvalidTransaction(
                "not every input carries an unlocking script".to_string(),
            ));
        }
        self.state = TxState::Signed;
        Ok(())
    }

    /// Mark the transaction as broadcast.
    ///
    /// Only a signed transaction can transition here; the facade performs
    /// this after the backend accepts the broadcast.
    pub fn mark_broadcast(&mut self) -> Result<(), BuilderError> {
        if self.state != TxState::Signed {
            return Err(BuilderError::InvalidState {
                operation: "mark_broadcast",
                state: self.state,
            });
        }
        self.state = TxState::Broadcast;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Serialize this transaction to raw wire bytes.
    ///
    /// Only available from the `Finalized` state onward; an accumulating
    /// transaction has no defined wire form.
    pub fn serialize(&self) -> Result<Vec<u8>, BuilderError> {
        match self.state {
            TxState::Finalized | TxState::Signed | TxState::Broadcast => {}
            state => {
                return Err(BuilderError::InvalidState {
                    operation: "serialize",
                    state,
                })
            }
        }

        let mut writer = TxWriter::with_capacity(self.size_hint());
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        writer.write_u32_le(self.lock_time);
        Ok(writer.into_bytes())
    }

    /// Serialize this transaction to a lowercase hex string.
    pub fn serialize_hex(&self) -> Result<String, BuilderError> {
        Ok(hex::encode(self.serialize()?))
    }

    /// Compute the transaction ID as a display-order hex string.
    ///
    /// The txid is the double SHA-256 of the serialization, byte-reversed
    /// per chain convention.
    pub fn txid(&self) -> Result<String, BuilderError> {
        let mut id = sha256d(&self.serialize()?);
        id.reverse();
        Ok(hex::encode(id))
    }

    fn size_hint(&self) -> usize {
        10 + self.inputs.len() * 148 + self.outputs.len() * 34
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, BuilderError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| BuilderError::SerializationError(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// The byte slice must contain exactly one complete transaction with no
    /// trailing data. A parsed transaction lands in the `Signed` state when
    /// every input carries an unlocking script, otherwise in `Finalized`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BuilderError> {
        let mut reader = TxReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(BuilderError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `TxReader`.
    pub fn read_from(reader: &mut TxReader) -> Result<Self, BuilderError> {
        let version = reader
            .read_u32_le()
            .map_err(|e| BuilderError::SerializationError(format!("reading version: {}", e)))?;

        let input_count = reader.read_varint().map_err(|e| {
            BuilderError::SerializationError(format!("reading input count: {}", e))
        })?;
        let mut inputs = Vec::with_capacity(input_count.value() as usize);
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(|e| {
            BuilderError::SerializationError(format!("reading output count: {}", e))
        })?;
        let mut outputs = Vec::with_capacity(output_count.value() as usize);
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader
            .read_u32_le()
            .map_err(|e| BuilderError::SerializationError(format!("reading lock time: {}", e)))?;

        let state = if !inputs.is_empty() && inputs.iter().all(|i| i.unlocking_script.is_some()) {
            TxState::Signed
        } else {
            TxState::Finalized
        };

        Ok(Transaction {
            version,
            lock_time,
            inputs,
            outputs,
            state,
        })
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}
