/// DeFiChain script type - a sequence of opcodes and data pushes.
///
/// Scripts are used in transaction outputs (locking) and inputs (unlocking)
/// to define spending conditions. The Script wraps a `Vec<u8>` and provides
/// methods for construction from hex fragments, the standard templates the
/// SDK emits, classification, and serialization.

use std::fmt;

use crate::address::Address;
use crate::opcodes::*;
use crate::ScriptError;

/// A DeFiChain script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Compose a script from an ordered sequence of hex-encoded fragments.
    ///
    /// Each fragment whose decoded length exceeds one byte is prefixed with a
    /// single length byte; one-byte fragments (opcodes) and empty fragments
    /// are appended as-is. Fragments longer than 255 bytes cannot be
    /// expressed in this form and fail with [`ScriptError::PushTooLarge`];
    /// use [`Script::append_push_data`] for payloads that need the extended
    /// push opcodes.
    ///
    /// The composition is deterministic: the same fragment sequence always
    /// yields the same bytes.
    ///
    /// # Arguments
    /// * `parts` - Ordered hex fragments (opcodes or push payloads).
    ///
    /// # Returns
    /// The composed `Script`, or an error on invalid hex or oversized pushes.
    pub fn build(parts: &[&str]) -> Result<Self, ScriptError> {
        let mut bytes = Vec::new();
        for part in parts {
            let data = hex::decode(part).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
            if data.len() > 255 {
                return Err(ScriptError::PushTooLarge(data.len()));
            }
            if data.len() > 1 {
                bytes.push(data.len() as u8);
            }
            bytes.extend_from_slice(&data);
        }
        Ok(Script(bytes))
    }

    /// Build an embedded-data output script: `OP_RETURN <len> <payload>`.
    ///
    /// The payload is carried verbatim after a one-byte length, so it is
    /// limited to 255 bytes; longer messages fail with
    /// [`ScriptError::PushTooLarge`].
    ///
    /// # Arguments
    /// * `msg` - The raw payload bytes (UTF-8 for text messages).
    ///
    /// # Returns
    /// The data script, or an error if the payload is too long.
    pub fn data_output(msg: &[u8]) -> Result<Self, ScriptError> {
        if msg.len() > 255 {
            return Err(ScriptError::PushTooLarge(msg.len()));
        }
        let mut bytes = Vec::with_capacity(2 + msg.len());
        bytes.push(OP_RETURN);
        bytes.push(msg.len() as u8);
        bytes.extend_from_slice(msg);
        Ok(Script(bytes))
    }

    /// Build the canonical script code for spending a witness-pubkey-hash
    /// output, as used in signature hashing.
    ///
    /// The template is fixed: `19 76 a9 14 <20-byte program> 88 ac` - a
    /// length-prefixed `OP_DUP OP_HASH160 <program> OP_EQUALVERIFY
    /// OP_CHECKSIG` script.
    ///
    /// # Arguments
    /// * `address` - The decoded address carrying the witness program.
    ///
    /// # Returns
    /// The 26-byte script code.
    pub fn p2wpkh_script_code(address: &Address) -> Self {
        let mut bytes = Vec::with_capacity(26);
        bytes.push(0x19);
        bytes.push(OP_DUP);
        bytes.push(OP_HASH160);
        bytes.push(OP_DATA_20);
        bytes.extend_from_slice(&address.hash);
        bytes.push(OP_EQUALVERIFY);
        bytes.push(OP_CHECKSIG);
        Script(bytes)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // -----------------------------------------------------------------------
    // Script classification
    // -----------------------------------------------------------------------

    /// Check if this is a Pay-to-Public-Key-Hash (P2PKH) locking script.
    ///
    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == OP_DATA_20
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// Check if this is a Pay-to-Script-Hash (P2SH) locking script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Check if this is a version-0 witness-pubkey-hash locking script.
    ///
    /// Pattern: OP_0 <20 bytes>
    pub fn is_p2wpkh(&self) -> bool {
        let b = &self.0;
        b.len() == 22 && b[0] == OP_0 && b[1] == OP_DATA_20
    }

    /// Check if this is a data output script (OP_RETURN or OP_FALSE OP_RETURN).
    pub fn is_data(&self) -> bool {
        let b = &self.0;
        (!b.is_empty() && b[0] == OP_RETURN)
            || (b.len() > 1 && b[0] == OP_FALSE && b[1] == OP_RETURN)
    }

    // -----------------------------------------------------------------------
    // Mutation / building
    // -----------------------------------------------------------------------

    /// Append data bytes to the script with the proper push prefix.
    ///
    /// Chooses the minimal encoding: direct push for 1-75 bytes,
    /// OP_PUSHDATA1 for 76-255, OP_PUSHDATA2 for 256-65535, OP_PUSHDATA4
    /// above that. Oversized data is an explicit error, never truncated.
    ///
    /// # Arguments
    /// * `data` - The data bytes to push.
    ///
    /// # Returns
    /// `Ok(())` on success, or an error if the data is too large.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append a single opcode byte to the script.
    pub fn append_opcode(&mut self, op: u8) {
        self.0.push(op);
    }
}

/// Compute the push prefix bytes for a data payload of the given length.
///
/// Returns the prefix that should be prepended to the data when encoding
/// a push operation into raw script bytes.
///
/// # Arguments
/// * `data_len` - The length of the data to be pushed.
///
/// # Returns
/// A byte vector containing the appropriate prefix, or an error if the data
/// is too large for the push encoding.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= 75 {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFFFFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
