/// DeFiChain address handling.
///
/// Supports the two address families the chain uses: Base58Check (legacy
/// P2PKH and P2SH) and bech32 (native witness-pubkey-hash). Decoding yields
/// the 20-byte payload (witness program / HASH160) and is strict about
/// checksums, version bytes, and the configured network.

use std::fmt;

use dfi_primitives::hash::sha256d;

use crate::opcodes::*;
use crate::script::Script;
use crate::ScriptError;

/// DeFiChain network type for address version and HRP selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// DeFiChain mainnet (P2PKH '8...', P2SH 'd...', bech32 'df1...').
    Mainnet,
    /// DeFiChain testnet (P2PKH '7...', P2SH 't...', bech32 'tf1...').
    Testnet,
}

impl Network {
    /// The Base58Check version byte for P2PKH addresses.
    pub fn p2pkh_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => 0x12,
            Network::Testnet => 0x0f,
        }
    }

    /// The Base58Check version byte for P2SH addresses.
    pub fn p2sh_prefix(&self) -> u8 {
        match self {
            Network::Mainnet => 0x5a,
            Network::Testnet => 0x80,
        }
    }

    /// The bech32 human-readable part.
    pub fn bech32_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "df",
            Network::Testnet => "tf",
        }
    }

    /// The network name used in error messages and API paths.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    fn other(&self) -> Network {
        match self {
            Network::Mainnet => Network::Testnet,
            Network::Testnet => Network::Mainnet,
        }
    }
}

/// The address family an address string belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressFormat {
    /// Legacy pay-to-public-key-hash (Base58Check).
    P2pkh,
    /// Pay-to-script-hash (Base58Check).
    P2sh,
    /// Native version-0 witness-pubkey-hash (bech32).
    P2wpkh,
}

/// A decoded DeFiChain address.
///
/// Contains the 20-byte payload (the witness program for bech32 addresses,
/// the HASH160 for the legacy families), the network, and the family the
/// string was encoded in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// The human-readable address string.
    pub address_string: String,
    /// The 20-byte witness program / HASH160 payload.
    pub hash: [u8; 20],
    /// The network this address belongs to.
    pub network: Network,
    /// The address family the string is encoded in.
    pub format: AddressFormat,
}

impl Address {
    /// Decode an address string of any supported family.
    ///
    /// Dispatches on the bech32 HRP prefix, otherwise treats the string as
    /// Base58Check. Decoding is total for well-formed addresses: malformed
    /// checksums, unsupported version bytes, wrong-length payloads, and
    /// addresses of the other network all fail with a decoding error -
    /// nothing is ever truncated or padded.
    ///
    /// # Arguments
    /// * `addr` - The address string.
    /// * `network` - The network the address must belong to.
    ///
    /// # Returns
    /// The decoded `Address`, or a `ScriptError` describing the failure.
    pub fn decode(addr: &str, network: Network) -> Result<Self, ScriptError> {
        let lower = addr.to_lowercase();
        if lower.starts_with("df1") || lower.starts_with("tf1") {
            match Self::decode_bech32(addr, network) {
                Ok(decoded) => return Ok(decoded),
                Err(err) => {
                    // A Base58Check string can also begin with an HRP-like
                    // prefix; give the legacy families a chance before
                    // reporting the bech32 failure.
                    if let Ok(decoded) = Self::decode_base58(addr, network) {
                        return Ok(decoded);
                    }
                    return Err(err);
                }
            }
        }
        Self::decode_base58(addr, network)
    }

    /// Decode a Base58Check address (P2PKH or P2SH family).
    ///
    /// The decoded payload must be exactly 25 bytes (version + 20-byte hash
    /// + 4-byte checksum), the SHA-256d checksum must match, and the version
    /// byte must be one of the configured network's two prefixes.
    pub fn decode_base58(addr: &str, network: Network) -> Result<Self, ScriptError> {
        let decoded = bs58::decode(addr)
            .into_vec()
            .map_err(|_| ScriptError::InvalidAddress(format!("bad char in '{}'", addr)))?;

        if decoded.len() != 25 {
            return Err(ScriptError::InvalidAddressLength(addr.to_string()));
        }

        // Last 4 bytes must equal sha256d of the first 21.
        let checksum = sha256d(&decoded[..21]);
        if decoded[21..25] != checksum[..4] {
            return Err(ScriptError::ChecksumFailed);
        }

        let version = decoded[0];
        let format = if version == network.p2pkh_prefix() {
            AddressFormat::P2pkh
        } else if version == network.p2sh_prefix() {
            AddressFormat::P2sh
        } else if version == network.other().p2pkh_prefix()
            || version == network.other().p2sh_prefix()
        {
            return Err(ScriptError::WrongNetwork {
                address: addr.to_string(),
                expected: network.name(),
            });
        } else {
            return Err(ScriptError::UnsupportedAddress(addr.to_string()));
        };

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&decoded[1..21]);

        Ok(Address {
            address_string: addr.to_string(),
            hash,
            network,
            format,
        })
    }

    /// Decode a bech32 witness address.
    ///
    /// The HRP must equal the configured network's, the checksum must
    /// verify, the witness version must be 0, and the program must be
    /// exactly 20 bytes.
    pub fn decode_bech32(addr: &str, network: Network) -> Result<Self, ScriptError> {
        let (hrp, data) = bech32::decode(addr)?;

        if hrp != network.bech32_hrp() {
            if hrp == network.other().bech32_hrp() {
                return Err(ScriptError::WrongNetwork {
                    address: addr.to_string(),
                    expected: network.name(),
                });
            }
            return Err(ScriptError::UnsupportedAddress(addr.to_string()));
        }

        if data.is_empty() {
            return Err(ScriptError::InvalidBech32("empty payload".to_string()));
        }
        let witness_version = data[0];
        if witness_version != 0 {
            return Err(ScriptError::UnsupportedAddress(addr.to_string()));
        }

        let program = bech32::convert_bits(&data[1..], 5, 8, false)?;
        if program.len() != 20 {
            return Err(ScriptError::InvalidAddressLength(addr.to_string()));
        }

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&program);

        Ok(Address {
            address_string: addr.to_string(),
            hash,
            network,
            format: AddressFormat::P2wpkh,
        })
    }

    /// Encode an address from a 20-byte payload.
    ///
    /// # Arguments
    /// * `format` - The target address family.
    /// * `network` - The target network.
    /// * `hash` - The 20-byte witness program / HASH160.
    ///
    /// # Returns
    /// A new `Address` with the encoded string.
    pub fn from_hash(format: AddressFormat, network: Network, hash: &[u8; 20]) -> Self {
        let address_string = match format {
            AddressFormat::P2pkh => encode_base58check(network.p2pkh_prefix(), hash),
            AddressFormat::P2sh => encode_base58check(network.p2sh_prefix(), hash),
            AddressFormat::P2wpkh => bech32::encode(network.bech32_hrp(), 0, hash),
        };
        Address {
            address_string,
            hash: *hash,
            network,
            format,
        }
    }

    /// Return the 20-byte payload as lowercase hex (the witness program).
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Build the locking script paying to this address.
    ///
    /// P2PKH: `OP_DUP OP_HASH160 <hash> OP_EQUALVERIFY OP_CHECKSIG`;
    /// P2SH: `OP_HASH160 <hash> OP_EQUAL`; P2WPKH: `OP_0 <program>`.
    pub fn lock_script(&self) -> Script {
        let mut bytes = Vec::with_capacity(25);
        match self.format {
            AddressFormat::P2pkh => {
                bytes.push(OP_DUP);
                bytes.push(OP_HASH160);
                bytes.push(OP_DATA_20);
                bytes.extend_from_slice(&self.hash);
                bytes.push(OP_EQUALVERIFY);
                bytes.push(OP_CHECKSIG);
            }
            AddressFormat::P2sh => {
                bytes.push(OP_HASH160);
                bytes.push(OP_DATA_20);
                bytes.extend_from_slice(&self.hash);
                bytes.push(OP_EQUAL);
            }
            AddressFormat::P2wpkh => {
                bytes.push(OP_0);
                bytes.push(OP_DATA_20);
                bytes.extend_from_slice(&self.hash);
            }
        }
        Script::from_bytes(&bytes)
    }
}

impl fmt::Display for Address {
    /// Display the address as its encoded string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address_string)
    }
}

/// Base58Check-encode a version byte plus payload with a SHA-256d checksum.
fn encode_base58check(version: u8, payload: &[u8; 20]) -> String {
    let mut data = Vec::with_capacity(25);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = sha256d(&data);
    data.extend_from_slice(&checksum[..4]);
    bs58::encode(&data).into_string()
}

/// BIP-173 bech32 codec.
///
/// The chain's witness addresses predate bech32m, so the classic constant
/// (1) applies. Only what address handling needs is implemented: decode
/// with checksum verification, encode, and 5<->8 bit regrouping.
mod bech32 {
    use crate::ScriptError;

    const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
    const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

    fn polymod(values: &[u8]) -> u32 {
        let mut chk: u32 = 1;
        for &v in values {
            let b = chk >> 25;
            chk = ((chk & 0x1ff_ffff) << 5) ^ v as u32;
            for (i, g) in GENERATOR.iter().enumerate() {
                if (b >> i) & 1 == 1 {
                    chk ^= g;
                }
            }
        }
        chk
    }

    fn hrp_expand(hrp: &str) -> Vec<u8> {
        let mut out: Vec<u8> = hrp.bytes().map(|b| b >> 5).collect();
        out.push(0);
        out.extend(hrp.bytes().map(|b| b & 31));
        out
    }

    /// Decode a bech32 string into its HRP and 5-bit data values
    /// (checksum stripped).
    pub fn decode(addr: &str) -> Result<(String, Vec<u8>), ScriptError> {
        let has_lower = addr.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = addr.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            return Err(ScriptError::InvalidBech32("mixed case".to_string()));
        }
        let addr = addr.to_lowercase();

        let sep = addr
            .rfind('1')
            .ok_or_else(|| ScriptError::InvalidBech32("missing separator".to_string()))?;
        if sep == 0 || sep + 7 > addr.len() {
            return Err(ScriptError::InvalidBech32(
                "separator position invalid".to_string(),
            ));
        }
        let hrp = addr[..sep].to_string();
        let mut data = Vec::with_capacity(addr.len() - sep - 1);
        for c in addr[sep + 1..].bytes() {
            let value = CHARSET
                .iter()
                .position(|&x| x == c)
                .ok_or_else(|| ScriptError::InvalidBech32(format!("bad char '{}'", c as char)))?;
            data.push(value as u8);
        }

        let mut check = hrp_expand(&hrp);
        check.extend_from_slice(&data);
        if polymod(&check) != 1 {
            return Err(ScriptError::InvalidBech32("checksum mismatch".to_string()));
        }

        data.truncate(data.len() - 6);
        Ok((hrp, data))
    }

    /// Encode a witness version and program as a bech32 string.
    pub fn encode(hrp: &str, witness_version: u8, program: &[u8; 20]) -> String {
        let mut data = vec![witness_version];
        // 8->5 regrouping of a 20-byte program cannot fail.
        data.extend(convert_bits(program, 8, 5, true).expect("20-byte program regroups"));

        let mut values = hrp_expand(hrp);
        values.extend_from_slice(&data);
        values.extend_from_slice(&[0; 6]);
        let pm = polymod(&values) ^ 1;

        let mut out = String::with_capacity(hrp.len() + 1 + data.len() + 6);
        out.push_str(hrp);
        out.push('1');
        for d in &data {
            out.push(CHARSET[*d as usize] as char);
        }
        for i in 0..6 {
            out.push(CHARSET[((pm >> (5 * (5 - i))) & 31) as usize] as char);
        }
        out
    }

    /// Regroup bits from `from` -bit values to `to` -bit values.
    ///
    /// With `pad` false (decoding), leftover bits must be zero and fewer
    /// than `from`, per BIP-173 strictness.
    pub fn convert_bits(
        data: &[u8],
        from: u32,
        to: u32,
        pad: bool,
    ) -> Result<Vec<u8>, ScriptError> {
        let mut acc: u32 = 0;
        let mut bits: u32 = 0;
        let mut out = Vec::new();
        let maxv: u32 = (1 << to) - 1;
        for &value in data {
            if (value as u32) >> from != 0 {
                return Err(ScriptError::InvalidBech32("value out of range".to_string()));
            }
            acc = (acc << from) | value as u32;
            bits += from;
            while bits >= to {
                bits -= to;
                out.push(((acc >> bits) & maxv) as u8);
            }
        }
        if pad {
            if bits > 0 {
                out.push(((acc << (to - bits)) & maxv) as u8);
            }
        } else if bits >= from || ((acc << (to - bits)) & maxv) != 0 {
            return Err(ScriptError::InvalidBech32("invalid padding".to_string()));
        }
        Ok(out)
    }
}
