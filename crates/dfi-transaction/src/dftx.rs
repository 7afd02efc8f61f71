//! DeFi custom-transaction payloads.
//!
//! Pool operations do not move plain coins; they ride as a serialized
//! payload inside a zero-value data output. The payload starts with the
//! `DfTx` marker, followed by a one-byte operation type and the
//! operation-specific body written in wire order.

use dfi_primitives::util::{TxWriter, VarInt};
use dfi_script::Script;

use crate::BuilderError;

/// Marker bytes opening every DeFi custom-transaction payload.
pub const DFTX_MARKER: &[u8; 4] = b"DfTx";

/// An amount of a specific token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAmount {
    /// Numeric token id (0 is the utility token).
    pub token_id: u64,
    /// Amount in the token's smallest unit.
    pub amount: i64,
}

impl TokenAmount {
    /// Create a token amount.
    pub fn new(token_id: u64, amount: i64) -> Self {
        TokenAmount { token_id, amount }
    }

    fn write_to(&self, writer: &mut TxWriter) {
        writer.write_varint(VarInt(self.token_id));
        writer.write_i64_le(self.amount);
    }
}

/// A DeFi custom-transaction operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CustomTx {
    /// Swap one token for another through a liquidity pool.
    PoolSwap {
        /// Script owning the swapped-in funds.
        from: Script,
        /// Token id being sold.
        from_token: u64,
        /// Amount being sold, in the token's smallest unit.
        from_amount: i64,
        /// Script receiving the swapped-out funds.
        to: Script,
        /// Token id being bought.
        to_token: u64,
        /// Integer part of the maximum acceptable price.
        max_price_integer: i64,
        /// Fractional part of the maximum acceptable price.
        max_price_fraction: i64,
    },
    /// Provide liquidity to a pool and receive shares.
    AddPoolLiquidity {
        /// Script funding both sides of the pair.
        from: Script,
        /// First side of the pair.
        amount_a: TokenAmount,
        /// Second side of the pair.
        amount_b: TokenAmount,
        /// Script receiving the pool shares.
        share: Script,
    },
    /// Burn pool shares and withdraw the underlying pair.
    RemovePoolLiquidity {
        /// Script owning the shares and receiving the withdrawal.
        from: Script,
        /// The share amount to burn.
        amount: TokenAmount,
    },
}

impl CustomTx {
    /// The one-byte operation type following the marker.
    pub fn type_byte(&self) -> u8 {
        match self {
            CustomTx::PoolSwap { .. } => b's',
            CustomTx::AddPoolLiquidity { .. } => b'l',
            CustomTx::RemovePoolLiquidity { .. } => b'r',
        }
    }

    /// Serialize the payload: marker, type byte, and operation body.
    pub fn serialize(&self) -> Result<Vec<u8>, BuilderError> {
        let mut writer = TxWriter::new();
        writer.write_bytes(DFTX_MARKER);
        writer.write_u8(self.type_byte());

        match self {
            CustomTx::PoolSwap {
                from,
                from_token,
                from_amount,
                to,
                to_token,
                max_price_integer,
                max_price_fraction,
            } => {
                write_script(&mut writer, from)?;
                writer.write_varint(VarInt(*from_token));
                writer.write_i64_le(*from_amount);
                write_script(&mut writer, to)?;
                writer.write_varint(VarInt(*to_token));
                writer.write_i64_le(*max_price_integer);
                writer.write_i64_le(*max_price_fraction);
            }
            CustomTx::AddPoolLiquidity {
                from,
                amount_a,
                amount_b,
                share,
            } => {
                write_script(&mut writer, from)?;
                writer.write_varint(VarInt(2));
                amount_a.write_to(&mut writer);
                amount_b.write_to(&mut writer);
                write_script(&mut writer, share)?;
            }
            CustomTx::RemovePoolLiquidity { from, amount } => {
                write_script(&mut writer, from)?;
                amount.write_to(&mut writer);
            }
        }

        Ok(writer.into_bytes())
    }

    /// Wrap the serialized payload in a zero-value data output script.
    pub fn to_script(&self) -> Result<Script, BuilderError> {
        Ok(Script::data_output(&self.serialize()?)?)
    }
}

/// Embed a script with a one-byte length prefix.
fn write_script(writer: &mut TxWriter, script: &Script) -> Result<(), BuilderError> {
    if script.len() > 255 {
        return Err(BuilderError::Script(dfi_script::ScriptError::PushTooLarge(
            script.len(),
        )));
    }
    writer.write_u8(script.len() as u8);
    writer.write_bytes(script.to_bytes());
    Ok(())
}
