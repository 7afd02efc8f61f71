//! Intent-level builder facade.
//!
//! A `TxBuilder` binds one funding address, one signing identity, and one
//! remote data source for its whole lifetime - the binding happens at
//! construction and nothing can be swapped afterwards. Intents are grouped
//! by domain: `utxo()` for plain coin movements and `pool()` for liquidity
//! operations. Every intent returns a finalized, unsigned transaction;
//! `send` broadcasts a transaction only once an external signer has marked
//! it signed.
//!
//! Facades do not coordinate with each other: two facades building
//! concurrently over the same address can select the same spendable output,
//! and one of the two transactions will be rejected as a conflicting spend.
//! Callers who need concurrency must partition funds across addresses.

use log::debug;

use dfi_script::{Address, Script};

use crate::account::Account;
use crate::builder::RawTransactionBuilder;
use crate::dftx::{CustomTx, TokenAmount};
use crate::remotedata::RemoteData;
use crate::transaction::{Transaction, TxState};
use crate::TxBuilderError;

/// Facade binding an address, an account, and a data source.
pub struct TxBuilder {
    builder: RawTransactionBuilder,
}

impl TxBuilder {
    /// Bind the three collaborators for the lifetime of this facade.
    ///
    /// # Arguments
    /// * `address` - The funding address all intents draw from.
    /// * `account` - The signing identity the external signer will use.
    /// * `remote` - The chain-state backend.
    ///
    /// # Returns
    /// The facade, or `Misconfigured` when the account and address do not
    /// belong to the same network.
    pub fn new(
        address: Address,
        account: Account,
        remote: Box<dyn RemoteData>,
    ) -> Result<Self, TxBuilderError> {
        if account.network() != address.network {
            return Err(TxBuilderError::Misconfigured(format!(
                "account is on {} but the address belongs to {}",
                account.network().name(),
                address.network.name()
            )));
        }
        Ok(TxBuilder {
            builder: RawTransactionBuilder::new(address, account, remote),
        })
    }

    /// The bound funding address.
    pub fn address(&self) -> &Address {
        self.builder.address()
    }

    /// The bound signing identity.
    pub fn account(&self) -> &Account {
        self.builder.account()
    }

    /// Plain coin movement intents.
    pub fn utxo(&self) -> UtxoOps<'_> {
        UtxoOps {
            builder: &self.builder,
        }
    }

    /// Liquidity pool intents.
    pub fn pool(&self) -> PoolOps<'_> {
        PoolOps {
            builder: &self.builder,
        }
    }

    /// Broadcast a signed transaction through the bound data source.
    ///
    /// # Arguments
    /// * `tx` - The transaction to broadcast; transitions to `Broadcast`
    ///   on success.
    /// * `max_fee_rate` - Optional broadcast-time rejection threshold,
    ///   forwarded to the backend.
    ///
    /// # Returns
    /// The broadcast txid, `NotSigned` when the transaction has not been
    /// signed, or the backend's rejection verbatim.
    pub fn send(
        &self,
        tx: &mut Transaction,
        max_fee_rate: Option<f64>,
    ) -> Result<String, TxBuilderError> {
        if tx.state() != TxState::Signed {
            return Err(TxBuilderError::NotSigned);
        }
        let raw = tx.serialize_hex().map_err(TxBuilderError::Builder)?;
        let txid = self.builder.remote().send_tx(&raw, max_fee_rate)?;
        tx.mark_broadcast().map_err(TxBuilderError::Builder)?;
        debug!("broadcast accepted: {}", txid);
        Ok(txid)
    }
}

/// Plain coin movement intents over the bound context.
pub struct UtxoOps<'a> {
    builder: &'a RawTransactionBuilder,
}

impl UtxoOps<'_> {
    /// Send `amount` satoshis to `to`; change returns to the funding
    /// address unless `change_to` overrides it.
    pub fn send(
        &self,
        amount: u64,
        to: &Address,
        change_to: Option<&Address>,
    ) -> Result<Transaction, TxBuilderError> {
        Ok(self.builder.build_transfer(amount, to, change_to)?)
    }

    /// Send everything the funding address owns to `to`.
    pub fn send_all(&self, to: &Address) -> Result<Transaction, TxBuilderError> {
        Ok(self.builder.build_send_all(to)?)
    }

    /// Consolidate: sweep every spendable output back into a single output
    /// on the funding address.
    pub fn consolidate(&self) -> Result<Transaction, TxBuilderError> {
        Ok(self.builder.build_send_all(self.builder.address())?)
    }

    /// Attach a raw data payload in a zero-value OP_RETURN output.
    ///
    /// The payload is limited to 255 bytes by the data-script form.
    pub fn add_data(&self, message: &[u8]) -> Result<Transaction, TxBuilderError> {
        let script = Script::data_output(message)
            .map_err(crate::BuilderError::Script)
            .map_err(TxBuilderError::Builder)?;
        Ok(self.builder.build_data_carrier(script, None)?)
    }
}

/// Liquidity pool intents over the bound context.
pub struct PoolOps<'a> {
    builder: &'a RawTransactionBuilder,
}

impl PoolOps<'_> {
    /// Swap `from_amount` of `from_token` into `to_token`, refusing any
    /// price above `max_price` (integer and fractional part).
    pub fn swap(
        &self,
        from_token: u64,
        from_amount: i64,
        to_token: u64,
        max_price: (i64, i64),
    ) -> Result<Transaction, TxBuilderError> {
        let own = self.builder.address().lock_script();
        let custom = CustomTx::PoolSwap {
            from: own.clone(),
            from_token,
            from_amount,
            to: own,
            to_token,
            max_price_integer: max_price.0,
            max_price_fraction: max_price.1,
        };
        self.carry(custom)
    }

    /// Provide both sides of a pool pair; shares accrue to the funding
    /// address.
    pub fn add_liquidity(
        &self,
        amount_a: TokenAmount,
        amount_b: TokenAmount,
    ) -> Result<Transaction, TxBuilderError> {
        let own = self.builder.address().lock_script();
        let custom = CustomTx::AddPoolLiquidity {
            from: own.clone(),
            amount_a,
            amount_b,
            share: own,
        };
        self.carry(custom)
    }

    /// Burn pool shares and withdraw the underlying pair.
    pub fn remove_liquidity(&self, amount: TokenAmount) -> Result<Transaction, TxBuilderError> {
        let custom = CustomTx::RemovePoolLiquidity {
            from: self.builder.address().lock_script(),
            amount,
        };
        self.carry(custom)
    }

    fn carry(&self, custom: CustomTx) -> Result<Transaction, TxBuilderError> {
        let script = custom.to_script()?;
        Ok(self.builder.build_data_carrier(script, None)?)
    }
}
