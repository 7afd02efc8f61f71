//! Raw transaction assembly: deterministic UTXO selection, fee arithmetic,
//! and change synthesis.
//!
//! The builder binds the funding address, the signing identity, and the
//! remote data source, and assembles `Finalized` (unsigned) transactions
//! from them. All arithmetic is integer satoshis; selection is a pure
//! function of the available set, the target, and the policy.

use log::debug;

use dfi_script::{Address, Script};

use crate::account::Account;
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::remotedata::{RemoteData, Utxo};
use crate::transaction::Transaction;
use crate::BuilderError;

/// Satoshis per coin.
pub const COIN: u64 = 100_000_000;

/// How spendable outputs are chosen to satisfy a target amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Spend the largest outputs first until the target is covered.
    LargestFirst,
    /// Spend every available output (send-all / consolidation).
    All,
}

/// Select spendable outputs to satisfy a target amount.
///
/// The selection is a pure function of `(available, target, policy)`: the
/// candidate set is first brought into a canonical order (value descending,
/// then txid, then vout) so the result never depends on the ordering of a
/// backend response. `LargestFirst` always selects at least one output, so
/// even a zero target consumes a coin.
///
/// # Arguments
/// * `available` - The spendable outputs to choose from.
/// * `target` - The satoshi amount the selection must cover.
/// * `policy` - The selection mode.
///
/// # Returns
/// The selected outputs, or `InsufficientFunds` when the whole set cannot
/// cover the target.
pub fn select_utxos(
    available: &[Utxo],
    target: u64,
    policy: SelectionPolicy,
) -> Result<Vec<Utxo>, BuilderError> {
    let mut pool: Vec<Utxo> = available.to_vec();
    pool.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| a.txid.cmp(&b.txid))
            .then_with(|| a.vout.cmp(&b.vout))
    });

    let total: u64 = pool.iter().map(|u| u.value).sum();
    if total < target {
        return Err(BuilderError::InsufficientFunds {
            required: target,
            available: total,
        });
    }

    match policy {
        SelectionPolicy::All => Ok(pool),
        SelectionPolicy::LargestFirst => {
            let mut selected = Vec::new();
            let mut covered = 0u64;
            for utxo in pool {
                if covered >= target && !selected.is_empty() {
                    break;
                }
                covered += utxo.value;
                selected.push(utxo);
            }
            Ok(selected)
        }
    }
}

/// Estimate the serialized size of a transaction before signing.
///
/// Overhead plus the standard per-input (outpoint, script, sequence) and
/// per-output (value, script) estimates.
pub fn estimated_size(n_inputs: usize, n_outputs: usize) -> usize {
    10 + 148 * n_inputs + 34 * n_outputs
}

/// Convert a fee rate in DFI per kilobyte into a satoshi fee for a
/// transaction of the given size, rounding up.
///
/// The rate is first brought to whole satoshis per kilobyte, then the fee
/// is computed in integer arithmetic, so no floating-point dust can push
/// the ceiling past the exact value.
pub fn fee_for_size(rate_dfi_per_kb: f64, size: usize) -> u64 {
    if rate_dfi_per_kb <= 0.0 {
        return 0;
    }
    let sat_per_kb = (rate_dfi_per_kb * COIN as f64).round() as u64;
    sat_per_kb
        .saturating_mul(size as u64)
        .saturating_add(999)
        / 1000
}

/// Stateful assembler binding a funding address, a signing identity, and a
/// remote data source.
pub struct RawTransactionBuilder {
    address: Address,
    account: Account,
    remote: Box<dyn RemoteData>,
}

impl RawTransactionBuilder {
    /// Create a builder over the given context.
    pub fn new(address: Address, account: Account, remote: Box<dyn RemoteData>) -> Self {
        RawTransactionBuilder {
            address,
            account,
            remote,
        }
    }

    /// The funding address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The bound signing identity.
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// The bound remote data source.
    pub fn remote(&self) -> &dyn RemoteData {
        self.remote.as_ref()
    }

    // -----------------------------------------------------------------
    // Finalization
    // -----------------------------------------------------------------

    /// Seal a transaction without a change output.
    ///
    /// The accumulated inputs must cover the outputs plus `fee`; any
    /// surplus beyond that is left to the miners.
    pub fn finalize(&self, tx: &mut Transaction, fee: u64) -> Result<(), BuilderError> {
        self.check_funds(tx, fee)?;
        tx.finalize()
    }

    /// Seal a transaction, synthesizing a change output for the surplus.
    ///
    /// The change amount is exactly `inputs - outputs - fee`, paid to
    /// `change_to` when supplied and to the funding address otherwise.
    /// A change of zero is omitted rather than emitted as a dust output.
    pub fn finalize_with_change(
        &self,
        tx: &mut Transaction,
        fee: u64,
        change_to: Option<&Address>,
    ) -> Result<(), BuilderError> {
        let surplus = self.check_funds(tx, fee)?;
        if surplus > 0 {
            let owner = change_to.unwrap_or(&self.address);
            tx.add_output(TransactionOutput::new(surplus, owner.lock_script()))?;
        }
        tx.finalize()
    }

    /// Verify inputs cover outputs plus fee; return the surplus.
    fn check_funds(&self, tx: &Transaction, fee: u64) -> Result<u64, BuilderError> {
        let input_total = tx.input_value();
        let output_total = tx.output_value();
        let required = output_total
            .checked_add(fee)
            .ok_or_else(|| BuilderError::InvalidAmount("fee overflows".to_string()))?;
        if input_total < required {
            return Err(BuilderError::InsufficientFunds {
                required,
                available: input_total,
            });
        }
        Ok(input_total - required)
    }

    // -----------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------

    /// Assemble a plain coin transfer: `amount` to `to`, change back to the
    /// funding address (or `change_to`).
    pub fn build_transfer(
        &self,
        amount: u64,
        to: &Address,
        change_to: Option<&Address>,
    ) -> Result<Transaction, BuilderError> {
        if amount == 0 {
            return Err(BuilderError::InvalidAmount(
                "transfer amount must be positive".to_string(),
            ));
        }

        let rate = self.remote.estimate_fee()?;
        let utxos = self.remote.list_unspent(&self.address.address_string)?;
        // Destination plus change.
        let (selected, fee) = self.select_covering(&utxos, amount, 2, rate)?;

        let mut tx = Transaction::new();
        for utxo in &selected {
            tx.add_input(TransactionInput::from_utxo(utxo)?)?;
        }
        tx.add_output(TransactionOutput::new(amount, to.lock_script()))?;
        self.finalize_with_change(&mut tx, fee, change_to)?;
        Ok(tx)
    }

    /// Assemble a send-everything transfer: all spendable outputs are
    /// consumed and a single output carries the total minus the fee.
    pub fn build_send_all(&self, to: &Address) -> Result<Transaction, BuilderError> {
        let rate = self.remote.estimate_fee()?;
        let utxos = self.remote.list_unspent(&self.address.address_string)?;
        let selected = select_utxos(&utxos, 0, SelectionPolicy::All)?;
        if selected.is_empty() {
            return Err(BuilderError::InsufficientFunds {
                required: 1,
                available: 0,
            });
        }

        let total: u64 = selected.iter().map(|u| u.value).sum();
        let fee = fee_for_size(rate, estimated_size(selected.len(), 1));
        if total <= fee {
            return Err(BuilderError::InsufficientFunds {
                required: fee + 1,
                available: total,
            });
        }
        debug!(
            "send-all: {} inputs, {} sat total, {} sat fee",
            selected.len(),
            total,
            fee
        );

        let mut tx = Transaction::new();
        for utxo in &selected {
            tx.add_input(TransactionInput::from_utxo(utxo)?)?;
        }
        tx.add_output(TransactionOutput::new(total - fee, to.lock_script()))?;
        self.finalize(&mut tx, fee)?;
        Ok(tx)
    }

    /// Assemble a transaction whose first output is a zero-value data
    /// carrier; inputs only cover the fee and the rest returns as change.
    pub fn build_data_carrier(
        &self,
        data_script: Script,
        change_to: Option<&Address>,
    ) -> Result<Transaction, BuilderError> {
        let rate = self.remote.estimate_fee()?;
        let utxos = self.remote.list_unspent(&self.address.address_string)?;
        // Data output plus change.
        let (selected, fee) = self.select_covering(&utxos, 0, 2, rate)?;

        let mut tx = Transaction::new();
        for utxo in &selected {
            tx.add_input(TransactionInput::from_utxo(utxo)?)?;
        }
        tx.add_output(TransactionOutput::new(0, data_script))?;
        self.finalize_with_change(&mut tx, fee, change_to)?;
        Ok(tx)
    }

    /// Grow a largest-first selection until it covers `amount` plus the fee
    /// implied by its own size.
    ///
    /// The fee depends on the input count and vice versa, so the selection
    /// is re-run with the raised target until it stabilizes; the loop is
    /// bounded because every iteration strictly grows the selection.
    fn select_covering(
        &self,
        utxos: &[Utxo],
        amount: u64,
        n_outputs: usize,
        rate: f64,
    ) -> Result<(Vec<Utxo>, u64), BuilderError> {
        let mut selected = select_utxos(utxos, amount, SelectionPolicy::LargestFirst)?;
        loop {
            let total: u64 = selected.iter().map(|u| u.value).sum();
            let fee = fee_for_size(rate, estimated_size(selected.len(), n_outputs));
            let required = amount.saturating_add(fee);
            if total >= required {
                debug!(
                    "selected {} of {} inputs covering {} sat (fee {} sat)",
                    selected.len(),
                    utxos.len(),
                    required,
                    fee
                );
                return Ok((selected, fee));
            }
            let grown = select_utxos(utxos, required, SelectionPolicy::LargestFirst)?;
            if grown.len() == selected.len() {
                return Err(BuilderError::InsufficientFunds {
                    required,
                    available: total,
                });
            }
            selected = grown;
        }
    }
}
