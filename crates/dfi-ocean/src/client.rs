//! Ocean HTTP client for chain state and transaction broadcasting.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use serde_json::json;

use dfi_script::Script;
use dfi_transaction::{BroadcastError, RemoteData, RemoteDataError, Utxo};

use crate::error::OceanError;
use crate::types::{dfi_to_satoshis, OceanConfig, OceanEnvelope, OceanErrorBody, OceanPage, OceanUnspent};

/// Page size requested when listing unspent outputs.
const UNSPENT_PAGE_SIZE: u32 = 200;

/// HTTP client for the Ocean REST API.
#[derive(Debug, Clone)]
pub struct OceanClient {
    /// Client configuration.
    config: OceanConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl OceanClient {
    /// Create a new Ocean client with the given configuration.
    pub fn new(config: OceanConfig) -> Result<Self, OceanError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self { config, client })
    }

    /// Fetch the spendable outputs currently owned by `address`.
    ///
    /// Follows the pagination cursor until the backend reports no further
    /// page, so large wallets are listed completely.
    pub async fn unspent(&self, address: &str) -> Result<Vec<Utxo>, OceanError> {
        let base = format!(
            "{}/address/{}/transactions/unspent",
            self.config.attached_url(),
            address
        );

        let mut utxos = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(&base)
                .query(&[("size", UNSPENT_PAGE_SIZE.to_string())]);
            if let Some(cursor) = &next {
                request = request.query(&[("next", cursor.as_str())]);
            }
            debug!("GET {}", base);
            let resp = request.send().await?;
            if !resp.status().is_success() {
                return Err(Self::read_error(resp).await);
            }

            let page: OceanPage<OceanUnspent> = resp.json().await?;
            for item in page.data {
                utxos.push(Self::to_utxo(item)?);
            }

            next = page.page.and_then(|p| p.next);
            if next.is_none() {
                break;
            }
        }
        Ok(utxos)
    }

    /// Fetch the current fee estimate in DFI per kilobyte.
    pub async fn fee_estimate(&self) -> Result<f64, OceanError> {
        let url = format!("{}/fee/estimate", self.config.attached_url());
        debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .query(&[("confirmationTarget", "10")])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(Self::read_error(resp).await);
        }
        let envelope: OceanEnvelope<f64> = resp.json().await?;
        Ok(envelope.data)
    }

    /// Broadcast a raw transaction.
    ///
    /// # Arguments
    /// * `raw_tx_hex` - The hex-encoded wire bytes.
    /// * `max_fee_rate` - Optional rejection threshold forwarded to the
    ///   backend.
    ///
    /// # Returns
    /// The broadcast txid, or the API's rejection.
    pub async fn send_raw(
        &self,
        raw_tx_hex: &str,
        max_fee_rate: Option<f64>,
    ) -> Result<String, OceanError> {
        let url = format!("{}/rawtx/send", self.config.attached_url());
        let mut body = json!({ "hex": raw_tx_hex });
        if let Some(rate) = max_fee_rate {
            body["maxFeeRate"] = json!(rate);
        }

        debug!("POST {}", url);
        let resp = self.client.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            let err = Self::read_error(resp).await;
            warn!("broadcast rejected: {}", err);
            return Err(err);
        }
        let envelope: OceanEnvelope<String> = resp.json().await?;
        Ok(envelope.data)
    }

    /// Convert an API unspent item into the builder's UTXO type.
    fn to_utxo(item: OceanUnspent) -> Result<Utxo, OceanError> {
        let script = Script::from_hex(&item.script.hex)
            .map_err(|e| OceanError::Response(format!("unspent script: {}", e)))?;
        Ok(Utxo {
            txid: item.vout.txid,
            vout: item.vout.n,
            value: dfi_to_satoshis(&item.vout.value)?,
            script,
        })
    }

    /// Turn a non-success response into an `OceanError::Api`, preserving
    /// the backend's message verbatim when one is present.
    async fn read_error(resp: reqwest::Response) -> OceanError {
        let status = resp.status();
        match resp.json::<OceanErrorBody>().await {
            Ok(body) => OceanError::Api {
                code: body.error.code.unwrap_or(status.as_u16() as i64),
                message: body
                    .error
                    .message
                    .unwrap_or_else(|| status.to_string()),
            },
            Err(_) => OceanError::Api {
                code: status.as_u16() as i64,
                message: status.to_string(),
            },
        }
    }
}

/// Drive a future to completion from synchronous code.
///
/// Reuses the current tokio runtime when called from within one, and
/// otherwise constructs a throwaway runtime.
fn block_on<T>(future: impl Future<Output = T>) -> Result<T, String> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Ok(tokio::task::block_in_place(|| handle.block_on(future))),
        Err(_) => {
            let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
            Ok(runtime.block_on(future))
        }
    }
}

impl RemoteData for OceanClient {
    fn list_unspent(&self, address: &str) -> Result<Vec<Utxo>, RemoteDataError> {
        block_on(self.unspent(address))
            .map_err(RemoteDataError::Transport)?
            .map_err(|e| match e {
                OceanError::Http(e) => RemoteDataError::Transport(e.to_string()),
                other => RemoteDataError::Response(other.to_string()),
            })
    }

    fn estimate_fee(&self) -> Result<f64, RemoteDataError> {
        block_on(self.fee_estimate())
            .map_err(RemoteDataError::Transport)?
            .map_err(|e| match e {
                OceanError::Http(e) => RemoteDataError::Transport(e.to_string()),
                other => RemoteDataError::Response(other.to_string()),
            })
    }

    fn send_tx(
        &self,
        raw_tx_hex: &str,
        max_fee_rate: Option<f64>,
    ) -> Result<String, BroadcastError> {
        block_on(self.send_raw(raw_tx_hex, max_fee_rate))
            .map_err(BroadcastError::Transport)?
            .map_err(|e| match e {
                // The API's rejection reason travels verbatim.
                OceanError::Api { message, .. } => BroadcastError::Rejected(message),
                other => BroadcastError::Transport(other.to_string()),
            })
    }
}
