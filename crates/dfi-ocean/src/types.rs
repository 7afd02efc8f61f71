//! Ocean data types: configuration, response envelopes, and amount
//! conversion.

use serde::{Deserialize, Serialize};

use dfi_script::Network;

use crate::OceanError;

/// Configuration for an [`OceanClient`](crate::OceanClient).
#[derive(Debug, Clone)]
pub struct OceanConfig {
    /// Base URL of the Ocean deployment.
    pub base_url: String,
    /// API version path segment.
    pub version: String,
    /// Network path segment (also selects address validation).
    pub network: Network,
    /// Optional request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ocean.defichain.com".to_string(),
            version: "v0".to_string(),
            network: Network::Mainnet,
            timeout_secs: None,
        }
    }
}

impl OceanConfig {
    /// The fully attached URL prefix: `{base}/{version}/{network}`.
    pub fn attached_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            self.network.name()
        )
    }
}

/// Envelope for single-value responses: `{ "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanEnvelope<T> {
    /// The payload.
    pub data: T,
}

/// Envelope for paged list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanPage<T> {
    /// The page items.
    pub data: Vec<T>,
    /// Pagination cursor, absent on the last page.
    #[serde(default)]
    pub page: Option<OceanPageInfo>,
}

/// Pagination cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanPageInfo {
    /// Token for fetching the next page.
    #[serde(default)]
    pub next: Option<String>,
}

/// Error body: `{ "error": { "code": ..., "message": ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct OceanErrorBody {
    /// The error payload.
    pub error: OceanErrorInfo,
}

/// The error payload inside an [`OceanErrorBody`].
#[derive(Debug, Clone, Deserialize)]
pub struct OceanErrorInfo {
    /// Numeric error code.
    #[serde(default)]
    pub code: Option<i64>,
    /// Error category.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// An unspent output as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanUnspent {
    /// Opaque item id.
    #[serde(default)]
    pub id: Option<String>,
    /// The outpoint and value.
    pub vout: OceanUnspentVout,
    /// The owning locking script.
    pub script: OceanScript,
}

/// The outpoint part of an unspent item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanUnspentVout {
    /// Originating txid, display order.
    pub txid: String,
    /// Output index.
    pub n: u32,
    /// Value as a decimal DFI string (e.g. `"1.50000000"`).
    pub value: String,
    /// Token id of the output, when not the utility token.
    #[serde(rename = "tokenId", default)]
    pub token_id: Option<u32>,
}

/// The script part of an unspent item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanScript {
    /// Hex-encoded locking script.
    pub hex: String,
    /// Script classification reported by the API.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Convert a decimal DFI string into satoshis exactly.
///
/// The conversion is pure string arithmetic - no floating point - so
/// `"1.50000000"` is exactly 150_000_000 and more than 8 fractional
/// digits (or a negative amount) is an error.
pub fn dfi_to_satoshis(value: &str) -> Result<u64, OceanError> {
    let bad = || OceanError::InvalidAmount(value.to_string());

    let (int_part, frac_part) = value.split_once('.').unwrap_or((value, ""));
    if int_part.starts_with('-') || int_part.is_empty() && frac_part.is_empty() {
        return Err(bad());
    }
    if frac_part.len() > 8 || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }

    let whole: u64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| bad())?
    };

    let mut frac_padded = frac_part.to_string();
    while frac_padded.len() < 8 {
        frac_padded.push('0');
    }
    let frac: u64 = frac_padded.parse().map_err(|_| bad())?;

    whole
        .checked_mul(100_000_000)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(bad)
}
