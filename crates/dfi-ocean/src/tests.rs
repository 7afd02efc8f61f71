//! Tests for the Ocean client.

use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dfi_script::Network;
use dfi_transaction::{BroadcastError, RemoteData};

use crate::client::OceanClient;
use crate::error::OceanError;
use crate::types::OceanConfig;

const TXID: &str = "7b1eabe0209b1fe794124575ef807057c77ada2138ae4fa8d6c4de0398a14f3f";
const LOCK_HEX: &str = "76a9145ee9a59718e3f64f96087c5529937f5dcd2316e188ac";

fn test_config(base_url: &str) -> OceanConfig {
    OceanConfig {
        base_url: base_url.to_string(),
        version: "v0".to_string(),
        network: Network::Mainnet,
        timeout_secs: Some(5),
    }
}

fn unspent_item(txid: &str, n: u32, value: &str) -> serde_json::Value {
    serde_json::json!({
        "id": format!("{}{}", txid, n),
        "vout": { "txid": txid, "n": n, "value": value, "tokenId": 0 },
        "script": { "hex": LOCK_HEX, "type": "pubkeyhash" }
    })
}

#[tokio::test]
async fn test_unspent_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/mainnet/address/8Pji946q7TC3xahpyde8RexyzALH8XgGgo/transactions/unspent"))
        .and(query_param("size", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [unspent_item(TXID, 1, "1.50000000")]
        })))
        .mount(&server)
        .await;

    let client = OceanClient::new(test_config(&server.uri())).unwrap();
    let utxos = client
        .unspent("8Pji946q7TC3xahpyde8RexyzALH8XgGgo")
        .await
        .unwrap();

    assert_eq!(utxos.len(), 1);
    assert_eq!(utxos[0].txid, TXID);
    assert_eq!(utxos[0].vout, 1);
    assert_eq!(utxos[0].value, 150_000_000);
    assert_eq!(utxos[0].script.to_hex(), LOCK_HEX);
}

#[tokio::test]
async fn test_unspent_follows_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/mainnet/address/addr/transactions/unspent"))
        .and(query_param("next", "cursor-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [unspent_item(TXID, 2, "0.50000000")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v0/mainnet/address/addr/transactions/unspent"))
        .and(query_param_is_missing("next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [unspent_item(TXID, 1, "1.00000000")],
            "page": { "next": "cursor-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OceanClient::new(test_config(&server.uri())).unwrap();
    let utxos = client.unspent("addr").await.unwrap();

    assert_eq!(utxos.len(), 2);
    assert_eq!(utxos[0].value, 100_000_000);
    assert_eq!(utxos[1].value, 50_000_000);
}

#[tokio::test]
async fn test_fee_estimate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/mainnet/fee/estimate"))
        .and(query_param("confirmationTarget", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": 0.00005 })),
        )
        .mount(&server)
        .await;

    let client = OceanClient::new(test_config(&server.uri())).unwrap();
    let rate = client.fee_estimate().await.unwrap();
    assert_eq!(rate, 0.00005);
}

#[tokio::test]
async fn test_send_raw_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/mainnet/rawtx/send"))
        .and(body_partial_json(serde_json::json!({ "hex": "04000000abcd" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": "sent-txid" })),
        )
        .mount(&server)
        .await;

    let client = OceanClient::new(test_config(&server.uri())).unwrap();
    let txid = client.send_raw("04000000abcd", Some(0.5)).await.unwrap();
    assert_eq!(txid, "sent-txid");
}

/// Rejections surface the API's message verbatim.
#[tokio::test]
async fn test_send_raw_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/mainnet/rawtx/send"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "type": "BadRequest",
                "message": "txn-mempool-conflict"
            }
        })))
        .mount(&server)
        .await;

    let client = OceanClient::new(test_config(&server.uri())).unwrap();
    let result = client.send_raw("04000000abcd", None).await;

    match result {
        Err(OceanError::Api { code, message }) => {
            assert_eq!(code, 400);
            assert_eq!(message, "txn-mempool-conflict");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

/// The synchronous remote-data shim maps rejections into the typed
/// broadcast error with the backend's reason untouched.
#[tokio::test(flavor = "multi_thread")]
async fn test_remote_data_shim_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/mainnet/rawtx/send"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 400, "type": "BadRequest", "message": "absurdly-high-fee" }
        })))
        .mount(&server)
        .await;

    let client = OceanClient::new(test_config(&server.uri())).unwrap();
    let result = RemoteData::send_tx(&client, "04000000abcd", None);

    match result {
        Err(BroadcastError::Rejected(reason)) => assert_eq!(reason, "absurdly-high-fee"),
        other => panic!("unexpected result: {:?}", other),
    }
}

/// The sync shim also serves fetches when driven from a runtime.
#[tokio::test(flavor = "multi_thread")]
async fn test_remote_data_shim_fetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/mainnet/fee/estimate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": 0.00001 })),
        )
        .mount(&server)
        .await;

    let client = OceanClient::new(test_config(&server.uri())).unwrap();
    let rate = RemoteData::estimate_fee(&client).unwrap();
    assert_eq!(rate, 0.00001);
}
