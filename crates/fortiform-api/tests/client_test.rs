#![allow(clippy::unwrap_used)]
// Integration tests for `FortiClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fortiform_api::{Error, FortiClient, TlsMode, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FortiClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        tls: TlsMode::System,
        ..TransportConfig::default()
    };
    let token = SecretString::from("s3cr3t-token".to_owned());
    let client = FortiClient::new(&server.uri(), &token, &transport).unwrap();
    (server, client)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => panic!("expected object"),
    }
}

fn ok_write(mkey: Value) -> Value {
    json!({
        "http_method": "POST",
        "mkey": mkey,
        "status": "success",
        "http_status": 200,
        "vdom": "root",
        "serial": "FGVM00000000001",
        "version": "v7.2.5",
        "build": 1517
    })
}

// ── Create / read ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_object_sends_token_and_vdom() {
    let (server, client) = setup().await;
    let payload = json!({ "name": "web-01", "subnet": "10.0.0.10/32" });

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .and(query_param("vdom", "root"))
        .and(header("authorization", "Bearer s3cr3t-token"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_write(json!("web-01"))))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .create_object("firewall/address", &object(payload), "root")
        .await
        .unwrap();

    assert!(resp.is_success());
    assert_eq!(resp.mkey_string().as_deref(), Some("web-01"));
}

#[tokio::test]
async fn test_read_object_returns_first_result() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address6/lab-v6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "http_method": "GET",
            "results": [{ "name": "lab-v6", "ip6": "2001:db8::/64", "color": 3 }],
            "status": "success",
            "http_status": 200
        })))
        .mount(&server)
        .await;

    let obj = client
        .read_object("firewall/address6", "lab-v6", "")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(obj["ip6"], json!("2001:db8::/64"));
    assert_eq!(obj["color"], json!(3));
}

#[tokio::test]
async fn test_read_missing_object_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/user/radius/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "http_method": "GET",
            "status": "error",
            "http_status": 404,
            "vdom": "root"
        })))
        .mount(&server)
        .await;

    let obj = client.read_object("user/radius", "gone", "root").await.unwrap();
    assert!(obj.is_none());
}

// ── Update / delete / list ──────────────────────────────────────────

#[tokio::test]
async fn test_update_object_encodes_mkey() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/vpn.ipsec/phase2-interface/to%20hq"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_write(json!("to hq"))))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_object(
            "vpn.ipsec/phase2-interface",
            "to hq",
            &object(json!({ "pfs": "enable" })),
            "",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_object() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/cmdb/router/static/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_write(json!(7))))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.delete_object("router/static", "7", "").await.unwrap();
    assert_eq!(resp.mkey_string().as_deref(), Some("7"));
}

#[tokio::test]
async fn test_list_objects() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "results": [{ "name": "all" }, { "name": "none" }]
        })))
        .mount(&server)
        .await;

    let objs = client.list_objects("firewall/address", "").await.unwrap();
    let names: Vec<_> = objs.iter().map(|o| o["name"].clone()).collect();
    assert_eq!(names, vec![json!("all"), json!("none")]);
}

#[tokio::test]
async fn test_system_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/monitor/system/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "results": { "hostname": "edge", "model_name": "FortiGate", "model_number": "VM64" },
            "serial": "FGVM00000000001",
            "version": "v7.4.1",
            "build": 2463
        })))
        .mount(&server)
        .await;

    let status = client.system_status().await.unwrap();
    assert_eq!(status.version.as_deref(), Some("v7.4.1"));
    assert_eq!(status.model.as_deref(), Some("FortiGate VM64"));
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_duplicate_entry_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "http_method": "POST",
            "status": "error",
            "http_status": 500,
            "error": -5
        })))
        .mount(&server)
        .await;

    let err = client
        .create_object("firewall/address", &object(json!({ "name": "dup" })), "")
        .await
        .unwrap_err();

    match err {
        Error::Api {
            http_status,
            error_code,
            message,
        } => {
            assert_eq!(http_status, 500);
            assert_eq!(error_code, -5);
            assert_eq!(message, "a duplicate entry already exists");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_is_invalid_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_objects("firewall/address", "").await;
    assert!(
        matches!(result, Err(Error::InvalidToken)),
        "expected InvalidToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_garbage_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.list_objects("firewall/address", "").await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("login")),
        "expected Deserialization, got: {result:?}"
    );
}

#[tokio::test]
async fn test_deserialization_preview_respects_char_boundaries() {
    let (server, client) = setup().await;
    let body = format!("{}é and more", "x".repeat(199));

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .mount(&server)
        .await;

    let result = client.list_objects("firewall/address", "").await;
    let Err(Error::Deserialization { message, body: raw }) = result else {
        panic!("expected Deserialization, got: {result:?}");
    };
    assert_eq!(raw, body);
    assert!(message.contains(&format!("{}é", "x".repeat(199))), "{message}");
    assert!(!message.contains("and more"), "{message}");
}

// ── Retries ─────────────────────────────────────────────────────────

async fn setup_with_timeout(timeout: Duration, retries: u32) -> (MockServer, FortiClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        timeout,
        retries,
        ..TransportConfig::default()
    };
    let token = SecretString::from("s3cr3t-token".to_owned());
    let client = FortiClient::new(&server.uri(), &token, &transport).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_timeout_is_retried_once_then_reported() {
    let (server, client) = setup_with_timeout(Duration::from_millis(200), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/monitor/system/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(2)
        .mount(&server)
        .await;

    let result = client.system_status().await;
    let Err(err @ Error::Timeout { .. }) = result else {
        panic!("expected Timeout, got: {result:?}");
    };
    assert_eq!(err.to_string(), "Request timed out after 200ms");
}

#[tokio::test]
async fn test_retry_recovers_from_slow_first_attempt() {
    let (server, client) = setup_with_timeout(Duration::from_millis(200), 1).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/router/static/3"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/router/static/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "http_status": 200,
            "results": [{ "seq-num": 3, "device": "port1" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let obj = client.read_object("router/static", "3", "").await.unwrap().unwrap();
    assert_eq!(obj.get("device"), Some(&json!("port1")));
}

#[tokio::test]
async fn test_no_retry_when_budget_is_zero() {
    let (server, client) = setup_with_timeout(Duration::from_millis(200), 0).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/monitor/system/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.system_status().await;
    assert!(matches!(result, Err(Error::Timeout { .. })), "got: {result:?}");
}
