#![allow(clippy::unwrap_used)]
// End-to-end resource operations against a mocked FortiOS REST API.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Map, Value, json};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fortiform_api::{FortiClient, TransportConfig};
use fortiform_core::provider::PlanAction;
use fortiform_core::resources::{FIREWALL_ADDRESS, ROUTER_STATIC, USER_RADIUS};
use fortiform_core::{ChangeKind, CoreError, Provider, ResourceData, SENSITIVE_MASK, SortMode};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Provider) {
    let server = MockServer::start().await;
    let token = SecretString::from("test-token".to_owned());
    let client = FortiClient::new(&server.uri(), &token, &TransportConfig::default()).unwrap();
    (server, Provider::from_client(client, "root"))
}

fn attrs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => panic!("expected object"),
    }
}

fn write_ok(mkey: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "http_method": "POST",
        "mkey": mkey,
        "status": "success",
        "http_status": 200,
        "vdom": "root"
    }))
}

fn read_ok(object: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "http_method": "GET",
        "results": [object],
        "status": "success",
        "http_status": 200,
        "vdom": "root"
    }))
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "http_method": "GET",
        "status": "error",
        "http_status": 404,
        "error": -3
    }))
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_refreshes_state_from_appliance() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .and(query_param("vdom", "dmz"))
        .and(body_json(json!({ "name": "web", "subnet": "10.0.0.0/24", "color": 3 })))
        .respond_with(write_ok(json!("web")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .and(query_param("vdom", "dmz"))
        .respond_with(read_ok(json!({
            "name": "web",
            "q_origin_key": "web",
            "uuid": "8a1e5f3c-0000-0000-0000-000000000001",
            "type": "ipmask",
            "subnet": "10.0.0.0 255.255.255.0",
            "color": 3,
            "comment": "",
            "tagging": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attrs(json!({
        "name": "web",
        "subnet": "10.0.0.0/24",
        "color": 3,
        "vdomparam": "dmz"
    })));
    provider.create(&FIREWALL_ADDRESS, &mut data).await.unwrap();

    assert_eq!(data.id.as_deref(), Some("web"));
    assert_eq!(
        Value::Object(data.attributes),
        json!({
            "name": "web",
            "uuid": "8a1e5f3c-0000-0000-0000-000000000001",
            "type": "ipmask",
            "subnet": "10.0.0.0/24",
            "color": 3,
            "vdomparam": "dmz"
        })
    );
}

#[tokio::test]
async fn test_create_takes_id_from_response_mkey() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/router/static"))
        .respond_with(write_ok(json!(7)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/router/static/7"))
        .respond_with(read_ok(json!({
            "seq-num": 7,
            "status": "enable",
            "dst": "0.0.0.0 0.0.0.0",
            "gateway": "192.0.2.1",
            "device": "port1",
            "distance": 10
        })))
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attrs(json!({
        "dst": "0.0.0.0/0",
        "gateway": "192.0.2.1",
        "device": "port1"
    })));
    provider.create(&ROUTER_STATIC, &mut data).await.unwrap();

    assert_eq!(data.id.as_deref(), Some("7"));
    assert_eq!(data.get("seq_num"), Some(&json!(7)));
    assert_eq!(data.get("dst"), Some(&json!("0.0.0.0/0")));
    assert_eq!(data.get("distance"), Some(&json!(10)));
}

#[tokio::test]
async fn test_create_error_names_verb_and_resource() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "http_method": "POST",
            "status": "error",
            "http_status": 500,
            "error": -5,
            "cli_error": "entry already exists"
        })))
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attrs(json!({ "name": "web" })));
    let err = provider.create(&FIREWALL_ADDRESS, &mut data).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error creating FirewallAddress resource: FortiOS API error (HTTP 500, code -5): entry already exists"
    );
    assert!(data.id.is_none());
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_api() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .respond_with(write_ok(json!("x")))
        .expect(0)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attrs(json!({ "name": "web", "color": 99, "colour": 1 })));
    let err = provider.create(&FIREWALL_ADDRESS, &mut data).await.unwrap_err();

    let CoreError::Validation { errors, .. } = err else {
        panic!("expected validation error, got {err}");
    };
    assert_eq!(errors.len(), 2);
}

// ── Read / update / delete ──────────────────────────────────────────

#[tokio::test]
async fn test_read_missing_object_clears_id() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/gone"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attrs(json!({ "name": "gone" }))).with_id("gone");
    provider.read(&FIREWALL_ADDRESS, &mut data).await.unwrap();
    assert!(data.id.is_none());
}

#[tokio::test]
async fn test_update_sends_null_for_cleared_fields() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .and(query_param("vdom", "root"))
        .and(body_json(json!({
            "name": "web",
            "subnet": "10.0.0.0/24",
            "comment": null,
            "tagging": []
        })))
        .respond_with(write_ok(json!("web")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .respond_with(read_ok(json!({ "name": "web", "subnet": "10.0.0.0 255.255.255.0" })))
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attrs(json!({ "name": "web", "subnet": "10.0.0.0/24" })))
        .with_id("web")
        .with_prior(attrs(json!({
            "name": "web",
            "subnet": "10.0.0.0/24",
            "comment": "old",
            "tagging": [{ "name": "t" }]
        })));
    provider.update(&FIREWALL_ADDRESS, &mut data).await.unwrap();

    assert_eq!(
        Value::Object(data.attributes.clone()),
        json!({ "name": "web", "subnet": "10.0.0.0/24" })
    );
    assert!(data.prior().is_none());
}

#[tokio::test]
async fn test_update_follows_renamed_mkey() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/user/radius/old-name"))
        .respond_with(write_ok(json!("new-name")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/user/radius/new-name"))
        .respond_with(read_ok(json!({ "name": "new-name", "server": "10.1.1.10", "secret": "ENC abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attrs(json!({
        "name": "new-name",
        "server": "10.1.1.10",
        "secret": "hunter2"
    })))
    .with_id("old-name");
    provider.update(&USER_RADIUS, &mut data).await.unwrap();

    assert_eq!(data.id.as_deref(), Some("new-name"));
    assert_eq!(data.get("secret"), Some(&json!("hunter2")));
}

#[tokio::test]
async fn test_delete_tolerates_missing_object() {
    let (server, provider) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .respond_with(not_found())
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::default().with_id("web");
    provider.delete(&FIREWALL_ADDRESS, &mut data).await.unwrap();
    assert!(data.id.is_none());
}

#[tokio::test]
async fn test_delete_failure_is_wrapped() {
    let (server, provider) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/cmdb/firewall/address/in-use"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "http_status": 500,
            "error": -23,
            "cli_error": "entry is used"
        })))
        .mount(&server)
        .await;

    let mut data = ResourceData::default().with_id("in-use");
    let err = provider.delete(&FIREWALL_ADDRESS, &mut data).await.unwrap_err();
    assert!(err.to_string().starts_with("Error deleting FirewallAddress resource:"));
    assert_eq!(data.id.as_deref(), Some("in-use"));
}

#[tokio::test]
async fn test_missing_id_is_reported() {
    let (_server, provider) = setup().await;
    let mut data = ResourceData::default();
    let err = provider.read(&FIREWALL_ADDRESS, &mut data).await.unwrap_err();
    assert!(matches!(err, CoreError::MissingId { resource: "FirewallAddress" }));
}

// ── Import / list ───────────────────────────────────────────────────

fn radius_object() -> Value {
    json!({
        "name": "corp",
        "server": "10.1.1.10",
        "secret": "ENC xyz",
        "timeout": 5,
        "class": [{ "name": "port10" }, { "name": "port9" }],
        "accounting-server": [{ "id": 1, "server": "10.1.1.11", "secret": "ENC" }]
    })
}

#[tokio::test]
async fn test_import_skips_subtables_by_default() {
    let (server, provider) = setup().await;
    let provider = provider.with_import_table(Some(false));

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/user/radius/corp"))
        .respond_with(read_ok(radius_object()))
        .mount(&server)
        .await;

    let data = provider.import(&USER_RADIUS, "corp", None, false).await.unwrap();
    assert_eq!(data.id.as_deref(), Some("corp"));
    assert_eq!(
        Value::Object(data.attributes),
        json!({ "name": "corp", "server": "10.1.1.10", "timeout": 5 })
    );
}

#[tokio::test]
async fn test_import_with_all_tables_and_natural_sort() {
    let (server, provider) = setup().await;
    let provider = provider.with_import_table(Some(false)).with_sort(SortMode::Natural);

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/user/radius/corp"))
        .and(query_param("vdom", "branch"))
        .respond_with(read_ok(radius_object()))
        .mount(&server)
        .await;

    let data = provider
        .import(&USER_RADIUS, "corp", Some("branch"), true)
        .await
        .unwrap();
    assert_eq!(data.get("class"), Some(&json!([{ "name": "port9" }, { "name": "port10" }])));
    assert_eq!(
        data.get("accounting_server"),
        Some(&json!([{ "fosid": 1, "server": "10.1.1.11" }]))
    );
    assert_eq!(data.vdomparam(), Some("branch"));
}

#[tokio::test]
async fn test_import_table_setting_populates_subtables() {
    let (server, provider) = setup().await;
    let provider = provider.with_import_table(Some(true));

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/user/radius/corp"))
        .respond_with(read_ok(radius_object()))
        .mount(&server)
        .await;

    let data = provider.import(&USER_RADIUS, "corp", None, false).await.unwrap();
    assert!(data.get("class").is_some());
}

#[tokio::test]
async fn test_import_missing_object_is_not_found() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/nope"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let err = provider.import(&FIREWALL_ADDRESS, "nope", None, false).await.unwrap_err();
    assert_eq!(err.to_string(), "FirewallAddress 'nope' not found");
}

#[tokio::test]
async fn test_list_assigns_ids() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/router/static"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "http_method": "GET",
            "results": [
                { "seq-num": 1, "dst": "10.0.0.0 255.0.0.0", "device": "port1" },
                { "seq-num": 2, "dst": "0.0.0.0 0.0.0.0", "device": "wan1" }
            ],
            "status": "success",
            "http_status": 200
        })))
        .mount(&server)
        .await;

    let items = provider.list(&ROUTER_STATIC, None, false).await.unwrap();
    let ids: Vec<_> = items.iter().map(|d| d.id.clone().unwrap()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(items[0].get("dst"), Some(&json!("10.0.0.0 255.0.0.0")));
}

// ── Plan / apply ────────────────────────────────────────────────────

#[tokio::test]
async fn test_plan_without_live_object_creates() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let desired = ResourceData::new(attrs(json!({ "name": "web", "subnet": "10.0.0.0/24" })));
    let plan = provider.plan(&FIREWALL_ADDRESS, &desired).await.unwrap();
    assert_eq!(plan.action, PlanAction::Create);
    assert_eq!(plan.changes.len(), 2);
    assert!(plan.changes.iter().all(|c| c.kind == ChangeKind::Added));
}

#[tokio::test]
async fn test_plan_ignores_appliance_defaults() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .respond_with(read_ok(json!({
            "name": "web",
            "uuid": "8a1e5f3c-0000-0000-0000-000000000001",
            "type": "ipmask",
            "subnet": "10.0.0.0 255.255.255.0",
            "color": 0,
            "comment": "old"
        })))
        .mount(&server)
        .await;

    let desired = ResourceData::new(attrs(json!({ "name": "web", "subnet": "10.0.0.0/24" })));
    let plan = provider.plan(&FIREWALL_ADDRESS, &desired).await.unwrap();
    assert_eq!(plan.action, PlanAction::Update);
    let paths: Vec<_> = plan.changes.iter().map(|c| (c.path.as_str(), c.kind)).collect();
    assert_eq!(paths, vec![("comment", ChangeKind::Removed)]);
}

#[tokio::test]
async fn test_apply_unchanged_makes_no_write() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .respond_with(read_ok(json!({
            "name": "web",
            "subnet": "10.0.0.0 255.255.255.0",
            "color": 0
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(write_ok(json!("web")))
        .expect(0)
        .mount(&server)
        .await;

    let desired = ResourceData::new(attrs(json!({ "name": "web", "subnet": "10.0.0.0/24" })));
    let (plan, data) = provider.apply(&FIREWALL_ADDRESS, desired).await.unwrap();
    assert_eq!(plan.action, PlanAction::NoOp);
    assert_eq!(data.id.as_deref(), Some("web"));
}

#[tokio::test]
async fn test_apply_updates_with_live_state_as_prior() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .respond_with(read_ok(json!({
            "name": "web",
            "subnet": "10.0.0.0 255.255.255.0",
            "color": 0,
            "comment": "old"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .and(body_json(json!({
            "name": "web",
            "subnet": "10.0.0.0/24",
            "comment": null
        })))
        .respond_with(write_ok(json!("web")))
        .expect(1)
        .mount(&server)
        .await;

    let desired = ResourceData::new(attrs(json!({ "name": "web", "subnet": "10.0.0.0/24" })));
    let (plan, _) = provider.apply(&FIREWALL_ADDRESS, desired).await.unwrap();
    assert_eq!(plan.action, PlanAction::Update);
}

#[tokio::test]
async fn test_apply_pushes_rotated_secret() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/user/radius/corp"))
        .respond_with(read_ok(json!({
            "name": "corp",
            "server": "10.1.1.10",
            "secret": "ENC abcdef"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/user/radius/corp"))
        .and(body_json(json!({
            "name": "corp",
            "server": "10.1.1.10",
            "secret": "new-rotated-secret"
        })))
        .respond_with(write_ok(json!("corp")))
        .expect(1)
        .mount(&server)
        .await;

    let desired = ResourceData::new(attrs(json!({
        "name": "corp",
        "server": "10.1.1.10",
        "secret": "new-rotated-secret"
    })));
    let (plan, data) = provider.apply(&USER_RADIUS, desired).await.unwrap();

    assert_eq!(plan.action, PlanAction::Update);
    assert_eq!(plan.changes.len(), 1);
    assert_eq!(plan.changes[0].path, "secret");
    assert_eq!(plan.changes[0].kind, ChangeKind::Changed);
    assert_eq!(plan.changes[0].before, Some(json!(SENSITIVE_MASK)));
    assert_eq!(plan.changes[0].after, Some(json!(SENSITIVE_MASK)));
    assert_eq!(data.get("secret"), Some(&json!("new-rotated-secret")));
}

#[tokio::test]
async fn test_plan_masks_secrets_on_create() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/user/radius/corp"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let desired = ResourceData::new(attrs(json!({
        "name": "corp",
        "secret": "hunter2",
        "accounting_server": [{ "fosid": 1, "server": "10.1.1.11", "secret": "acct-key" }]
    })));
    let plan = provider.plan(&USER_RADIUS, &desired).await.unwrap();

    assert_eq!(plan.action, PlanAction::Create);
    let rendered = serde_json::to_string(&plan).unwrap();
    assert!(!rendered.contains("hunter2"), "{rendered}");
    assert!(!rendered.contains("acct-key"), "{rendered}");
    assert!(rendered.contains(SENSITIVE_MASK));
}

#[tokio::test]
async fn test_apply_creates_route_without_seq_num() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/cmdb/router/static"))
        .and(body_json(json!({ "dst": "10.9.0.0/16", "gateway": "192.0.2.1", "device": "port1" })))
        .respond_with(write_ok(json!(12)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/router/static/12"))
        .respond_with(read_ok(json!({
            "seq-num": 12,
            "dst": "10.9.0.0 255.255.0.0",
            "gateway": "192.0.2.1",
            "device": "port1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let desired = ResourceData::new(attrs(json!({
        "dst": "10.9.0.0/16",
        "gateway": "192.0.2.1",
        "device": "port1"
    })));
    let plan = provider.plan(&ROUTER_STATIC, &desired).await.unwrap();
    assert_eq!(plan.action, PlanAction::Create);
    assert!(plan.mkey.is_none());
    assert_eq!(plan.target(), "(new)");

    let (_, data) = provider.apply(&ROUTER_STATIC, desired).await.unwrap();
    assert_eq!(data.id.as_deref(), Some("12"));
    assert_eq!(data.get("dst"), Some(&json!("10.9.0.0/16")));
}

// ── Reset ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reset_unsets_every_writable_field() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .and(query_param("vdom", "root"))
        .and(body_partial_json(json!({
            "comment": null,
            "start-ip": null,
            "tagging": []
        })))
        .respond_with(write_ok(json!("web")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address/web"))
        .respond_with(read_ok(json!({
            "name": "web",
            "uuid": "8a1e5f3c-0000-0000-0000-000000000001",
            "type": "ipmask",
            "subnet": "0.0.0.0 0.0.0.0",
            "comment": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData::new(attrs(json!({
        "name": "web",
        "subnet": "10.0.0.0/24",
        "comment": "old"
    })))
    .with_id("web");
    provider.reset(&FIREWALL_ADDRESS, &mut data).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let put = requests.iter().find(|r| r.method.as_str() == "PUT").unwrap();
    let body: Map<String, Value> = serde_json::from_slice(&put.body).unwrap();
    assert!(body.get("name").is_none(), "mkey must not be reset");
    assert!(body.get("uuid").is_none(), "computed fields are never sent");

    assert_eq!(data.id.as_deref(), Some("web"));
    assert_eq!(data.get("subnet"), Some(&json!("0.0.0.0 0.0.0.0")));
    assert!(data.get("comment").is_none());
}
