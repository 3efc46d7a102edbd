#![allow(clippy::unwrap_used)]
// Integration tests for `DirectoryClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use creditdesk_api::{DirectoryClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DirectoryClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DirectoryClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn acme() -> serde_json::Value {
    json!({
        "id": "1",
        "name": "Acme Corp",
        "plan": "Enterprise",
        "monthlyCredits": 500,
        "perUserLimit": 50,
        "usedCredits": 120,
        "users": 10
    })
}

// ── List tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_customers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            acme(),
            {
                "id": "2",
                "name": "Globex",
                "plan": "Basic",
                "monthlyCredits": 100,
                "perUserLimit": null,
                "usedCredits": 20,
                "users": 5
            }
        ])))
        .mount(&server)
        .await;

    let customers = client.list_customers().await.unwrap();

    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0].id, "1");
    assert_eq!(customers[0].name, "Acme Corp");
    assert_eq!(customers[0].plan, "Enterprise");
    assert_eq!(customers[0].per_user_limit, Some(50));
    assert_eq!(customers[1].per_user_limit, None);
    assert_eq!(customers[1].used_credits, 20);
}

#[tokio::test]
async fn test_list_customers_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let result = client.list_customers().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 503);
            assert!(message.contains("upstream down"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_customers_bad_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_customers().await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Mutation tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_set_plan_sends_plan_name() {
    let (server, client) = setup().await;

    let mut updated = acme();
    updated["plan"] = json!("Ultimate");
    updated["monthlyCredits"] = json!(1000);

    Mock::given(method("PUT"))
        .and(path("/api/customers/1/plan"))
        .and(body_json(json!({ "plan": "Ultimate" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&updated))
        .mount(&server)
        .await;

    let record = client.set_plan("1", "Ultimate").await.unwrap();

    assert_eq!(record.plan, "Ultimate");
    assert_eq!(record.monthly_credits, 1000);
}

#[tokio::test]
async fn test_set_per_user_limit_clears_with_null() {
    let (server, client) = setup().await;

    let mut updated = acme();
    updated["perUserLimit"] = json!(null);

    Mock::given(method("PUT"))
        .and(path("/api/customers/1/limit"))
        .and(body_json(json!({ "limit": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&updated))
        .mount(&server)
        .await;

    let record = client.set_per_user_limit("1", None).await.unwrap();

    assert_eq!(record.per_user_limit, None);
}

#[tokio::test]
async fn test_top_up() {
    let (server, client) = setup().await;

    let mut updated = acme();
    updated["monthlyCredits"] = json!(515);

    Mock::given(method("POST"))
        .and(path("/api/customers/1/topup"))
        .and(body_json(json!({ "amount": 15 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&updated))
        .mount(&server)
        .await;

    let record = client.top_up("1", 15).await.unwrap();

    assert_eq!(record.monthly_credits, 515);
}

#[tokio::test]
async fn test_mutation_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/customers/nope/topup"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such customer"))
        .mount(&server)
        .await;

    let err = client.top_up("nope", 5).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}
