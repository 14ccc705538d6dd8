//! Integration tests for the cached catalog (categories and payment methods).

use opentrade_api::{ApiUrl, ClientId, ClientSecret, OpenTradeClient, OpenTradeConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn create_client(server: &MockServer) -> OpenTradeClient {
    Mock::given(method("POST"))
        .and(path("/oauth/authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .mount(server)
        .await;

    let config = OpenTradeConfig::builder()
        .client_id(ClientId::new("test-client").unwrap())
        .client_secret(ClientSecret::new("test-secret").unwrap())
        .rest_url(ApiUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    OpenTradeClient::new(config).unwrap()
}

#[tokio::test]
async fn test_categories_are_fetched_once() {
    let server = MockServer::start().await;
    let client = create_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 2000,
            "data": [
                {"id": "1", "name": "Books"},
                {"id": 2, "name": "Music", "icon": "note"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let first = client.get_categories().await;
    let second = client.get_categories().await;

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(first[1].id, "2");
    assert_eq!(first[1].extra.get("icon"), Some(&json!("note")));

    let music = client.get_category("2").await.unwrap();
    assert_eq!(music.name.as_deref(), Some("Music"));
    assert!(client.get_category("99").await.is_none());
}

#[tokio::test]
async fn test_categories_failure_yields_empty_list_and_is_retried() {
    let server = MockServer::start().await;
    let client = create_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": 5000,
            "data": {"message": "Internal error", "httpCode": 500, "debug": "db down"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    assert!(client.get_categories().await.is_empty());
    assert!(client.get_categories().await.is_empty());
}

#[tokio::test]
async fn test_payments_use_status_success_and_send_client_id() {
    let server = MockServer::start().await;
    let client = create_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/payments"))
        .and(query_param("client_id", "test-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{"id": "paypal", "name": "PayPal"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payments = client.get_payments().await;
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].id, "paypal");

    // Served from cache.
    assert_eq!(client.get_payments().await, payments);
}

#[tokio::test]
async fn test_payments_failure_status_yields_empty_list() {
    let server = MockServer::start().await;
    let client = create_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "fail",
            "data": {"message": "Unavailable", "httpCode": 503}
        })))
        .mount(&server)
        .await;

    assert!(client.get_payments().await.is_empty());
}

#[tokio::test]
async fn test_clear_forces_catalog_reload() {
    let server = MockServer::start().await;
    let client = create_client(&server).await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 2000,
            "data": [{"id": "1", "name": "Books"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    client.get_categories().await;
    client.cache().clear();
    client.get_categories().await;
}
