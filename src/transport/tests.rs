//! Tests for the transport module

use super::*;
use crate::error::Error;
use crate::types::{Method, StringMap};
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiClientConfig::new("test-token").with_base_url(server.uri()))
}

#[tokio::test]
async fn test_request_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fleet/vehicles"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let envelope = client.get("/fleet/vehicles", &StringMap::new()).await.unwrap();
    assert!(envelope.payload.is_empty());
}

#[tokio::test]
async fn test_request_strips_empty_body_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tags"))
        .and(body_string(""))
        .and(query_param_is_missing("limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "t1"}})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let body = json!({});
    let envelope = client
        .request(Method::POST, "/tags", Some(&body), &StringMap::new())
        .await
        .unwrap();

    assert_eq!(envelope.payload.as_single().unwrap()["id"], "t1");
}

#[tokio::test]
async fn test_request_sends_body_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fleet/drivers"))
        .and(body_json(json!({"name": "Alex"})))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "d1"}})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let body = json!({"name": "Alex"});
    let mut query = StringMap::new();
    query.insert("limit".into(), "5".into());

    let envelope = client
        .request(Method::POST, "/fleet/drivers", Some(&body), &query)
        .await
        .unwrap();
    assert_eq!(envelope.payload.as_single().unwrap()["id"], "d1");
}

#[tokio::test]
async fn test_request_wraps_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fleet/vehicles/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("vehicle not found"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .get("/fleet/vehicles/missing", &StringMap::new())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let message = err.to_string();
    assert!(message.starts_with("Samsara API request failed:"), "{message}");
    assert!(message.contains("vehicle not found"), "{message}");
}

#[tokio::test]
async fn test_request_wraps_connection_error() {
    // Point at a closed port; no retry should mask the failure.
    let client = ApiClient::new(
        ApiClientConfig::new("test-token").with_base_url("http://127.0.0.1:9"),
    );
    let err = client.get("/fleet/vehicles", &StringMap::new()).await.unwrap_err();

    assert!(matches!(err, Error::ApiRequest { status: None, .. }));
}

#[tokio::test]
async fn test_request_never_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fleet/vehicles"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client.get("/fleet/vehicles", &StringMap::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_empty_response_body_is_absent_payload() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/tags/t1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let envelope = client
        .request(Method::DELETE, "/tags/t1", None, &StringMap::new())
        .await
        .unwrap();
    assert!(envelope.payload.is_absent());
}

#[tokio::test]
async fn test_check_connection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fleet/vehicles"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.check_connection().await.unwrap();
}

#[tokio::test]
async fn test_full_url_passthrough() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/absolute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let client = ApiClient::new(ApiClientConfig::new("t"));
    client
        .get(&format!("{}/absolute", server.uri()), &StringMap::new())
        .await
        .unwrap();
}
