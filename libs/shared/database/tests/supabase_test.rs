use reqwest::Method;
use serde_json::{json, Value};
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, header, query_param};

use shared_database::supabase::SupabaseClient;
use shared_utils::test_utils::TestConfig;

#[tokio::test]
async fn test_anon_key_used_as_bearer_without_user_token() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("selected_date", "eq.2025-01-10"))
        .and(header("apikey", "test-anon-key"))
        .and(header("Authorization", "Bearer test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "selected_time": "10:00" }
        ])))
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config);
    let rows: Vec<Value> = client
        .request(Method::GET, "/rest/v1/bookings?selected_date=eq.2025-01-10", None, None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["selected_time"], "10:00");
}

#[tokio::test]
async fn test_conflict_error_keeps_postgrest_message() {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"bookings_selected_date_selected_time_key\"",
            "details": null,
            "hint": null
        })))
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config);
    let result: anyhow::Result<Vec<Value>> = client
        .request_with_headers(
            Method::POST,
            "/rest/v1/bookings",
            None,
            Some(json!({ "selected_date": "2025-01-10", "selected_time": "10:00" })),
            Some(SupabaseClient::representation_headers()),
        )
        .await;

    let message = result.unwrap_err().to_string();
    assert!(message.contains("duplicate key"));
}
