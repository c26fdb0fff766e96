use std::sync::Arc;
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};

use booking_cell::services::store::{BookingStore, SupabaseBookingStore};
use booking_cell::{BookingError, BookingRequest, BookingService, PatientType, SlotAvailabilityService};
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

fn new_patient_request() -> BookingRequest {
    BookingRequest {
        patient_type: PatientType::New,
        patient_name: "Asha Rao".to_string(),
        age: "34".to_string(),
        phone_number: "9900500950".to_string(),
        email_address: "asha@example.com".to_string(),
        gender: "female".to_string(),
        how_did_you_hear: "google".to_string(),
        selected_scans: vec!["NT SCAN".to_string()],
        selected_date: "2025-01-10".to_string(),
        selected_time: "10:00".to_string(),
        ..Default::default()
    }
}

fn supabase_store(mock_server: &MockServer) -> Arc<dyn BookingStore> {
    let config = TestConfig::with_supabase_url(&mock_server.uri()).to_app_config();
    Arc::new(SupabaseBookingStore::new(&config))
}

#[tokio::test]
async fn test_insert_asks_for_representation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .and(header("Prefer", "return=representation"))
        .and(header("apikey", "test-anon-key"))
        .and(body_partial_json(json!([{
            "patient_type": "new",
            "phone_number": "9900500950",
            "selected_date": "2025-01-10",
            "selected_time": "10:00",
            "coupon_code": null
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::booking_row("9900500950", "2025-01-10", "10:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = BookingService::new(supabase_store(&mock_server));
    let booking = service.create_booking(&new_patient_request()).await.unwrap();

    assert_eq!(booking.selected_time, "10:00");
    assert_eq!(booking.patient_type, PatientType::New);
}

#[tokio::test]
async fn test_unique_violation_becomes_slot_taken() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(409)
            .set_body_json(MockSupabaseResponses::duplicate_key_error()))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(supabase_store(&mock_server));
    let response = service.submit(&new_patient_request()).await;

    assert!(!response.success);
    assert_eq!(response.message, "This time slot has already been booked. Please select a different time.");
}

#[tokio::test]
async fn test_other_failures_keep_raw_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            MockSupabaseResponses::error_response("null value in column \"phone_number\"", "23502")))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(supabase_store(&mock_server));
    let result = service.create_booking(&new_patient_request()).await;

    assert_matches!(result, Err(BookingError::DatabaseError(msg)) if msg.contains("null value in column"));
}

#[tokio::test]
async fn test_booked_slots_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("select", "selected_time"))
        .and(query_param("selected_date", "eq.2025-01-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "selected_time": "11:30" },
            { "selected_time": "10:00" }
        ])))
        .mount(&mock_server)
        .await;

    let slots = SlotAvailabilityService::new(supabase_store(&mock_server));

    assert_eq!(
        slots.booked_slots_for_date("2025-01-10").await.unwrap(),
        vec!["10:00".to_string(), "11:30".to_string()]
    );
}

#[tokio::test]
async fn test_slot_check_failure_is_returned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let slots = SlotAvailabilityService::new(supabase_store(&mock_server));

    assert_matches!(slots.booked_slots_for_date("2025-01-10").await, Err(BookingError::DatabaseError(_)));
    assert_matches!(slots.is_slot_available("2025-01-10", "10:00").await, Err(BookingError::DatabaseError(_)));
}

#[tokio::test]
async fn test_single_slot_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("select", "id"))
        .and(query_param("selected_time", "eq.10:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "5b0a8f4e-6d0c-4f7e-9d6a-3a1f2b7c9e10" }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("select", "id"))
        .and(query_param("selected_time", "eq.10:15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let slots = SlotAvailabilityService::new(supabase_store(&mock_server));

    assert!(!slots.is_slot_available("2025-01-10", "10:00").await.unwrap());
    assert!(slots.is_slot_available("2025-01-10", "10:15").await.unwrap());
}

#[tokio::test]
async fn test_phone_lookup_forwards_admin_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bookings"))
        .and(query_param("phone_number", "eq.9900500950"))
        .and(query_param("order", "created_at.desc"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::booking_row("9900500950", "2025-01-11", "09:00"),
            MockSupabaseResponses::booking_row("9900500950", "2025-01-10", "10:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = BookingService::new(supabase_store(&mock_server));
    let bookings = service.get_bookings_by_phone("9900500950", Some("admin-token")).await.unwrap();

    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].selected_date, "2025-01-11");
}

#[tokio::test]
async fn test_delete_missing_booking_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = BookingService::new(supabase_store(&mock_server));

    assert_matches!(
        service.delete_booking(uuid::Uuid::new_v4(), Some("admin-token")).await,
        Err(BookingError::NotFound)
    );
}
