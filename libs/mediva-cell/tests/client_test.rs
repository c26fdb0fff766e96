use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param, body_partial_json};

use mediva_cell::{
    BookingReason, ConsultationType, CreateBookingRequest, Doctor, MedivaApiClient,
    MedivaError, MedivaGender,
};
use shared_utils::test_utils::TestConfig;

fn booking_request() -> CreateBookingRequest {
    CreateBookingRequest {
        patient_id: None,
        reason: BookingReason::Other,
        notes: Some("Walk-in from web form".to_string()),
        name: "Asha Rao".to_string(),
        phone: "9900500950".to_string(),
        age: 34,
        gender: MedivaGender::Female,
        doctor: Doctor::Docube,
        consultation_type: ConsultationType::Ultrasound,
        original_start_time: None,
        token_number: None,
        original_position: None,
    }
}

#[tokio::test]
async fn test_get_all_services_transforms_pairs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patient/get-all-services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            ["NT SCAN", "2500"],
            ["Chest PA View", "450.00"],
            ["Consultation", "on request"]
        ])))
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_mediva_url(&mock_server.uri()).to_app_config();
    let client = MedivaApiClient::new(&config);
    let response = client.get_all_services().await.unwrap();

    assert!(response.success);
    assert_eq!(response.services.len(), 3);
    assert_eq!(response.services[0].scan_name, "NT SCAN");
    assert_eq!(response.services[0].scan_price, 2500.0);
    assert_eq!(response.services[1].scan_price, 450.0);
    assert_eq!(response.services[2].scan_price, 0.0);
}

#[tokio::test]
async fn test_create_booking_sends_wire_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/patient/createBooking"))
        .and(body_partial_json(json!({
            "reason": "OTHER",
            "gender": "FEMALE",
            "doctor": "DOCUBE",
            "consultationType": "ULTRASOUND",
            "phone": "9900500950"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "patient": { "name": "Asha Rao", "tokenNumber": 7 },
            "movedAt": "2025-01-10T09:00:00Z",
            "message": "Booking created"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = MedivaApiClient::with_base_url(&mock_server.uri());
    let response = client.create_booking(&booking_request()).await.unwrap();

    assert!(response.success);
    assert_eq!(response.patient.token_number, Some(7));
    assert_eq!(response.message, "Booking created");
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/patient/createBooking"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "message": "Phone number already has an active token"
        })))
        .mount(&mock_server)
        .await;

    let client = MedivaApiClient::with_base_url(&mock_server.uri());
    let err = client.create_booking(&booking_request()).await.unwrap_err();

    assert_matches!(err, MedivaError::Api(ref msg) if msg == "Phone number already has an active token");
}

#[tokio::test]
async fn test_error_without_body_falls_back_to_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patient/getTokenStatus/p-42"))
        .and(query_param("terminalId", "3"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = MedivaApiClient::with_base_url(&mock_server.uri());
    let err = client.get_patient_token_status("p-42", 3).await.unwrap_err();

    assert_matches!(err, MedivaError::Http { status: 503, .. });
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn test_token_status_parses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/patient/getTokenStatus/p-42"))
        .and(query_param("terminalId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "position": "3",
            "currentTime": "10:15",
            "tokenNumber": "12"
        })))
        .mount(&mock_server)
        .await;

    let client = MedivaApiClient::with_base_url(&mock_server.uri());
    let status = client.get_patient_token_status("p-42", 1).await.unwrap();

    assert_eq!(status.position, "3");
    assert_eq!(status.token_number, "12");
}
