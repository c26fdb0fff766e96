use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ==============================================================================
// BOOKING
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingReason {
    PatientNotReady,
    Rescheduled,
    TechnicalIssue,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedivaGender {
    Male,
    Female,
    Other,
}

impl MedivaGender {
    /// Maps the lower-case form values (`male`, `female`, `other`).
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(MedivaGender::Male),
            "female" => Some(MedivaGender::Female),
            "other" => Some(MedivaGender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Doctor {
    Docube,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsultationType {
    Echo,
    Ultrasound,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub reason: BookingReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub name: String,
    pub phone: String,
    pub age: u32,
    pub gender: MedivaGender,
    pub doctor: Doctor,
    pub consultation_type: ConsultationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_position: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotCheckedInPatientEntry {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<MedivaGender>,
    pub doctor: Option<Doctor>,
    pub consultation_type: Option<ConsultationType>,
    pub original_start_time: Option<String>,
    pub moved_to_not_checked_in_at: Option<String>,
    pub reason: Option<BookingReason>,
    pub notes: Option<String>,
    pub token_number: Option<u32>,
    pub original_position: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub success: bool,
    pub patient: NotCheckedInPatientEntry,
    pub moved_at: String,
    pub message: String,
    pub original_position: Option<u32>,
}

// ==============================================================================
// TOKEN STATUS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientTokenStatusResponse {
    pub position: String,
    pub current_time: String,
    pub token_number: String,
}

// ==============================================================================
// SERVICES / PRICING
// ==============================================================================

/// Raw `/patient/get-all-services` payload: `[[name, price], ...]`.
pub type RawServiceResponse = Vec<(String, String)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub scan_name: String,
    pub scan_price: f64,
}

impl Service {
    /// Unparseable prices become zero.
    pub fn from_raw((scan_name, scan_price): (String, String)) -> Self {
        let scan_price = scan_price.trim().parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
            .unwrap_or(0.0);
        Self { scan_name, scan_price }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAllServicesResponse {
    pub success: bool,
    pub services: Vec<Service>,
    pub message: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub error: Option<String>,
    pub details: Option<HashMap<String, Value>>,
}

#[derive(Debug, thiserror::Error)]
pub enum MedivaError {
    #[error("{0}")]
    Api(String),

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("Network error occurred: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
