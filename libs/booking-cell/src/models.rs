// libs/booking-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

pub const BOOKING_SUCCESS_MESSAGE: &str =
    "Thank you for booking your appointment! Looking forward to see you.";

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatientType {
    #[default]
    New,
    Existing,
}

impl fmt::Display for PatientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientType::New => write!(f, "new"),
            PatientType::Existing => write!(f, "existing"),
        }
    }
}

/// A row of the `bookings` table. `(selected_date, selected_time)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub patient_type: PatientType,
    pub patient_name: Option<String>,
    pub age: Option<String>,
    pub phone_number: String,
    pub email_address: Option<String>,
    pub gender: Option<String>,
    pub how_did_you_hear: Option<String>,
    pub coupon_code: Option<String>,
    pub referrer: Option<String>,
    pub selected_scans: Vec<String>,
    pub selected_date: String,
    pub selected_time: String,
}

impl Booking {
    pub fn from_insert(data: CreateBookingData, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            patient_type: data.patient_type,
            patient_name: data.patient_name,
            age: data.age,
            phone_number: data.phone_number,
            email_address: data.email_address,
            gender: data.gender,
            how_did_you_hear: data.how_did_you_hear,
            coupon_code: data.coupon_code,
            referrer: data.referrer,
            selected_scans: data.selected_scans,
            selected_date: data.selected_date,
            selected_time: data.selected_time,
        }
    }

    pub fn display_name(&self) -> &str {
        self.patient_name.as_deref().unwrap_or("Existing Patient")
    }

    pub fn occupies(&self, date: &str, time: &str) -> bool {
        self.selected_date == date && self.selected_time == time
    }

    /// Merges the present fields of a partial update.
    pub fn apply(&mut self, updates: &UpdateBookingData) {
        if let Some(patient_type) = updates.patient_type {
            self.patient_type = patient_type;
        }
        if let Some(patient_name) = &updates.patient_name {
            self.patient_name = Some(patient_name.clone());
        }
        if let Some(age) = &updates.age {
            self.age = Some(age.clone());
        }
        if let Some(phone_number) = &updates.phone_number {
            self.phone_number = phone_number.clone();
        }
        if let Some(email_address) = &updates.email_address {
            self.email_address = Some(email_address.clone());
        }
        if let Some(gender) = &updates.gender {
            self.gender = Some(gender.clone());
        }
        if let Some(how_did_you_hear) = &updates.how_did_you_hear {
            self.how_did_you_hear = Some(how_did_you_hear.clone());
        }
        if let Some(coupon_code) = &updates.coupon_code {
            self.coupon_code = Some(coupon_code.clone());
        }
        if let Some(referrer) = &updates.referrer {
            self.referrer = Some(referrer.clone());
        }
        if let Some(selected_scans) = &updates.selected_scans {
            self.selected_scans = selected_scans.clone();
        }
        if let Some(selected_date) = &updates.selected_date {
            self.selected_date = selected_date.clone();
        }
        if let Some(selected_time) = &updates.selected_time {
            self.selected_time = selected_time.clone();
        }
    }
}

/// Insert payload for the `bookings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingData {
    pub patient_type: PatientType,
    pub patient_name: Option<String>,
    pub age: Option<String>,
    pub phone_number: String,
    pub email_address: Option<String>,
    pub gender: Option<String>,
    pub how_did_you_hear: Option<String>,
    pub coupon_code: Option<String>,
    pub referrer: Option<String>,
    pub selected_scans: Vec<String>,
    pub selected_date: String,
    pub selected_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookingData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_type: Option<PatientType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub how_did_you_hear: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_scans: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_time: Option<String>,
}

impl UpdateBookingData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn moves_slot(&self) -> bool {
        self.selected_date.is_some() || self.selected_time.is_some()
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Booking form payload as posted by the web form (camelCase, empty strings for blanks).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    pub patient_type: PatientType,
    #[serde(deserialize_with = "null_as_default")]
    pub patient_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub age: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_default")]
    pub how_did_you_hear: String,
    #[serde(deserialize_with = "null_as_default")]
    pub coupon_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub referrer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_scans: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_time: String,
}

/// Blank optionals arrive as `null` from some clients.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

impl BookingResponse {
    pub fn booked(booking: &Booking) -> Self {
        Self {
            success: true,
            message: BOOKING_SUCCESS_MESSAGE.to_string(),
            booking_id: Some(booking.id.to_string()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            booking_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlotsResponse {
    pub success: bool,
    pub booked_slots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneSearchQuery {
    #[serde(default)]
    pub phone: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookingError {
    #[error("Missing required fields")]
    MissingRequiredFields,

    #[error("Missing required fields for new patient")]
    MissingNewPatientFields,

    #[error("Invalid appointment date: {0}")]
    InvalidDate(String),

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("This time slot has already been booked. Please select a different time.")]
    SlotTaken,

    #[error("Booking not found")]
    NotFound,

    #[error("{0}")]
    DatabaseError(String),
}

impl BookingError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::MissingRequiredFields
                | BookingError::MissingNewPatientFields
                | BookingError::InvalidDate(_)
                | BookingError::InvalidTime(_)
                | BookingError::ValidationError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_accepts_partial_camel_case() {
        let request: BookingRequest = serde_json::from_value(json!({
            "patientType": "existing",
            "phoneNumber": "9900500950",
            "selectedScans": ["NT SCAN"],
            "selectedDate": "2025-01-10",
            "selectedTime": "10:00"
        })).unwrap();

        assert_eq!(request.patient_type, PatientType::Existing);
        assert_eq!(request.patient_name, "");
        assert_eq!(request.selected_scans, vec!["NT SCAN".to_string()]);
    }

    #[test]
    fn test_request_accepts_null_optionals() {
        let request: BookingRequest = serde_json::from_value(json!({
            "patientType": "existing",
            "patientName": null,
            "couponCode": null,
            "phoneNumber": "9900500950",
            "selectedScans": ["NT SCAN"],
            "selectedDate": "2025-01-10",
            "selectedTime": "10:00"
        })).unwrap();

        assert_eq!(request.patient_name, "");
        assert_eq!(request.coupon_code, "");
        assert_eq!(request.phone_number, "9900500950");
    }

    #[test]
    fn test_response_wire_format() {
        let value = serde_json::to_value(BookingResponse::failed("Missing required fields")).unwrap();
        assert_eq!(value, json!({ "success": false, "message": "Missing required fields" }));

        let value = serde_json::to_value(BookedSlotsResponse {
            success: true,
            booked_slots: vec!["10:00".to_string()],
            message: None,
        }).unwrap();
        assert_eq!(value, json!({ "success": true, "bookedSlots": ["10:00"] }));
    }

    #[test]
    fn test_update_apply_and_flags() {
        let mut booking = Booking::from_insert(
            CreateBookingData {
                patient_type: PatientType::Existing,
                patient_name: None,
                age: None,
                phone_number: "9900500950".to_string(),
                email_address: None,
                gender: None,
                how_did_you_hear: None,
                coupon_code: None,
                referrer: None,
                selected_scans: vec!["NT SCAN".to_string()],
                selected_date: "2025-01-10".to_string(),
                selected_time: "10:00".to_string(),
            },
            Uuid::new_v4(),
            Utc::now(),
        );
        assert_eq!(booking.display_name(), "Existing Patient");

        let updates = UpdateBookingData {
            selected_time: Some("10:15".to_string()),
            coupon_code: Some("YANA50".to_string()),
            ..Default::default()
        };
        assert!(updates.moves_slot());
        assert!(!updates.is_empty());

        booking.apply(&updates);
        assert!(booking.occupies("2025-01-10", "10:15"));
        assert_eq!(booking.coupon_code.as_deref(), Some("YANA50"));
        assert!(UpdateBookingData::default().is_empty());
    }
}
