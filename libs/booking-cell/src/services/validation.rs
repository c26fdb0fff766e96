use chrono::{NaiveDate, NaiveTime};

use crate::models::{BookingError, BookingRequest, CreateBookingData, PatientType, UpdateBookingData};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn parse_slot_date(value: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| BookingError::InvalidDate(value.to_string()))
}

pub fn parse_slot_time(value: &str) -> Result<NaiveTime, BookingError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| BookingError::InvalidTime(value.to_string()))
}

/// Presence checks first, then slot formats. Returns the normalized
/// `(YYYY-MM-DD, HH:mm)` pair so equal slots always compare equal in storage.
pub fn validate_booking_request(request: &BookingRequest) -> Result<(String, String), BookingError> {
    if is_blank(&request.phone_number)
        || request.selected_scans.is_empty()
        || is_blank(&request.selected_date)
        || is_blank(&request.selected_time)
    {
        return Err(BookingError::MissingRequiredFields);
    }

    if request.patient_type == PatientType::New
        && (is_blank(&request.patient_name)
            || is_blank(&request.age)
            || is_blank(&request.email_address)
            || is_blank(&request.gender))
    {
        return Err(BookingError::MissingNewPatientFields);
    }

    let date = parse_slot_date(&request.selected_date)?;
    let time = parse_slot_time(&request.selected_time)?;

    Ok((date.format(DATE_FORMAT).to_string(), time.format(TIME_FORMAT).to_string()))
}

/// Builds the insert payload. Existing patients never carry personal
/// details; blank strings become null.
pub fn to_insert_data(request: &BookingRequest, date: String, time: String) -> CreateBookingData {
    let is_new = request.patient_type == PatientType::New;
    let personal = |value: &str| if is_new { optional(value) } else { None };

    CreateBookingData {
        patient_type: request.patient_type,
        patient_name: personal(&request.patient_name),
        age: personal(&request.age),
        phone_number: request.phone_number.trim().to_string(),
        email_address: personal(&request.email_address),
        gender: personal(&request.gender),
        how_did_you_hear: optional(&request.how_did_you_hear),
        coupon_code: optional(&request.coupon_code),
        referrer: optional(&request.referrer),
        selected_scans: request.selected_scans.clone(),
        selected_date: date,
        selected_time: time,
    }
}

/// Normalizes slot fields of a partial update in place.
pub fn validate_update(updates: &mut UpdateBookingData) -> Result<(), BookingError> {
    if updates.is_empty() {
        return Err(BookingError::ValidationError("No fields to update".to_string()));
    }

    if let Some(date) = updates.selected_date.as_mut() {
        *date = parse_slot_date(date)?.format(DATE_FORMAT).to_string();
    }
    if let Some(time) = updates.selected_time.as_mut() {
        *time = parse_slot_time(time)?.format(TIME_FORMAT).to_string();
    }

    if matches!(&updates.selected_scans, Some(scans) if scans.is_empty()) {
        return Err(BookingError::ValidationError("At least one scan is required".to_string()));
    }
    if matches!(&updates.phone_number, Some(phone) if is_blank(phone)) {
        return Err(BookingError::ValidationError("Phone number cannot be empty".to_string()));
    }

    Ok(())
}
