// libs/booking-form-cell/src/form.rs
use regex::Regex;
use serde::{Deserialize, Serialize};

use booking_cell::{BookingRequest, PatientType};

pub const PHONE_PATTERN: &str = r"^\d{10}$";
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub const OTP_LENGTH: usize = 6;

pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid 10-digit phone number";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// In-progress booking form. Blank fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub patient_type: PatientType,
    pub patient_name: String,
    pub age: String,
    pub phone_number: String,
    pub email_address: String,
    pub gender: String,
    pub how_did_you_hear: String,
    pub coupon_code: String,
    pub referrer: String,
    pub otp: String,
    pub selected_scans: Vec<String>,
    pub selected_date: String,
    pub selected_time: String,
}

impl FormData {
    pub fn for_patient_type(patient_type: PatientType) -> Self {
        Self {
            patient_type,
            ..Self::default()
        }
    }

    /// Wire payload for the booking endpoint. The OTP never leaves the form.
    pub fn to_request(&self) -> BookingRequest {
        BookingRequest {
            patient_type: self.patient_type,
            patient_name: self.patient_name.clone(),
            age: self.age.clone(),
            phone_number: self.phone_number.clone(),
            email_address: self.email_address.clone(),
            gender: self.gender.clone(),
            how_did_you_hear: self.how_did_you_hear.clone(),
            coupon_code: self.coupon_code.clone(),
            referrer: self.referrer.clone(),
            selected_scans: self.selected_scans.clone(),
            selected_date: self.selected_date.clone(),
            selected_time: self.selected_time.clone(),
        }
    }
}

/// Free-text fields editable on the details step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    PatientName,
    Age,
    PhoneNumber,
    EmailAddress,
    Gender,
    HowDidYouHear,
    CouponCode,
    Referrer,
    Otp,
}

impl FormData {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::PatientName => self.patient_name = value,
            FormField::Age => self.age = value,
            FormField::PhoneNumber => self.phone_number = value,
            FormField::EmailAddress => self.email_address = value,
            FormField::Gender => self.gender = value,
            FormField::HowDidYouHear => self.how_did_you_hear = value,
            FormField::CouponCode => self.coupon_code = value,
            FormField::Referrer => self.referrer = value,
            FormField::Otp => self.otp = value,
        }
    }
}

/// Inline messages; a field only errors once it has input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub phone_number: Option<&'static str>,
    pub email_address: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none() && self.email_address.is_none()
    }
}

pub struct FormValidator {
    phone: Regex,
    email: Regex,
}

impl FormValidator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            phone: Regex::new(PHONE_PATTERN)?,
            email: Regex::new(EMAIL_PATTERN)?,
        })
    }

    pub fn is_valid_phone(&self, phone: &str) -> bool {
        self.phone.is_match(phone)
    }

    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email.is_match(email)
    }

    pub fn field_errors(&self, form: &FormData) -> FieldErrors {
        FieldErrors {
            phone_number: (!form.phone_number.is_empty() && !self.is_valid_phone(&form.phone_number))
                .then_some(INVALID_PHONE_MESSAGE),
            email_address: (!form.email_address.is_empty() && !self.is_valid_email(&form.email_address))
                .then_some(INVALID_EMAIL_MESSAGE),
        }
    }

    pub fn is_details_valid(&self, form: &FormData, otp_requested: bool) -> bool {
        match form.patient_type {
            PatientType::New => {
                !form.patient_name.trim().is_empty()
                    && !form.age.trim().is_empty()
                    && self.is_valid_phone(&form.phone_number)
                    && self.is_valid_email(&form.email_address)
                    && !form.gender.trim().is_empty()
            }
            PatientType::Existing => {
                self.is_valid_phone(&form.phone_number)
                    && otp_requested
                    && form.otp.chars().count() == OTP_LENGTH
            }
        }
    }

    pub fn is_scans_valid(&self, form: &FormData) -> bool {
        !form.selected_scans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_new_patient() -> FormData {
        FormData {
            patient_name: "Asha Rao".to_string(),
            age: "34".to_string(),
            phone_number: "9900500950".to_string(),
            email_address: "asha@example.com".to_string(),
            gender: "female".to_string(),
            ..FormData::default()
        }
    }

    #[test]
    fn test_patterns() {
        let validator = FormValidator::new().unwrap();

        assert!(validator.is_valid_phone("9900500950"));
        assert!(!validator.is_valid_phone("990050095"));
        assert!(!validator.is_valid_phone("+919900500950"));
        assert!(!validator.is_valid_phone("99005 00950"));

        assert!(validator.is_valid_email("a@b.co"));
        assert!(!validator.is_valid_email("a@b"));
        assert!(!validator.is_valid_email("a b@c.de"));
    }

    #[test]
    fn test_new_patient_details() {
        let validator = FormValidator::new().unwrap();
        let form = complete_new_patient();
        assert!(validator.is_details_valid(&form, false));

        for field in [FormField::PatientName, FormField::Age, FormField::Gender] {
            let mut incomplete = form.clone();
            incomplete.set(field, "");
            assert!(!validator.is_details_valid(&incomplete, false), "{:?} should be required", field);
        }

        let mut bad_email = form.clone();
        bad_email.set(FormField::EmailAddress, "asha@example");
        assert!(!validator.is_details_valid(&bad_email, false));
    }

    #[test]
    fn test_existing_patient_details() {
        let validator = FormValidator::new().unwrap();
        let mut form = FormData::for_patient_type(PatientType::Existing);
        form.set(FormField::PhoneNumber, "9900500950");
        form.set(FormField::Otp, "123456");

        assert!(validator.is_details_valid(&form, true));
        assert!(!validator.is_details_valid(&form, false));

        form.set(FormField::Otp, "12345");
        assert!(!validator.is_details_valid(&form, true));
    }

    #[test]
    fn test_field_errors_only_for_non_empty_input() {
        let validator = FormValidator::new().unwrap();

        assert!(validator.field_errors(&FormData::default()).is_empty());

        let mut form = FormData::default();
        form.set(FormField::PhoneNumber, "12345");
        form.set(FormField::EmailAddress, "nope");
        let errors = validator.field_errors(&form);

        assert_eq!(errors.phone_number, Some(INVALID_PHONE_MESSAGE));
        assert_eq!(errors.email_address, Some(INVALID_EMAIL_MESSAGE));
    }

    #[test]
    fn test_request_drops_otp() {
        let mut form = complete_new_patient();
        form.set(FormField::Otp, "123456");
        form.selected_scans = vec!["NT SCAN".to_string()];

        let request = form.to_request();
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("otp").is_none());
        assert_eq!(value["patientName"], "Asha Rao");
        assert_eq!(value["selectedScans"][0], "NT SCAN");
    }
}
