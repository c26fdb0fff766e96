// libs/booking-form-cell/src/wizard.rs
use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use booking_cell::{BookingError, PatientType};
use catalog_cell::{PricingItem, ScanCatalog, ScanCategory};

use crate::form::{FieldErrors, FormData, FormField, FormValidator, INVALID_PHONE_MESSAGE};
use crate::gateway::{BookingGateway, GatewayError};
use crate::time_slots::{available_dates, is_offered_time, DayPeriod};

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your internet connection and try again.";
pub const BOOKING_FAILED_MESSAGE: &str = "Failed to confirm appointment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Details = 1,
    Scans = 2,
    Slot = 3,
}

impl WizardStep {
    fn next(self) -> Option<Self> {
        match self {
            WizardStep::Details => Some(WizardStep::Scans),
            WizardStep::Scans => Some(WizardStep::Slot),
            WizardStep::Slot => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Details => None,
            WizardStep::Scans => Some(WizardStep::Details),
            WizardStep::Slot => Some(WizardStep::Scans),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Details => write!(f, "Fill details"),
            WizardStep::Scans => write!(f, "Select scan"),
            WizardStep::Slot => write!(f, "Confirm slot"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    fn success(title: &str, message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Success, title: title.to_string(), message: message.into() }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Error, title: "Error".to_string(), message: message.into() }
    }
}

/// What the confirmation dialog shows after a successful booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub details: FormData,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Please complete \"{0}\" before continuing")]
    StepIncomplete(WizardStep),

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Already at the last step")]
    AtLastStep,

    #[error("{}", INVALID_PHONE_MESSAGE)]
    InvalidPhone,

    #[error("{0} is outside the booking window")]
    DateNotOffered(NaiveDate),

    #[error("{0} is not an available appointment time")]
    TimeNotOffered(String),

    #[error("Please select a date first")]
    NoDateSelected,

    #[error("The {0} slot has already been booked")]
    SlotBooked(String),

    #[error("Please select an available date and time")]
    SubmitDisabled,

    #[error("{0}")]
    SubmissionFailed(String),

    #[error("Invalid form pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Three-step booking form: details, scans, slot.
///
/// Moves are one step at a time and gated by the current step's predicate.
/// `submit` holds `&mut self` across the backend call, so a second submission
/// cannot start while one is in flight.
pub struct BookingWizard {
    step: WizardStep,
    form: FormData,
    otp_requested: bool,
    search_term: String,
    booked_slots: Vec<String>,
    today: NaiveDate,
    catalog: Arc<ScanCatalog>,
    validator: FormValidator,
    notifications: Vec<Notification>,
    confirmation: Option<BookingConfirmation>,
}

impl BookingWizard {
    pub fn new(catalog: Arc<ScanCatalog>) -> Result<Self, WizardError> {
        Ok(Self {
            step: WizardStep::Details,
            form: FormData::default(),
            otp_requested: false,
            search_term: String::new(),
            booked_slots: Vec::new(),
            today: Local::now().date_naive(),
            catalog,
            validator: FormValidator::new()?,
            notifications: Vec::new(),
            confirmation: None,
        })
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn otp_requested(&self) -> bool {
        self.otp_requested
    }

    pub fn booked_slots(&self) -> &[String] {
        &self.booked_slots
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn dismiss_confirmation(&mut self) -> Option<BookingConfirmation> {
        self.confirmation.take()
    }

    // --------------------------------------------------------------------------
    // Step 1: details
    // --------------------------------------------------------------------------

    /// Switching branch starts the form over.
    pub fn set_patient_type(&mut self, patient_type: PatientType) {
        self.form = FormData::for_patient_type(patient_type);
        self.otp_requested = false;
        self.booked_slots.clear();
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.validator.field_errors(&self.form)
    }

    pub fn request_otp(&mut self) -> Result<(), WizardError> {
        if !self.validator.is_valid_phone(&self.form.phone_number) {
            return Err(WizardError::InvalidPhone);
        }

        self.otp_requested = true;
        self.notifications.push(Notification::success(
            "OTP Sent",
            format!("A verification code was sent to {}", self.form.phone_number),
        ));
        Ok(())
    }

    pub fn is_details_valid(&self) -> bool {
        self.validator.is_details_valid(&self.form, self.otp_requested)
    }

    // --------------------------------------------------------------------------
    // Step 2: scans
    // --------------------------------------------------------------------------

    pub fn toggle_scan(&mut self, scan: &str) {
        let scans = &mut self.form.selected_scans;
        match scans.iter().position(|s| s == scan) {
            Some(index) => {
                scans.remove(index);
            }
            None => scans.push(scan.to_string()),
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn visible_categories(&self) -> Vec<ScanCategory> {
        self.catalog.search(&self.search_term)
    }

    pub fn is_scans_valid(&self) -> bool {
        self.validator.is_scans_valid(&self.form)
    }

    /// One line per selected scan; unknown scans are listed at zero.
    pub fn price_summary(&self) -> Vec<PricingItem> {
        self.form.selected_scans.iter()
            .map(|scan| PricingItem::new(scan, self.catalog.test_price(scan).unwrap_or(0.0)))
            .collect()
    }

    pub fn total_price(&self) -> f64 {
        self.catalog.total_price(&self.form.selected_scans)
    }

    // --------------------------------------------------------------------------
    // Step 3: slot
    // --------------------------------------------------------------------------

    pub fn available_dates(&self) -> Vec<NaiveDate> {
        available_dates(self.today)
    }

    pub fn time_slots(&self) -> Vec<(DayPeriod, Vec<String>)> {
        DayPeriod::ALL.iter().map(|period| (*period, period.slots())).collect()
    }

    pub fn is_slot_booked(&self, time: &str) -> bool {
        self.booked_slots.iter().any(|booked| booked == time)
    }

    /// Clears the chosen time and reloads availability for `date`. A failed
    /// reload leaves every slot open.
    pub async fn select_date<G>(&mut self, date: NaiveDate, gateway: &G) -> Result<(), WizardError>
    where
        G: BookingGateway + ?Sized,
    {
        if !self.available_dates().contains(&date) {
            return Err(WizardError::DateNotOffered(date));
        }

        self.form.selected_date = date.format("%Y-%m-%d").to_string();
        self.form.selected_time.clear();
        self.refresh_booked_slots(gateway).await;

        Ok(())
    }

    pub async fn refresh_booked_slots<G>(&mut self, gateway: &G)
    where
        G: BookingGateway + ?Sized,
    {
        self.booked_slots.clear();
        if self.form.selected_date.is_empty() {
            return;
        }

        match gateway.booked_slots(&self.form.selected_date).await {
            Ok(slots) => {
                debug!("{} booked slots on {}", slots.len(), self.form.selected_date);
                self.booked_slots = slots;
            }
            Err(e) => {
                warn!("Could not load booked slots for {}: {}", self.form.selected_date, e);
            }
        }
    }

    pub fn select_time(&mut self, time: &str) -> Result<(), WizardError> {
        if self.form.selected_date.is_empty() {
            return Err(WizardError::NoDateSelected);
        }
        if !is_offered_time(time) {
            return Err(WizardError::TimeNotOffered(time.to_string()));
        }
        if self.is_slot_booked(time) {
            return Err(WizardError::SlotBooked(time.to_string()));
        }

        self.form.selected_time = time.to_string();
        Ok(())
    }

    pub fn is_slot_valid(&self) -> bool {
        !self.form.selected_date.is_empty()
            && !self.form.selected_time.is_empty()
            && !self.is_slot_booked(&self.form.selected_time)
    }

    // --------------------------------------------------------------------------
    // Navigation and submission
    // --------------------------------------------------------------------------

    fn is_step_valid(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Details => self.is_details_valid(),
            WizardStep::Scans => self.is_scans_valid(),
            WizardStep::Slot => self.is_slot_valid(),
        }
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let target = self.step.next().ok_or(WizardError::AtLastStep)?;
        if !self.is_step_valid(self.step) {
            return Err(WizardError::StepIncomplete(self.step));
        }

        self.notifications.push(Notification::success("Step Completed", self.step.to_string()));
        self.step = target;
        Ok(target)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let target = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = target;
        Ok(target)
    }

    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Slot && self.is_slot_valid()
    }

    /// On success the form resets to step 1 and the confirmation is kept for
    /// display. On failure the wizard stays on the slot step, and a slot lost
    /// to another booking is marked as booked.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<BookingConfirmation, WizardError>
    where
        G: BookingGateway + ?Sized,
    {
        if !self.can_submit() {
            return Err(WizardError::SubmitDisabled);
        }

        let request = self.form.to_request();
        info!("Submitting booking for {} {}", request.selected_date, request.selected_time);

        let message = match gateway.create_booking(&request).await {
            Ok(response) if response.success => {
                let confirmation = BookingConfirmation {
                    booking_id: response.booking_id.unwrap_or_default(),
                    details: self.form.clone(),
                };
                self.notifications.push(Notification::success("Booking Successful!", response.message));
                self.confirmation = Some(confirmation.clone());
                self.reset();
                return Ok(confirmation);
            }
            Ok(response) if response.message.trim().is_empty() => BOOKING_FAILED_MESSAGE.to_string(),
            Ok(response) => response.message,
            Err(GatewayError::Network(e)) => {
                warn!("Booking submission failed in transport: {}", e);
                NETWORK_ERROR_MESSAGE.to_string()
            }
            Err(e) => e.to_string(),
        };

        warn!("Booking submission rejected: {}", message);
        if message == BookingError::SlotTaken.to_string() {
            let lost = self.form.selected_time.clone();
            if !self.is_slot_booked(&lost) {
                self.booked_slots.push(lost);
            }
        }
        self.notifications.push(Notification::error(message.clone()));
        Err(WizardError::SubmissionFailed(message))
    }

    fn reset(&mut self) {
        self.step = WizardStep::Details;
        self.form = FormData::default();
        self.otp_requested = false;
        self.search_term.clear();
        self.booked_slots.clear();
    }
}
