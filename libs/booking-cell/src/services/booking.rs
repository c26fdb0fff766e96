// libs/booking-cell/src/services/booking.rs
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::{
    Booking, BookingError, BookingRequest, BookingResponse, UpdateBookingData,
};
use crate::services::store::BookingStore;
use crate::services::validation::{to_insert_data, validate_booking_request, validate_update};

/// Maps a storage failure, recognising the unique-slot violation by message.
pub fn map_store_error(err: anyhow::Error) -> BookingError {
    let message = err.to_string();

    if message.contains("duplicate key") {
        warn!("Slot write rejected by unique constraint");
        BookingError::SlotTaken
    } else {
        error!("Booking storage error: {}", message);
        BookingError::DatabaseError(message)
    }
}

/// Writes bookings. There is no pre-insert availability check; the store's
/// unique constraint decides who wins a race for a slot.
pub struct BookingService {
    store: Arc<dyn BookingStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, BookingError> {
        let (date, time) = validate_booking_request(request).map_err(|e| {
            debug!("Booking request rejected: {}", e);
            e
        })?;

        info!("Creating {} patient booking for {} {} ({} scans)",
              request.patient_type, date, time, request.selected_scans.len());

        let data = to_insert_data(request, date, time);
        let booking = self.store.insert(&data).await.map_err(map_store_error)?;

        info!("Booking {} created", booking.id);
        Ok(booking)
    }

    /// Same as [`create_booking`](Self::create_booking) but always answers
    /// with the `{success, message, bookingId?}` envelope.
    pub async fn submit(&self, request: &BookingRequest) -> BookingResponse {
        match self.create_booking(request).await {
            Ok(booking) => BookingResponse::booked(&booking),
            Err(e) => BookingResponse::failed(e.to_string()),
        }
    }

    pub async fn get_bookings_by_phone(&self, phone: &str,
                                       auth_token: Option<&str>) -> Result<Vec<Booking>, BookingError> {
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(BookingError::ValidationError("Phone number is required".to_string()));
        }

        debug!("Looking up bookings for phone {}", phone);
        self.store.find_by_phone(phone, auth_token).await.map_err(map_store_error)
    }

    pub async fn get_booking(&self, booking_id: Uuid,
                             auth_token: Option<&str>) -> Result<Booking, BookingError> {
        self.store.find_by_id(booking_id, auth_token).await
            .map_err(map_store_error)?
            .ok_or(BookingError::NotFound)
    }

    pub async fn update_booking(&self, booking_id: Uuid, mut updates: UpdateBookingData,
                                auth_token: Option<&str>) -> Result<Booking, BookingError> {
        validate_update(&mut updates)?;

        if updates.moves_slot() {
            info!("Moving booking {} to {:?} {:?}", booking_id,
                  updates.selected_date, updates.selected_time);
        }

        let booking = self.store.update(booking_id, &updates, auth_token).await
            .map_err(map_store_error)?
            .ok_or(BookingError::NotFound)?;

        info!("Booking {} updated", booking_id);
        Ok(booking)
    }

    pub async fn delete_booking(&self, booking_id: Uuid,
                                auth_token: Option<&str>) -> Result<(), BookingError> {
        let deleted = self.store.delete(booking_id, auth_token).await.map_err(map_store_error)?;
        if !deleted {
            return Err(BookingError::NotFound);
        }

        info!("Booking {} deleted", booking_id);
        Ok(())
    }
}
