use std::sync::Arc;
use tracing::debug;

use crate::models::BookingError;
use crate::services::store::BookingStore;
use crate::services::validation::{parse_slot_date, parse_slot_time, DATE_FORMAT, TIME_FORMAT};

/// Read side of the slot invariant: which times on a date are already taken.
pub struct SlotAvailabilityService {
    store: Arc<dyn BookingStore>,
}

impl SlotAvailabilityService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// One unpaginated query. Failures go back to the caller unchanged.
    pub async fn booked_slots_for_date(&self, date: &str) -> Result<Vec<String>, BookingError> {
        let date = parse_slot_date(date)?.format(DATE_FORMAT).to_string();

        let mut times = self.store.booked_times(&date).await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;
        times.sort();

        debug!("Booked slots on {}: {:?}", date, times);
        Ok(times)
    }

    pub async fn is_slot_available(&self, date: &str, time: &str) -> Result<bool, BookingError> {
        let date = parse_slot_date(date)?.format(DATE_FORMAT).to_string();
        let time = parse_slot_time(time)?.format(TIME_FORMAT).to_string();

        let existing = self.store.find_by_slot(&date, &time).await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        Ok(existing.is_none())
    }
}
