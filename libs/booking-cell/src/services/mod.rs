pub mod booking;
pub mod slots;
pub mod store;
pub mod validation;

use std::sync::Arc;
use tracing::info;

use shared_config::{AppConfig, BookingStoreKind};

pub use booking::BookingService;
pub use slots::SlotAvailabilityService;
pub use store::{BookingStore, InMemoryBookingStore, SupabaseBookingStore};

/// Shared by the public and admin booking routers. Both services sit on the
/// same store so a write is visible to the next slot query.
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub bookings: BookingService,
    pub slots: SlotAvailabilityService,
}

impl BookingState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let store: Arc<dyn BookingStore> = match config.booking_store {
            BookingStoreKind::Supabase => Arc::new(SupabaseBookingStore::new(&config)),
            BookingStoreKind::Memory => Arc::new(InMemoryBookingStore::new()),
        };
        info!("Booking store: {}", config.booking_store);

        Self::with_store(config, store)
    }

    pub fn with_store(config: Arc<AppConfig>, store: Arc<dyn BookingStore>) -> Self {
        Self {
            config,
            bookings: BookingService::new(Arc::clone(&store)),
            slots: SlotAvailabilityService::new(store),
        }
    }
}
