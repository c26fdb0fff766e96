pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::{admin_routes, booking_routes};
pub use services::{BookingService, BookingState, BookingStore, InMemoryBookingStore, SlotAvailabilityService};
