use std::sync::Arc;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;
use crate::services::BookingState;

/// Unauthenticated routes used by the booking form.
pub fn booking_routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/patient/createBooking", post(handlers::create_booking))
        .route("/bookings/slots", get(handlers::get_booked_slots))
        .with_state(state)
}

/// Booking lookup and maintenance for clinic admins. Mounted under `/admin`.
pub fn admin_routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/bookings", get(handlers::search_bookings))
        .route(
            "/bookings/{booking_id}",
            get(handlers::get_booking)
                .patch(handlers::update_booking)
                .delete(handlers::delete_booking),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware))
        .with_state(state)
}
