use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use booking_cell::{admin_routes, booking_routes, BookingState};
use catalog_cell::{catalog_routes, PricingService};
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    let bookings = Arc::new(BookingState::new(config.clone()));
    let pricing = Arc::new(PricingService::new(&config));

    Router::new()
        .route("/", get(|| async { "Yana Labs booking API is running!" }))
        .merge(booking_routes(bookings.clone()))
        .nest("/admin", admin_routes(bookings))
        .nest("/catalog", catalog_routes(config, pricing))
}
