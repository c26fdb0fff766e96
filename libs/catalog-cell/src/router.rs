use std::sync::Arc;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;
use crate::services::PricingService;

pub fn catalog_routes(config: Arc<AppConfig>, pricing: Arc<PricingService>) -> Router {
    let public_routes = Router::new()
        .route("/scans", get(handlers::list_scans))
        .route("/scans/search", get(handlers::search_scans))
        .route("/scans/price", get(handlers::get_scan_price));

    let admin_routes = Router::new()
        .route("/scans/refresh", post(handlers::refresh_catalog))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(config, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(pricing)
}
