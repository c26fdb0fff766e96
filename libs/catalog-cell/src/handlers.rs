// libs/catalog-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{CatalogSearchQuery, ScanPriceQuery, ScanPriceResponse};
use crate::services::PricingService;

pub async fn list_scans(
    State(pricing): State<Arc<PricingService>>,
) -> Json<Value> {
    let catalog = pricing.catalog().await;

    Json(json!({
        "source": pricing.source().to_string(),
        "categories": catalog.categories,
    }))
}

pub async fn search_scans(
    State(pricing): State<Arc<PricingService>>,
    Query(query): Query<CatalogSearchQuery>,
) -> Json<Value> {
    let categories = pricing.search(&query.q).await;

    Json(json!({
        "query": query.q,
        "categories": categories,
    }))
}

pub async fn get_scan_price(
    State(pricing): State<Arc<PricingService>>,
    Query(query): Query<ScanPriceQuery>,
) -> Result<Json<ScanPriceResponse>, AppError> {
    if query.name.trim().is_empty() {
        return Err(AppError::BadRequest("Scan name is required".to_string()));
    }

    let catalog = pricing.catalog().await;

    Ok(Json(ScanPriceResponse {
        price: catalog.test_price(&query.name),
        category: catalog.test_category(&query.name).map(str::to_string),
        name: query.name,
    }))
}

pub async fn refresh_catalog(
    State(pricing): State<Arc<PricingService>>,
) -> Json<Value> {
    pricing.refresh().await;
    let catalog = pricing.catalog().await;

    Json(json!({
        "success": true,
        "scans": catalog.all_test_names().len(),
    }))
}
