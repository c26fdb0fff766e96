// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    BookedSlotsResponse, BookingError, BookingRequest, BookingResponse, PhoneSearchQuery,
    SlotQuery, UpdateBookingData,
};
use crate::services::BookingState;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            e @ BookingError::SlotTaken => AppError::Conflict(e.to_string()),
            e @ BookingError::NotFound => AppError::NotFound(e.to_string()),
            BookingError::DatabaseError(msg) => AppError::Database(msg),
            e => AppError::ValidationError(e.to_string()),
        }
    }
}

fn status_for(err: &BookingError) -> StatusCode {
    match err {
        BookingError::SlotTaken => StatusCode::CONFLICT,
        BookingError::NotFound => StatusCode::NOT_FOUND,
        BookingError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ==============================================================================
// PUBLIC BOOKING HANDLERS
// ==============================================================================

/// POST /patient/createBooking. Always answers with the booking envelope.
pub async fn create_booking(
    State(state): State<Arc<BookingState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> (StatusCode, Json<BookingResponse>) {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected booking payload: {}", rejection.body_text());
            let message = format!("Invalid booking request: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(BookingResponse::failed(message)));
        }
    };

    match state.bookings.create_booking(&request).await {
        Ok(booking) => (StatusCode::CREATED, Json(BookingResponse::booked(&booking))),
        Err(e) => (status_for(&e), Json(BookingResponse::failed(e.to_string()))),
    }
}

/// GET /bookings/slots?date=YYYY-MM-DD
pub async fn get_booked_slots(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<BookedSlotsResponse>, AppError> {
    if query.date.trim().is_empty() {
        return Err(AppError::BadRequest("Date is required".to_string()));
    }

    match state.slots.booked_slots_for_date(&query.date).await {
        Ok(booked_slots) => Ok(Json(BookedSlotsResponse {
            success: true,
            booked_slots,
            message: None,
        })),
        Err(e) if e.is_validation() => Err(AppError::BadRequest(e.to_string())),
        Err(e) => {
            warn!("Failed to fetch booked slots for {}: {}", query.date, e);
            Ok(Json(BookedSlotsResponse {
                success: false,
                booked_slots: Vec::new(),
                message: Some(e.to_string()),
            }))
        }
    }
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

pub async fn search_bookings(
    State(state): State<Arc<BookingState>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<PhoneSearchQuery>,
) -> Result<Json<Value>, AppError> {
    info!("Admin {} searching bookings by phone", user.id);

    let bookings = state.bookings
        .get_bookings_by_phone(&query.phone, Some(auth.token()))
        .await?;

    Ok(Json(json!({
        "total": bookings.len(),
        "bookings": bookings,
    })))
}

pub async fn get_booking(
    State(state): State<Arc<BookingState>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = state.bookings.get_booking(booking_id, Some(auth.token())).await?;
    Ok(Json(json!(booking)))
}

pub async fn update_booking(
    State(state): State<Arc<BookingState>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(booking_id): Path<Uuid>,
    Json(updates): Json<UpdateBookingData>,
) -> Result<Json<Value>, AppError> {
    info!("Admin {} updating booking {}", user.id, booking_id);

    let booking = state.bookings
        .update_booking(booking_id, updates, Some(auth.token()))
        .await?;

    Ok(Json(json!(booking)))
}

pub async fn delete_booking(
    State(state): State<Arc<BookingState>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    info!("Admin {} deleting booking {}", user.id, booking_id);

    state.bookings.delete_booking(booking_id, Some(auth.token())).await?;

    Ok(Json(json!({
        "success": true,
        "id": booking_id,
    })))
}
