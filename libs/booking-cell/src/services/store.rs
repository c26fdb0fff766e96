// libs/booking-cell/src/services/store.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{eq_filter, SupabaseClient};

use crate::models::{Booking, CreateBookingData, UpdateBookingData};

const BOOKINGS_PATH: &str = "/rest/v1/bookings";

/// Message PostgREST returns when the `(selected_date, selected_time)` unique
/// constraint rejects a write.
pub const DUPLICATE_SLOT_MESSAGE: &str =
    "duplicate key value violates unique constraint \"bookings_selected_date_selected_time_key\"";

/// Persistence for the `bookings` table. Implementations must reject a second
/// booking for an occupied slot with an error mentioning `duplicate key`.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, data: &CreateBookingData) -> Result<Booking>;

    async fn booked_times(&self, date: &str) -> Result<Vec<String>>;

    async fn find_by_slot(&self, date: &str, time: &str) -> Result<Option<Uuid>>;

    /// Newest first.
    async fn find_by_phone(&self, phone: &str, auth_token: Option<&str>) -> Result<Vec<Booking>>;

    async fn find_by_id(&self, id: Uuid, auth_token: Option<&str>) -> Result<Option<Booking>>;

    async fn update(&self, id: Uuid, updates: &UpdateBookingData,
                    auth_token: Option<&str>) -> Result<Option<Booking>>;

    async fn delete(&self, id: Uuid, auth_token: Option<&str>) -> Result<bool>;
}

// ==============================================================================
// SUPABASE STORE
// ==============================================================================

#[derive(Debug, Deserialize)]
struct SlotRow {
    selected_time: String,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: Uuid,
}

pub struct SupabaseBookingStore {
    supabase: SupabaseClient,
}

impl SupabaseBookingStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl BookingStore for SupabaseBookingStore {
    async fn insert(&self, data: &CreateBookingData) -> Result<Booking> {
        let body = serde_json::to_value(vec![data])?;

        let rows: Vec<Booking> = self.supabase.request_with_headers(
            Method::POST,
            BOOKINGS_PATH,
            None,
            Some(body),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow!("Insert returned no booking row"))
    }

    async fn booked_times(&self, date: &str) -> Result<Vec<String>> {
        let path = format!("{}?select=selected_time&selected_date={}", BOOKINGS_PATH, eq_filter(date));

        let rows: Vec<SlotRow> = self.supabase.request(Method::GET, &path, None, None).await?;
        debug!("{} booked slots on {}", rows.len(), date);

        Ok(rows.into_iter().map(|row| row.selected_time).collect())
    }

    async fn find_by_slot(&self, date: &str, time: &str) -> Result<Option<Uuid>> {
        let path = format!(
            "{}?select=id&selected_date={}&selected_time={}&limit=1",
            BOOKINGS_PATH, eq_filter(date), eq_filter(time)
        );

        let rows: Vec<IdRow> = self.supabase.request(Method::GET, &path, None, None).await?;
        Ok(rows.into_iter().next().map(|row| row.id))
    }

    async fn find_by_phone(&self, phone: &str, auth_token: Option<&str>) -> Result<Vec<Booking>> {
        let path = format!(
            "{}?phone_number={}&order=created_at.desc",
            BOOKINGS_PATH, eq_filter(phone)
        );

        self.supabase.request(Method::GET, &path, auth_token, None).await
    }

    async fn find_by_id(&self, id: Uuid, auth_token: Option<&str>) -> Result<Option<Booking>> {
        let path = format!("{}?id=eq.{}&limit=1", BOOKINGS_PATH, id);

        let rows: Vec<Booking> = self.supabase.request(Method::GET, &path, auth_token, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn update(&self, id: Uuid, updates: &UpdateBookingData,
                    auth_token: Option<&str>) -> Result<Option<Booking>> {
        let path = format!("{}?id=eq.{}", BOOKINGS_PATH, id);

        let rows: Vec<Booking> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            auth_token,
            Some(serde_json::to_value(updates)?),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: Uuid, auth_token: Option<&str>) -> Result<bool> {
        let path = format!("{}?id=eq.{}", BOOKINGS_PATH, id);

        let rows: Vec<Value> = self.supabase.request_with_headers(
            Method::DELETE,
            &path,
            auth_token,
            None,
            Some(SupabaseClient::representation_headers()),
        ).await?;

        Ok(!rows.is_empty())
    }
}

// ==============================================================================
// IN-MEMORY STORE
// ==============================================================================

/// Process-local table for local runs and tests. The slot check and the
/// write happen under one lock, mirroring the database constraint.
#[derive(Default)]
pub struct InMemoryBookingStore {
    rows: Mutex<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

fn duplicate_slot_error() -> anyhow::Error {
    anyhow!("Conflict (409 Conflict): {}", DUPLICATE_SLOT_MESSAGE)
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, data: &CreateBookingData) -> Result<Booking> {
        let mut rows = self.rows.lock().await;

        if rows.iter().any(|b| b.occupies(&data.selected_date, &data.selected_time)) {
            return Err(duplicate_slot_error());
        }

        let booking = Booking::from_insert(data.clone(), Uuid::new_v4(), Utc::now());
        rows.push(booking.clone());

        Ok(booking)
    }

    async fn booked_times(&self, date: &str) -> Result<Vec<String>> {
        let rows = self.rows.lock().await;

        Ok(rows.iter()
            .filter(|b| b.selected_date == date)
            .map(|b| b.selected_time.clone())
            .collect())
    }

    async fn find_by_slot(&self, date: &str, time: &str) -> Result<Option<Uuid>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|b| b.occupies(date, time)).map(|b| b.id))
    }

    async fn find_by_phone(&self, phone: &str, _auth_token: Option<&str>) -> Result<Vec<Booking>> {
        let rows = self.rows.lock().await;

        let mut matches: Vec<Booking> = rows.iter()
            .filter(|b| b.phone_number == phone)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps; reverse it for newest first.
        matches.reverse();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matches)
    }

    async fn find_by_id(&self, id: Uuid, _auth_token: Option<&str>) -> Result<Option<Booking>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|b| b.id == id).cloned())
    }

    async fn update(&self, id: Uuid, updates: &UpdateBookingData,
                    _auth_token: Option<&str>) -> Result<Option<Booking>> {
        let mut rows = self.rows.lock().await;

        let Some(index) = rows.iter().position(|b| b.id == id) else {
            return Ok(None);
        };

        let mut updated = rows[index].clone();
        updated.apply(updates);

        let clashes = rows.iter().any(|b| {
            b.id != id && b.occupies(&updated.selected_date, &updated.selected_time)
        });
        if clashes {
            return Err(duplicate_slot_error());
        }

        rows[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid, _auth_token: Option<&str>) -> Result<bool> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|b| b.id != id);
        Ok(rows.len() < before)
    }
}
