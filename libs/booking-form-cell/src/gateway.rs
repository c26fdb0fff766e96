use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use booking_cell::{BookedSlotsResponse, BookingRequest, BookingResponse, BookingState};
use shared_config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Unavailable(String),
}

/// What the booking form needs from the backend.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Backend rejections come back as `Ok` with `success: false`; `Err` means
    /// no readable answer arrived.
    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingResponse, GatewayError>;

    async fn booked_slots(&self, date: &str) -> Result<Vec<String>, GatewayError>;
}

// ==============================================================================
// HTTP GATEWAY
// ==============================================================================

pub struct HttpBookingGateway {
    client: Client,
    base_url: String,
}

impl HttpBookingGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.booking_api_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BookingGateway for HttpBookingGateway {
    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingResponse, GatewayError> {
        let url = format!("{}/patient/createBooking", self.base_url);
        debug!("Submitting booking to {}", url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error statuses still carry the {success, message} envelope.
        match serde_json::from_str::<BookingResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) => {
                error!("Unreadable booking response ({}): {}", status, body);
                let message = if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("Unknown").to_string()
                } else {
                    body
                };
                Err(GatewayError::Status { status: status.as_u16(), message })
            }
        }
    }

    async fn booked_slots(&self, date: &str) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/bookings/slots?date={}", self.base_url, urlencoding::encode(date));
        debug!("Fetching booked slots from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status: status.as_u16(), message });
        }

        let parsed: BookedSlotsResponse = response.json().await?;
        if !parsed.success {
            return Err(GatewayError::Unavailable(
                parsed.message.unwrap_or_else(|| "Failed to fetch booked slots".to_string()),
            ));
        }

        Ok(parsed.booked_slots)
    }
}

// ==============================================================================
// IN-PROCESS GATEWAY
// ==============================================================================

/// Calls the booking services directly, for running the form next to the API.
pub struct LocalBookingGateway {
    state: Arc<BookingState>,
}

impl LocalBookingGateway {
    pub fn new(state: Arc<BookingState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl BookingGateway for LocalBookingGateway {
    async fn create_booking(&self, request: &BookingRequest) -> Result<BookingResponse, GatewayError> {
        Ok(self.state.bookings.submit(request).await)
    }

    async fn booked_slots(&self, date: &str) -> Result<Vec<String>, GatewayError> {
        self.state.slots.booked_slots_for_date(date).await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))
    }
}
