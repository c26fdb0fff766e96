use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{
    CreateBookingRequest, CreateBookingResponse, ErrorResponse, GetAllServicesResponse,
    MedivaError, PatientTokenStatusResponse, RawServiceResponse, Service,
};

/// Client for the Mediva patient booking API.
pub struct MedivaApiClient {
    client: Client,
    base_url: String,
}

impl MedivaApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(&config.mediva_api_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /patient/createBooking
    pub async fn create_booking(
        &self,
        request: &CreateBookingRequest,
    ) -> Result<CreateBookingResponse, MedivaError> {
        info!("Creating Mediva booking for phone {}", request.phone);
        self.make_request(Method::POST, "/patient/createBooking", Some(request)).await
    }

    /// GET /patient/getTokenStatus/{patientId}?terminalId=N
    pub async fn get_patient_token_status(
        &self,
        patient_id: &str,
        terminal_id: u32,
    ) -> Result<PatientTokenStatusResponse, MedivaError> {
        if patient_id.trim().is_empty() {
            return Err(MedivaError::InvalidRequest("patient id is required".to_string()));
        }

        let endpoint = format!(
            "/patient/getTokenStatus/{}?terminalId={}",
            urlencoding::encode(patient_id),
            terminal_id
        );
        self.make_request::<(), _>(Method::GET, &endpoint, None).await
    }

    /// GET /patient/get-all-services
    pub async fn get_all_services(&self) -> Result<GetAllServicesResponse, MedivaError> {
        let raw: RawServiceResponse = self
            .make_request::<(), _>(Method::GET, "/patient/get-all-services", None)
            .await?;

        debug!("Received {} raw services from Mediva", raw.len());

        let services: Vec<Service> = raw.into_iter().map(Service::from_raw).collect();

        Ok(GetAllServicesResponse {
            success: true,
            services,
            message: Some("Services retrieved successfully".to_string()),
        })
    }

    async fn make_request<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, MedivaError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Sending {} request to: {}", method, url);

        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json::<T>().await?)
    }

    async fn error_from_response(response: Response) -> MedivaError {
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("Unknown").to_string();

        let parsed = response.json::<ErrorResponse>().await.ok();
        match parsed {
            Some(body) if !body.message.is_empty() => {
                error!("Mediva API error ({}): {}", status, body.message);
                MedivaError::Api(body.message)
            }
            _ => {
                error!("Mediva API error ({}) without message body", status);
                MedivaError::Http { status: status.as_u16(), reason }
            }
        }
    }
}
