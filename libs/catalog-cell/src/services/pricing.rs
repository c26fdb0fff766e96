use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use mediva_cell::MedivaApiClient;
use shared_config::{AppConfig, PricingSource};

use crate::models::{CatalogError, ScanCatalog, ScanCategory};

/// Serves scan prices from the static table or from Mediva, caching the
/// catalog in memory for the life of the process.
pub struct PricingService {
    source: PricingSource,
    mediva: MedivaApiClient,
    cache: RwLock<Option<Arc<ScanCatalog>>>,
}

impl PricingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            source: config.pricing_source,
            mediva: MedivaApiClient::new(config),
            cache: RwLock::new(None),
        }
    }

    pub fn source(&self) -> PricingSource {
        self.source
    }

    /// Never fails: a remote error falls back to the static table without
    /// caching, so the next call retries.
    pub async fn catalog(&self) -> Arc<ScanCatalog> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Arc::clone(cached);
        }

        let mut cache = self.cache.write().await;
        if let Some(cached) = cache.as_ref() {
            return Arc::clone(cached);
        }

        let catalog = match self.source {
            PricingSource::Static => Arc::new(ScanCatalog::standard()),
            PricingSource::Remote => match self.fetch_remote().await {
                Ok(catalog) => Arc::new(catalog),
                Err(e) => {
                    warn!("Falling back to static pricing: {}", e);
                    return Arc::new(ScanCatalog::standard());
                }
            },
        };

        *cache = Some(Arc::clone(&catalog));
        catalog
    }

    pub async fn fetch_remote(&self) -> Result<ScanCatalog, CatalogError> {
        debug!("Fetching scan pricing from {}", self.mediva.base_url());

        let response = self.mediva.get_all_services().await
            .map_err(|e| CatalogError::RemoteUnavailable(e.to_string()))?;

        let catalog = ScanCatalog::from_services(&response.services);
        if catalog.is_empty() {
            return Err(CatalogError::EmptyRemoteCatalog);
        }

        info!("Loaded {} scans across {} categories from pricing API",
              catalog.all_test_names().len(), catalog.categories.len());

        Ok(catalog)
    }

    pub async fn refresh(&self) {
        self.cache.write().await.take();
        debug!("Pricing cache cleared");
    }

    pub async fn test_price(&self, test_name: &str) -> Option<f64> {
        self.catalog().await.test_price(test_name)
    }

    pub async fn test_category(&self, test_name: &str) -> Option<String> {
        self.catalog().await.test_category(test_name).map(str::to_string)
    }

    pub async fn search(&self, term: &str) -> Vec<ScanCategory> {
        self.catalog().await.search(term)
    }

    pub async fn total_price(&self, scans: &[String]) -> f64 {
        self.catalog().await.total_price(scans)
    }
}
