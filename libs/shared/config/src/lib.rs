use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_MEDIVA_API_BASE_URL: &str = "https://api.mediva.in";
pub const DEFAULT_BOOKING_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_PORT: u16 = 8080;

/// Where scan prices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingSource {
    Static,
    Remote,
}

impl FromStr for PricingSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(PricingSource::Static),
            "remote" | "mediva" => Ok(PricingSource::Remote),
            other => Err(format!("unknown pricing source: {}", other)),
        }
    }
}

impl fmt::Display for PricingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingSource::Static => write!(f, "static"),
            PricingSource::Remote => write!(f, "remote"),
        }
    }
}

/// Backing store for the bookings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStoreKind {
    Supabase,
    Memory,
}

impl FromStr for BookingStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(BookingStoreKind::Supabase),
            "memory" | "in-memory" => Ok(BookingStoreKind::Memory),
            other => Err(format!("unknown booking store: {}", other)),
        }
    }
}

impl fmt::Display for BookingStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStoreKind::Supabase => write!(f, "supabase"),
            BookingStoreKind::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub mediva_api_base_url: String,
    pub booking_api_base_url: String,
    pub pricing_source: PricingSource,
    pub booking_store: BookingStoreKind,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            mediva_api_base_url: env::var("MEDIVA_API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("MEDIVA_API_BASE_URL not set, using default");
                    DEFAULT_MEDIVA_API_BASE_URL.to_string()
                }),
            booking_api_base_url: env::var("BOOKING_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BOOKING_API_BASE_URL.to_string()),
            pricing_source: parse_or_default("PRICING_SOURCE", PricingSource::Static),
            booking_store: parse_or_default("BOOKING_STORE", BookingStoreKind::Supabase),
            port: parse_or_default("PORT", DEFAULT_PORT),
        };

        if config.booking_store == BookingStoreKind::Supabase && !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }

    pub fn is_admin_auth_configured(&self) -> bool {
        !self.supabase_jwt_secret.is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {} ({}), using default {}", key, e, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_source_parsing() {
        assert_eq!("static".parse::<PricingSource>().unwrap(), PricingSource::Static);
        assert_eq!(" Remote ".parse::<PricingSource>().unwrap(), PricingSource::Remote);
        assert!("csv".parse::<PricingSource>().is_err());
    }

    #[test]
    fn test_booking_store_parsing() {
        assert_eq!("memory".parse::<BookingStoreKind>().unwrap(), BookingStoreKind::Memory);
        assert_eq!("SUPABASE".parse::<BookingStoreKind>().unwrap(), BookingStoreKind::Supabase);
        assert!("sqlite".parse::<BookingStoreKind>().is_err());
    }
}
