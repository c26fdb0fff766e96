pub mod client;
pub mod models;

pub use client::MedivaApiClient;
pub use models::*;
