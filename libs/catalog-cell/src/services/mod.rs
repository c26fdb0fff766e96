pub mod pricing;

pub use pricing::PricingService;
