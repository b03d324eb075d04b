pub mod prompts;

pub mod product_service;
pub mod product_service_impl;
pub use product_service::{ProductError, ProductService};
pub use product_service_impl::SeaOrmProductService;

pub mod insight_service;
pub mod insight_service_impl;
pub use insight_service::{InsightError, InsightService};
pub use insight_service_impl::OllamaInsightService;
