pub mod insight;
pub mod product;

pub use insight::{GeneratedInsight, Insight, InsightMetadata, InsightRequest, NewInsight};
pub use product::{Metadata, NewProduct, Product, ProductFilter, ProductPatch};
