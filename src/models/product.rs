use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::ProductId;

/// Open string-keyed mapping attached to products and insights.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub marketplace: String,
    /// Identifier in the source marketplace, unrelated to `id`.
    pub product_id: Option<String>,
    pub url: Option<String>,
    pub metadata: Option<Metadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    pub marketplace: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, marketplace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            price: None,
            marketplace: marketplace.into(),
            product_id: None,
            url: None,
            metadata: None,
        }
    }
}

/// Partial update for a product.
///
/// Absent fields are left untouched. For optional fields an explicit JSON
/// `null` clears the stored value, which is why they are `Option<Option<_>>`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<f64>>,
    #[serde(default)]
    pub marketplace: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub product_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub metadata: Option<Option<Metadata>>,
}

/// Distinguishes `"field": null` (Some(None)) from a missing field (None).
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Exact-match filters for listing products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub marketplace: Option<String>,
    pub category: Option<String>,
}
