use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Metadata;

/// A generated text artifact stored against a product reference.
///
/// `product_id` is free text and not checked against the products table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: Uuid,
    pub product_id: String,
    pub insight_type: String,
    pub insight_content: String,
    pub metadata: Option<Metadata>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInsight {
    pub product_id: String,
    pub insight_type: String,
    pub insight_content: String,
    pub metadata: Option<Metadata>,
    pub generated_at: DateTime<Utc>,
}

/// Model and product attributes in effect when an insight was generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightMetadata {
    pub model_used: String,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub marketplace: Option<String>,
}

/// Output of a single insight generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedInsight {
    pub insight_type: String,
    pub insight_content: String,
    pub product_name: String,
    pub metadata: InsightMetadata,
}

impl GeneratedInsight {
    /// Prepares the generated text for storage against `product_id`.
    #[must_use]
    pub fn into_new_insight(self, product_id: String, generated_at: DateTime<Utc>) -> NewInsight {
        let metadata = match serde_json::to_value(&self.metadata) {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        };

        NewInsight {
            product_id,
            insight_type: self.insight_type,
            insight_content: self.insight_content,
            metadata,
            generated_at,
        }
    }
}

/// Request body for `POST /insights/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default = "default_insight_type")]
    pub insight_type: String,
    #[serde(default)]
    pub context: Option<String>,
    /// Accepted for wire compatibility; does not change the prompt.
    #[serde(default)]
    pub include_competitors: bool,
}

fn default_insight_type() -> String {
    "general".to_string()
}
