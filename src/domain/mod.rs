//! Domain types for the product catalogue with strong typing.
//!
//! Identifiers arrive from the outside world as text (path segments, request
//! bodies). [`ProductId::parse`] is the one place that text becomes a typed
//! identifier, so the store never sees a malformed key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Returned when a product identifier is not a well-formed UUID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid product identifier: '{0}'")]
pub struct InvalidIdentifier(pub String);

/// Unique identifier for a Product in the system.
///
/// Assigned by the store on creation and never changed afterwards.
///
/// # Examples
///
/// ```rust
/// use marketplace_insights::domain::ProductId;
///
/// let id = ProductId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
/// assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
/// assert!(ProductId::parse("not-an-id").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a textual identifier, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, InvalidIdentifier> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| InvalidIdentifier(raw.to_string()))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ProductId {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The insight kinds that have a curated prompt template.
///
/// Unknown kinds are not an error: they fall back to [`InsightType::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InsightType {
    #[default]
    General,
    TrendAnalysis,
    PricingInsight,
    CompetitorAnalysis,
}

impl InsightType {
    /// Maps free text onto a known kind, falling back to `General`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "trend_analysis" => Self::TrendAnalysis,
            "pricing_insight" => Self::PricingInsight,
            "competitor_analysis" => Self::CompetitorAnalysis,
            _ => Self::General,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::TrendAnalysis => "trend_analysis",
            Self::PricingInsight => "pricing_insight",
            Self::CompetitorAnalysis => "competitor_analysis",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
