pub mod insight;
pub mod product;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 (UTC, microseconds) so that text order equals time order.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Corrupt timestamp in store: {raw}"))
}

pub(crate) fn encode_metadata(metadata: Option<&crate::models::Metadata>) -> Result<Option<String>> {
    metadata
        .map(serde_json::to_string)
        .transpose()
        .context("Failed to encode metadata")
}

pub(crate) fn decode_metadata(raw: Option<&str>) -> Result<Option<crate::models::Metadata>> {
    raw.map(serde_json::from_str)
        .transpose()
        .context("Corrupt metadata in store")
}
