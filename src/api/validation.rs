use super::ApiError;
use crate::domain::ProductId;

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 1000;
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

/// Parses a path segment into a [`ProductId`], rejecting malformed ids with 400.
pub fn validate_product_id(raw: &str) -> Result<ProductId, ApiError> {
    Ok(ProductId::parse(raw)?)
}

/// Splits a comma-separated aspect list, dropping empty entries.
#[must_use]
pub fn parse_aspects(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|aspect| !aspect.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Blank filter values mean "no filter".
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
