//! RFC 3339 <-> epoch seconds conversion for timestamp attributes

use crate::error::{ProviderError, Result};
use chrono::{DateTime, SecondsFormat};

/// Parse an RFC 3339 attribute value into epoch seconds
pub fn parse(attribute: &'static str, value: &str) -> Result<i64> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.timestamp())
        .map_err(|source| ProviderError::InvalidTimestamp {
            attribute,
            value: value.to_string(),
            source,
        })
}

/// Parse an optional attribute; an empty string counts as unset
pub fn parse_optional(attribute: &'static str, value: Option<&str>) -> Result<Option<i64>> {
    match value {
        Some(v) if !v.is_empty() => parse(attribute, v).map(Some),
        _ => Ok(None),
    }
}

/// Format epoch seconds as an RFC 3339 UTC timestamp
///
/// Fails for epochs chrono cannot represent, so a stored value always parses back.
pub fn format(epoch: i64) -> Result<String> {
    DateTime::from_timestamp(epoch, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or(ProviderError::TimestampOutOfRange { epoch })
}
