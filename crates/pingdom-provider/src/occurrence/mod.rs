//! `pingdom_occurrence`: a group of maintenance occurrences addressed by query
//!
//! Pingdom has no resource for "these occurrences", so the group is identified
//! locally by a random ID and remotely by `(maintenance_id, effective_from,
//! effective_to)`. Changing `from`/`to` moves every matched occurrence.

pub mod group;
pub mod resource;

pub use group::OccurrenceGroup;
pub use resource::OccurrenceResource;

use crate::error::{ProviderError, Result};
use crate::timestamp;
use pingdom_api::{OccurrenceQuery, OccurrenceWindow};
use serde::{Deserialize, Serialize};

pub const RESOURCE_TYPE: &str = "pingdom_occurrence";

/// User configuration for an occurrence group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceConfig {
    pub maintenance_id: i64,
    pub effective_from: String,
    pub effective_to: String,
    /// Target start for every matched occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Target end for every matched occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl OccurrenceConfig {
    pub fn query(&self) -> Result<OccurrenceQuery> {
        Ok(OccurrenceQuery::new(
            self.maintenance_id,
            timestamp::parse("effective_from", &self.effective_from)?,
            timestamp::parse("effective_to", &self.effective_to)?,
        ))
    }

    /// Parsed `from`/`to`, each `None` when unset or empty
    fn window_parts(&self) -> Result<(Option<i64>, Option<i64>)> {
        Ok((
            timestamp::parse_optional("from", self.from.as_deref())?,
            timestamp::parse_optional("to", self.to.as_deref())?,
        ))
    }

    /// Target window; `from` and `to` must be given together or not at all
    pub fn target_window(&self) -> Result<Option<OccurrenceWindow>> {
        match self.window_parts()? {
            (Some(from), Some(to)) => Ok(Some(OccurrenceWindow { from, to })),
            (None, None) => Ok(None),
            (from, to) => Err(asymmetric_window(from, to)),
        }
    }
}

fn asymmetric_window(from: Option<i64>, to: Option<i64>) -> ProviderError {
    ProviderError::Validation(format!(
        "'from' and 'to' must be provided at the same time, current values are from: {}, to: {}",
        from.unwrap_or_default(),
        to.unwrap_or_default()
    ))
}

/// Persisted state of an occurrence group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceState {
    /// Random local identifier, meaningless to Pingdom
    pub id: String,
    pub maintenance_id: i64,
    pub effective_from: String,
    pub effective_to: String,
    /// Observed start of the first matched occurrence
    pub from: String,
    /// Observed end of the first matched occurrence
    pub to: String,
    /// Number of occurrences matched at the last read
    pub size: usize,
}

impl OccurrenceState {
    /// Rebuild the query from stored attributes
    pub fn query(&self) -> Result<OccurrenceQuery> {
        Ok(OccurrenceQuery::new(
            self.maintenance_id,
            timestamp::parse("effective_from", &self.effective_from)?,
            timestamp::parse("effective_to", &self.effective_to)?,
        ))
    }

    /// Observed window of the sampled occurrence
    pub fn window(&self) -> Result<OccurrenceWindow> {
        Ok(OccurrenceWindow {
            from: timestamp::parse("from", &self.from)?,
            to: timestamp::parse("to", &self.to)?,
        })
    }
}

/// Random 32-character alphanumeric resource ID
pub fn synthetic_id() -> String {
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(from: Option<&str>, to: Option<&str>) -> OccurrenceConfig {
        OccurrenceConfig {
            maintenance_id: 42,
            effective_from: "2066-01-02T22:00:00+08:00".to_string(),
            effective_to: "2066-01-09T22:00:00+08:00".to_string(),
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    #[test]
    fn test_target_window_both_or_neither() {
        assert_eq!(config(None, None).target_window().unwrap(), None);
        assert_eq!(config(Some(""), Some("")).target_window().unwrap(), None);

        let window = config(Some("1970-01-01T00:01:40Z"), Some("1970-01-01T00:03:20Z"))
            .target_window()
            .unwrap();
        assert_eq!(window, Some(OccurrenceWindow { from: 100, to: 200 }));
    }

    #[test]
    fn test_target_window_asymmetric() {
        let err = config(Some("2066-01-02T22:00:00+08:00"), Some(""))
            .target_window()
            .unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
        let message = err.to_string();
        assert!(message.contains("must be provided at the same time"));

        let only_to = config(None, Some("2066-01-02T22:00:00+08:00"));
        assert!(only_to.target_window().is_err());
    }

    #[test]
    fn test_query_parses_effective_range() {
        let query = config(None, None).query().unwrap();
        assert_eq!(query.maintenance_id, 42);
        assert_eq!(query.to - query.from, 7 * 24 * 3600);
    }

    #[test]
    fn test_query_rejects_bad_timestamp() {
        let mut cfg = config(None, None);
        cfg.effective_to = "next week".to_string();
        assert!(matches!(
            cfg.query(),
            Err(ProviderError::InvalidTimestamp {
                attribute: "effective_to",
                ..
            })
        ));
    }

    #[test]
    fn test_synthetic_id() {
        let a = synthetic_id();
        let b = synthetic_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_config_decodes_without_window() {
        let cfg: OccurrenceConfig = serde_json::from_value(serde_json::json!({
            "maintenance_id": 42,
            "effective_from": "2066-01-02T22:00:00+08:00",
            "effective_to": "2066-01-09T22:00:00+08:00"
        }))
        .unwrap();
        assert_eq!(cfg.from, None);
        assert_eq!(cfg.to, None);
    }
}
