//! Wire types for the maintenance and occurrence endpoints

use serde::{Deserialize, Serialize};

/// One concrete instance of a recurring maintenance window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: i64,
    #[serde(rename = "maintenanceid")]
    pub maintenance_id: i64,
    /// Start, epoch seconds
    pub from: i64,
    /// End, epoch seconds
    pub to: i64,
}

/// Query against `/maintenance.occurrences`
///
/// Matches every occurrence of `maintenance_id` intersecting `[from, to]`.
/// Zero-valued fields are left out of the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceQuery {
    pub maintenance_id: i64,
    pub from: i64,
    pub to: i64,
}

impl OccurrenceQuery {
    pub fn new(maintenance_id: i64, from: i64, to: i64) -> Self {
        Self {
            maintenance_id,
            from,
            to,
        }
    }

    /// Query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        [
            ("maintenanceid", self.maintenance_id),
            ("from", self.from),
            ("to", self.to),
        ]
        .iter()
        .filter(|(_, v)| *v != 0)
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
    }
}

impl std::fmt::Display for OccurrenceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "maintenance_id={}, from={}, to={}",
            self.maintenance_id, self.from, self.to
        )
    }
}

/// New time window for an occurrence, epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceWindow {
    pub from: i64,
    pub to: i64,
}

/// Maintenance window as returned by `/maintenance`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub id: i64,
    pub description: String,
    pub from: i64,
    pub to: i64,
    #[serde(rename = "recurrencetype", default)]
    pub recurrence_type: String,
    #[serde(rename = "repeatevery", default)]
    pub repeat_every: i64,
    #[serde(rename = "effectiveto", default)]
    pub effective_to: i64,
    #[serde(default)]
    pub checks: MaintenanceChecks,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceChecks {
    #[serde(default)]
    pub uptime: Vec<i64>,
    #[serde(default)]
    pub tms: Vec<i64>,
}

// ============ Response envelopes ============

#[derive(Debug, Deserialize)]
pub(crate) struct OccurrencesResponse {
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MaintenanceResponse {
    pub maintenance: MaintenanceWindow,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MaintenanceListResponse {
    #[serde(default)]
    pub maintenance: Vec<MaintenanceWindow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[allow(dead_code)]
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "statuscode")]
    pub status_code: u16,
    #[serde(rename = "statusdesc", default)]
    pub status_desc: String,
    #[serde(rename = "errormessage", default)]
    pub error_message: String,
}
