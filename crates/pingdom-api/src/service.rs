//! Service traits implemented by the REST client
//!
//! The provider talks to Pingdom only through these traits so that the
//! reconciler can be driven by any backend.

use crate::error::Result;
use crate::models::{MaintenanceWindow, Occurrence, OccurrenceQuery, OccurrenceWindow};
use async_trait::async_trait;

/// Maintenance occurrence endpoints
#[async_trait]
pub trait OccurrenceApi: Send + Sync {
    /// List occurrences matching the query, in the order the service returns them
    async fn list_occurrences(&self, query: &OccurrenceQuery) -> Result<Vec<Occurrence>>;

    /// Move a single occurrence to a new time window
    async fn update_occurrence(&self, id: i64, window: OccurrenceWindow) -> Result<()>;

    /// Delete a single occurrence
    async fn delete_occurrence(&self, id: i64) -> Result<()>;
}

/// Maintenance window read endpoints
#[async_trait]
pub trait MaintenanceApi: Send + Sync {
    async fn get_maintenance(&self, id: i64) -> Result<MaintenanceWindow>;

    async fn list_maintenances(&self) -> Result<Vec<MaintenanceWindow>>;
}
