//! `pingdom_maintenance_window` data source
//!
//! Read-only view of a maintenance window, used to discover the ID and
//! effective range an occurrence group should be built from.

use crate::error::{ProviderError, Result};
use crate::lifecycle::{DataSource, Outcome};
use crate::timestamp;
use async_trait::async_trait;
use pingdom_api::{MaintenanceApi, MaintenanceWindow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DATA_SOURCE_TYPE: &str = "pingdom_maintenance_window";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindowConfig {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindowState {
    pub id: i64,
    pub description: String,
    pub from: String,
    pub to: String,
    pub recurrence_type: String,
    pub repeat_every: i64,
    /// Unset for non-recurring windows
    pub effective_to: Option<String>,
    pub uptime_ids: Vec<i64>,
    pub tms_ids: Vec<i64>,
}

impl TryFrom<MaintenanceWindow> for MaintenanceWindowState {
    type Error = ProviderError;

    fn try_from(window: MaintenanceWindow) -> Result<Self> {
        let effective_to = match window.effective_to {
            0 => None,
            epoch => Some(timestamp::format(epoch)?),
        };

        Ok(Self {
            id: window.id,
            description: window.description,
            from: timestamp::format(window.from)?,
            to: timestamp::format(window.to)?,
            recurrence_type: window.recurrence_type,
            repeat_every: window.repeat_every,
            effective_to,
            uptime_ids: window.checks.uptime,
            tms_ids: window.checks.tms,
        })
    }
}

pub struct MaintenanceWindowDataSource {
    api: Arc<dyn MaintenanceApi>,
}

impl MaintenanceWindowDataSource {
    pub fn new(api: Arc<dyn MaintenanceApi>) -> Self {
        Self { api }
    }

    /// Every maintenance window on the account
    pub async fn list(&self) -> Result<Vec<MaintenanceWindowState>> {
        let windows = self.api.list_maintenances().await?;
        tracing::debug!("Retrieved {} maintenance windows", windows.len());
        windows
            .into_iter()
            .map(MaintenanceWindowState::try_from)
            .collect()
    }
}

#[async_trait]
impl DataSource for MaintenanceWindowDataSource {
    type Config = MaintenanceWindowConfig;
    type State = MaintenanceWindowState;

    fn type_name(&self) -> &str {
        DATA_SOURCE_TYPE
    }

    async fn read(&self, config: &MaintenanceWindowConfig) -> Outcome<MaintenanceWindowState> {
        tracing::debug!("Retrieve maintenance window {}", config.id);
        let window = self
            .api
            .get_maintenance(config.id)
            .await
            .map_err(ProviderError::from)?;
        Ok(MaintenanceWindowState::try_from(window)?)
    }
}
