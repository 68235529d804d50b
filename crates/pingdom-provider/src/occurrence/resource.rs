//! Lifecycle callbacks for `pingdom_occurrence`

use super::{
    OccurrenceConfig, OccurrenceGroup, OccurrenceState, RESOURCE_TYPE, asymmetric_window,
    synthetic_id,
};
use crate::error::{ProviderError, Result};
use crate::lifecycle::{Outcome, Resource};
use async_trait::async_trait;
use pingdom_api::{OccurrenceApi, OccurrenceWindow};
use std::sync::Arc;

/// Occurrence group resource
pub struct OccurrenceResource {
    api: Arc<dyn OccurrenceApi>,
}

impl OccurrenceResource {
    pub fn new(api: Arc<dyn OccurrenceApi>) -> Self {
        Self { api }
    }

    fn group(&self, query: pingdom_api::OccurrenceQuery) -> OccurrenceGroup {
        OccurrenceGroup::new(Arc::clone(&self.api), query)
    }

    async fn create_state(&self, config: &OccurrenceConfig) -> Result<OccurrenceState> {
        // All local validation happens before the first remote call
        let query = config.query()?;
        let target = config.target_window()?;

        let group = self.group(query);
        let mut state = OccurrenceState::default();
        group.populate(&mut state).await?;
        state.id = synthetic_id();

        if let Some(target) = target
            && state.window()? != target
        {
            tracing::info!(
                "Moving occurrences of maintenance {} to from: {}, to: {} on creation",
                query.maintenance_id,
                target.from,
                target.to
            );
            group.update(target).await?;
            group.populate(&mut state).await?;
        }

        Ok(state)
    }

    async fn read_state(&self, state: &OccurrenceState) -> Result<OccurrenceState> {
        let group = self.group(state.query()?);
        let mut refreshed = state.clone();
        group.populate(&mut refreshed).await?;
        Ok(refreshed)
    }

    async fn update_state(
        &self,
        prior: &OccurrenceState,
        config: &OccurrenceConfig,
    ) -> Result<OccurrenceState> {
        if let Some(attribute) = self.requires_replace(prior, config).first().copied() {
            return Err(ProviderError::RequiresReplacement {
                attribute,
                old: prior.maintenance_id.to_string(),
                new: config.maintenance_id.to_string(),
            });
        }

        let query = config.query()?;
        let prior_query = prior.query()?;
        let effective_changed = query.from != prior_query.from || query.to != prior_query.to;
        let target = window_change(prior, config)?;

        let group = self.group(query);
        let mut state = prior.clone();

        if effective_changed {
            tracing::debug!(
                "Effective range changed, retrieve occurrences with query: {}",
                query
            );
            group.populate(&mut state).await?;
        }

        if let Some(target) = target {
            tracing::debug!("Occurrence update from: {}, to: {}", target.from, target.to);
            group.update(target).await?;
        }

        if effective_changed || target.is_some() {
            group.populate(&mut state).await?;
        }

        Ok(state)
    }

    async fn delete_state(&self, state: &OccurrenceState) -> Result<()> {
        self.group(state.query()?).delete().await
    }
}

/// New window when the configured `from`/`to` differ from the stored ones
///
/// An unset attribute keeps its stored value and does not count as a change.
/// Once either side changes, both must be set.
fn window_change(
    prior: &OccurrenceState,
    config: &OccurrenceConfig,
) -> Result<Option<OccurrenceWindow>> {
    let (from, to) = config.window_parts()?;
    let stored = prior.window()?;

    let changed = from.is_some_and(|f| f != stored.from) || to.is_some_and(|t| t != stored.to);
    if !changed {
        return Ok(None);
    }

    match (from, to) {
        (Some(from), Some(to)) => Ok(Some(OccurrenceWindow { from, to })),
        (from, to) => Err(asymmetric_window(from, to)),
    }
}

#[async_trait]
impl Resource for OccurrenceResource {
    type Config = OccurrenceConfig;
    type State = OccurrenceState;

    fn type_name(&self) -> &str {
        RESOURCE_TYPE
    }

    fn requires_replace(
        &self,
        prior: &OccurrenceState,
        config: &OccurrenceConfig,
    ) -> Vec<&'static str> {
        if prior.maintenance_id != config.maintenance_id {
            vec!["maintenance_id"]
        } else {
            Vec::new()
        }
    }

    async fn create(&self, config: &OccurrenceConfig) -> Outcome<OccurrenceState> {
        Ok(self.create_state(config).await?)
    }

    async fn read(&self, state: &OccurrenceState) -> Outcome<OccurrenceState> {
        Ok(self.read_state(state).await?)
    }

    async fn update(
        &self,
        prior: &OccurrenceState,
        config: &OccurrenceConfig,
    ) -> Outcome<OccurrenceState> {
        Ok(self.update_state(prior, config).await?)
    }

    async fn delete(&self, state: &OccurrenceState) -> Outcome<()> {
        Ok(self.delete_state(state).await?)
    }
}
