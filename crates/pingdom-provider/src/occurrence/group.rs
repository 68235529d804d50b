//! Occurrence group reconciler
//!
//! A group is every occurrence of a maintenance window that intersects a time
//! range. It has no identity on the Pingdom side, so every operation starts by
//! re-issuing the query. Bulk operations fan out one task per matched
//! occurrence and report the first failure.

use super::OccurrenceState;
use crate::error::{ProviderError, Result};
use crate::timestamp;
use pingdom_api::{Occurrence, OccurrenceApi, OccurrenceQuery, OccurrenceWindow};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Operation broadcast to every occurrence in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupOp {
    Update(OccurrenceWindow),
    Delete,
}

impl GroupOp {
    async fn apply(self, api: &dyn OccurrenceApi, occurrence_id: i64) -> pingdom_api::Result<()> {
        match self {
            GroupOp::Update(window) => api.update_occurrence(occurrence_id, window).await,
            GroupOp::Delete => api.delete_occurrence(occurrence_id).await,
        }
    }
}

impl std::fmt::Display for GroupOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupOp::Update(w) => write!(f, "update (from={}, to={})", w.from, w.to),
            GroupOp::Delete => write!(f, "delete"),
        }
    }
}

/// Query-addressed set of maintenance occurrences
#[derive(Clone)]
pub struct OccurrenceGroup {
    api: Arc<dyn OccurrenceApi>,
    query: OccurrenceQuery,
}

impl OccurrenceGroup {
    pub fn new(api: Arc<dyn OccurrenceApi>, query: OccurrenceQuery) -> Self {
        Self { api, query }
    }

    /// All occurrences currently matching the query
    pub async fn list(&self) -> Result<Vec<Occurrence>> {
        tracing::debug!("Retrieve occurrences with query: {}", self.query);
        Ok(self.api.list_occurrences(&self.query).await?)
    }

    /// First matching occurrence (service order) and the match count
    ///
    /// An empty match is an error: there is nothing to observe.
    pub async fn sample(&self) -> Result<(Occurrence, usize)> {
        let mut occurrences = self.list().await?;
        if occurrences.is_empty() {
            return Err(ProviderError::NoOccurrences { query: self.query });
        }
        let size = occurrences.len();
        Ok((occurrences.swap_remove(0), size))
    }

    /// Write the observed attributes into `state`
    ///
    /// `state` is left untouched when sampling or formatting fails.
    pub async fn populate(&self, state: &mut OccurrenceState) -> Result<()> {
        let (sample, size) = self.sample().await?;

        let from = timestamp::format(sample.from)?;
        let to = timestamp::format(sample.to)?;
        let effective_from = timestamp::format(self.query.from)?;
        let effective_to = timestamp::format(self.query.to)?;

        state.from = from;
        state.to = to;
        state.effective_from = effective_from;
        state.effective_to = effective_to;
        state.maintenance_id = self.query.maintenance_id;
        state.size = size;
        Ok(())
    }

    pub async fn size(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    pub async fn must_exist(&self) -> Result<()> {
        if self.size().await? == 0 {
            return Err(ProviderError::NoOccurrences { query: self.query });
        }
        Ok(())
    }

    /// Move every matched occurrence to the same window
    pub async fn update(&self, window: OccurrenceWindow) -> Result<()> {
        self.group_op(GroupOp::Update(window)).await
    }

    /// Delete every matched occurrence
    pub async fn delete(&self) -> Result<()> {
        self.group_op(GroupOp::Delete).await
    }

    /// Fan `op` out over the current match set
    ///
    /// The first failure cancels tasks that have not yet issued their call and
    /// is returned immediately. Calls already in flight run to completion; the
    /// result channel holds one slot per task so their sends never block.
    async fn group_op(&self, op: GroupOp) -> Result<()> {
        let occurrences = self.list().await?;
        let total = occurrences.len();
        if total == 0 {
            tracing::debug!("No occurrences to {} for query: {}", op, self.query);
            return Ok(());
        }

        tracing::info!(
            "Applying {} to {} occurrences of maintenance {}",
            op,
            total,
            self.query.maintenance_id
        );

        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(total);

        for occurrence in occurrences {
            let api = Arc::clone(&self.api);
            let cancel = cancel.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if cancel.is_cancelled() {
                    tracing::debug!(
                        "Skipping occurrence {} after earlier failure",
                        occurrence.id
                    );
                    return;
                }
                let result = op.apply(api.as_ref(), occurrence.id).await;
                let _ = tx.try_send((occurrence.id, result));
            });
        }
        drop(tx);

        let mut succeeded = 0;
        while succeeded < total {
            match rx.recv().await {
                Some((_, Ok(()))) => succeeded += 1,
                Some((occurrence_id, Err(e))) => {
                    cancel.cancel();
                    tracing::warn!(
                        "Occurrence {} {} failed after {}/{} succeeded: {}",
                        occurrence_id,
                        op,
                        succeeded,
                        total,
                        e
                    );
                    return Err(e.into());
                }
                None => {
                    cancel.cancel();
                    return Err(ProviderError::TaskAborted {
                        reported: succeeded,
                        expected: total,
                    });
                }
            }
        }

        tracing::debug!("{} applied to all {} occurrences", op, total);
        Ok(())
    }
}
