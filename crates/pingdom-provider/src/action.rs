//! Action planning for managed resources

use crate::lifecycle::Resource;
use serde::{Deserialize, Serialize};

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// No stored state yet
    Create,
    /// Apply the configuration in place
    Update,
    /// Delete then create, because an immutable attribute changed
    Replace,
    Delete,
    /// Applied, but nothing changed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Replace => write!(f, "replace"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Planned action for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,
    pub resource_type: String,
    pub name: String,
    /// Attributes forcing a replacement, if any
    pub replaced_by: Vec<String>,
}

impl Action {
    /// Decide how `config` is applied on top of `prior`
    pub fn plan<R: Resource>(
        resource: &R,
        name: &str,
        prior: Option<&R::State>,
        config: &R::Config,
    ) -> Self {
        let (action_type, replaced_by) = match prior {
            None => (ActionType::Create, Vec::new()),
            Some(prior) => {
                let attributes = resource.requires_replace(prior, config);
                if attributes.is_empty() {
                    (ActionType::Update, Vec::new())
                } else {
                    (
                        ActionType::Replace,
                        attributes.into_iter().map(str::to_string).collect(),
                    )
                }
            }
        };

        Self {
            action_type,
            resource_type: resource.type_name().to_string(),
            name: name.to_string(),
            replaced_by,
        }
    }

    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.action_type, self.address())?;
        if !self.replaced_by.is_empty() {
            write!(f, " (forced by {})", self.replaced_by.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occurrence::{OccurrenceConfig, OccurrenceResource, OccurrenceState};
    use crate::testing::FakeOccurrenceApi;
    use std::sync::Arc;

    fn config(maintenance_id: i64) -> OccurrenceConfig {
        OccurrenceConfig {
            maintenance_id,
            effective_from: "2066-01-02T22:00:00+08:00".to_string(),
            effective_to: "2066-01-09T22:00:00+08:00".to_string(),
            from: None,
            to: None,
        }
    }

    fn prior(maintenance_id: i64) -> OccurrenceState {
        OccurrenceState {
            maintenance_id,
            ..Default::default()
        }
    }

    #[test]
    fn test_plan() {
        let resource = OccurrenceResource::new(Arc::new(FakeOccurrenceApi::new()));

        let create = Action::plan(&resource, "weekly", None, &config(42));
        assert_eq!(create.action_type, ActionType::Create);
        assert_eq!(create.to_string(), "create pingdom_occurrence.weekly");

        let update = Action::plan(&resource, "weekly", Some(&prior(42)), &config(42));
        assert_eq!(update.action_type, ActionType::Update);

        let replace = Action::plan(&resource, "weekly", Some(&prior(42)), &config(43));
        assert_eq!(replace.action_type, ActionType::Replace);
        assert_eq!(
            replace.to_string(),
            "replace pingdom_occurrence.weekly (forced by maintenance_id)"
        );
    }
}
