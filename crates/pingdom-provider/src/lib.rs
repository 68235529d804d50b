//! Pingdom maintenance resources
//!
//! Pingdom expands a recurring maintenance window into individual
//! occurrences. This crate manages a group of those occurrences as a single
//! resource: the group is addressed by a query (maintenance ID plus an
//! effective time range) and bulk operations are applied to every match
//! concurrently.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  pingdom CLI                     │
//! │        (occurrence apply/refresh/destroy)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               pingdom-provider                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │   Resource / DataSource lifecycle         │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ Occurrence   │  │  State Mgmt  │            │
//! │  │ group fanout │  │              │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │  pingdom-api  │
//! │  REST client  │
//! └───────────────┘
//! ```

pub mod action;
pub mod error;
pub mod lifecycle;
pub mod maintenance;
pub mod occurrence;
pub mod state;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use action::{Action, ActionType};
pub use error::{ProviderError, Result};
pub use lifecycle::{DataSource, Diagnostic, Diagnostics, Outcome, Resource, Severity};
pub use maintenance::{MaintenanceWindowConfig, MaintenanceWindowDataSource, MaintenanceWindowState};
pub use occurrence::{
    OccurrenceConfig, OccurrenceGroup, OccurrenceResource, OccurrenceState, RESOURCE_TYPE,
};
pub use state::{ResourceEntry, StateFile, StateLock, StateManager};
