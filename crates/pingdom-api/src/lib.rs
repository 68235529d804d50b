//! Pingdom API client
//!
//! Typed access to the Pingdom 3.1 REST API for the parts the provider
//! manages: maintenance windows and their occurrences.
//!
//! # Example
//!
//! ```ignore
//! use pingdom_api::{OccurrenceApi, OccurrenceQuery, PingdomClient};
//! use pingdom_config::ProviderConfig;
//!
//! let config = ProviderConfig::load(None)?;
//! let client = PingdomClient::new(&config)?;
//!
//! let query = OccurrenceQuery::new(42, 1_700_000_000, 1_700_600_000);
//! for occurrence in client.list_occurrences(&query).await? {
//!     println!("{} {}..{}", occurrence.id, occurrence.from, occurrence.to);
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod service;

pub use client::PingdomClient;
pub use error::{ApiError, Result};
pub use models::{
    MaintenanceChecks, MaintenanceWindow, Occurrence, OccurrenceQuery, OccurrenceWindow,
};
pub use service::{MaintenanceApi, OccurrenceApi};
