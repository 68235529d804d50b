//! Resource lifecycle traits and diagnostics
//!
//! Resources and data sources are driven by a host through these traits. Each
//! callback receives typed configuration/state and reports failure as a list
//! of diagnostics.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Managed resource with the four lifecycle callbacks
#[async_trait]
pub trait Resource: Send + Sync {
    /// User-supplied configuration, decoded once at the boundary
    type Config: Send + Sync;

    /// Persisted state
    type State: Send + Sync;

    /// Resource type name (e.g. "pingdom_occurrence")
    fn type_name(&self) -> &str;

    /// Attributes whose change cannot be applied in place
    fn requires_replace(&self, prior: &Self::State, config: &Self::Config) -> Vec<&'static str>;

    async fn create(&self, config: &Self::Config) -> Outcome<Self::State>;

    /// Refresh state from the remote service
    async fn read(&self, state: &Self::State) -> Outcome<Self::State>;

    async fn update(&self, prior: &Self::State, config: &Self::Config) -> Outcome<Self::State>;

    async fn delete(&self, state: &Self::State) -> Outcome<()>;
}

/// Read-only data source
#[async_trait]
pub trait DataSource: Send + Sync {
    type Config: Send + Sync;
    type State: Send + Sync;

    fn type_name(&self) -> &str;

    async fn read(&self, config: &Self::Config) -> Outcome<Self::State>;
}

pub type Outcome<T> = std::result::Result<T, Diagnostics>;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: Option<String>,
}

/// List of diagnostics returned by a lifecycle callback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(summary: impl Into<String>) -> Self {
        let mut diags = Self::new();
        diags.push(Severity::Error, summary, None);
        diags
    }

    pub fn push(&mut self, severity: Severity, summary: impl Into<String>, detail: Option<String>) {
        self.items.push(Diagnostic {
            severity,
            summary: summary.into(),
            detail,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl From<ProviderError> for Diagnostics {
    fn from(err: ProviderError) -> Self {
        let mut detail = Vec::new();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            detail.push(cause.to_string());
            source = cause.source();
        }

        let mut diags = Self::new();
        diags.push(
            Severity::Error,
            err.to_string(),
            (!detail.is_empty()).then(|| detail.join(": ")),
        );
        diags
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, d) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", d.severity, d.summary)?;
            if let Some(detail) = &d.detail {
                write!(f, " ({detail})")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
