use colored::Colorize;
use pingdom_api::PingdomClient;
use pingdom_config::ProviderConfig;
use pingdom_provider::{Diagnostics, Outcome, Severity, StateManager};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared inputs of every command
pub struct Context {
    project_dir: PathBuf,
    config_path: Option<PathBuf>,
}

impl Context {
    pub fn new(project_dir: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            config_path,
        }
    }

    pub fn state_manager(&self) -> StateManager {
        StateManager::new(&self.project_dir)
    }

    /// Load provider configuration and build the API client
    ///
    /// Deferred until a command actually talks to Pingdom, so local
    /// validation errors surface even without credentials.
    pub fn client(&self) -> anyhow::Result<Arc<PingdomClient>> {
        let config = ProviderConfig::load(self.config_path.as_deref())?;
        tracing::debug!("Using Pingdom API at {}", config.base_url());
        Ok(Arc::new(PingdomClient::new(&config)?))
    }
}

/// Print diagnostics to stderr and turn errors into a failure
pub fn check<T>(operation: &str, outcome: Outcome<T>) -> anyhow::Result<T> {
    outcome.map_err(|diags| {
        print_diagnostics(&diags);
        anyhow::anyhow!("{} failed", operation)
    })
}

pub fn print_diagnostics(diags: &Diagnostics) {
    for d in diags.iter() {
        let label = match d.severity {
            Severity::Error => "Error:".red().bold(),
            Severity::Warning => "Warning:".yellow().bold(),
        };
        eprintln!("{} {}", label, d.summary);
        if let Some(detail) = &d.detail {
            eprintln!("  {}", detail.dimmed());
        }
    }
}

/// Print `key: value` rows with aligned keys
pub fn print_fields(fields: &[(&str, String)]) {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in fields {
        println!("  {}  {}", format!("{key:width$}").bold(), value);
    }
}
