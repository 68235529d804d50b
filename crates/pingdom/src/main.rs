mod commands;
mod utils;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pingdom")]
#[command(version, long_about = None)]
#[command(about = "Manage Pingdom maintenance occurrences")]
struct Cli {
    /// Directory holding `.pingdom/state.json`
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Provider config file (defaults to $PINGDOM_CONFIG_PATH, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage groups of maintenance occurrences
    #[command(subcommand)]
    Occurrence(OccurrenceCommands),
    /// Inspect maintenance windows
    #[command(subcommand)]
    Maintenance(MaintenanceCommands),
}

/// Query selecting the occurrences of a group
#[derive(Args, Clone)]
pub struct QueryArgs {
    /// Maintenance window ID
    #[arg(long)]
    maintenance_id: i64,
    /// Start of the effective range (RFC 3339)
    #[arg(long)]
    effective_from: String,
    /// End of the effective range (RFC 3339)
    #[arg(long)]
    effective_to: String,
}

#[derive(Subcommand)]
enum OccurrenceCommands {
    /// Create or update an occurrence group
    Apply {
        /// Local resource name
        name: String,
        #[command(flatten)]
        query: QueryArgs,
        /// New start for every matched occurrence (RFC 3339)
        #[arg(long)]
        from: Option<String>,
        /// New end for every matched occurrence (RFC 3339)
        #[arg(long)]
        to: Option<String>,
        /// Allow delete-then-create when an immutable attribute changed
        #[arg(long)]
        replace: bool,
    },
    /// Re-read a group from Pingdom and store what was observed
    Refresh { name: String },
    /// Delete every occurrence in a group
    Destroy { name: String },
    /// Print the stored state of a group
    Show { name: String },
    /// List occurrences matching a query without storing anything
    List {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Subcommand)]
enum MaintenanceCommands {
    /// Show a maintenance window
    Show { id: i64 },
    /// List all maintenance windows
    List,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = utils::Context::new(cli.project_dir, cli.config);

    match cli.command {
        Commands::Occurrence(cmd) => match cmd {
            OccurrenceCommands::Apply {
                name,
                query,
                from,
                to,
                replace,
            } => {
                let config = commands::occurrence::config_from_args(query, from, to);
                commands::occurrence::handle_apply(&ctx, &name, config, replace).await?;
            }
            OccurrenceCommands::Refresh { name } => {
                commands::occurrence::handle_refresh(&ctx, &name).await?;
            }
            OccurrenceCommands::Destroy { name } => {
                commands::occurrence::handle_destroy(&ctx, &name).await?;
            }
            OccurrenceCommands::Show { name } => {
                commands::occurrence::handle_show(&ctx, &name).await?;
            }
            OccurrenceCommands::List { query } => {
                let config = commands::occurrence::config_from_args(query, None, None);
                commands::occurrence::handle_list(&ctx, &config).await?;
            }
        },
        Commands::Maintenance(cmd) => match cmd {
            MaintenanceCommands::Show { id } => {
                commands::maintenance::handle_show(&ctx, id).await?;
            }
            MaintenanceCommands::List => {
                commands::maintenance::handle_list(&ctx).await?;
            }
        },
    }

    Ok(())
}
