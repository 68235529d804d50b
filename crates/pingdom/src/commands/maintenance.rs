use crate::utils::{self, Context};
use colored::Colorize;
use pingdom_api::MaintenanceApi;
use pingdom_provider::{DataSource, MaintenanceWindowConfig, MaintenanceWindowDataSource};
use std::sync::Arc;

fn data_source(ctx: &Context) -> anyhow::Result<MaintenanceWindowDataSource> {
    let api: Arc<dyn MaintenanceApi> = ctx.client()?;
    Ok(MaintenanceWindowDataSource::new(api))
}

fn join_ids(ids: &[i64]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn handle_show(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let source = data_source(ctx)?;
    let window = utils::check("read", source.read(&MaintenanceWindowConfig { id }).await)?;

    println!("{}", window.description.cyan().bold());
    utils::print_fields(&[
        ("id", window.id.to_string()),
        ("from", window.from.clone()),
        ("to", window.to.clone()),
        (
            "recurrence",
            format!("{} (every {})", window.recurrence_type, window.repeat_every),
        ),
        (
            "effective_to",
            window.effective_to.as_deref().unwrap_or("-").to_string(),
        ),
        ("uptime checks", join_ids(&window.uptime_ids)),
        ("tms checks", join_ids(&window.tms_ids)),
    ]);
    Ok(())
}

pub async fn handle_list(ctx: &Context) -> anyhow::Result<()> {
    let windows = data_source(ctx)?.list().await?;

    if windows.is_empty() {
        println!("{}", "No maintenance windows".dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:<10} {:<22} {:<22} {:<8} {}",
            "ID", "FROM", "TO", "REPEAT", "DESCRIPTION"
        )
        .bold()
    );
    for window in &windows {
        println!(
            "{:<10} {:<22} {:<22} {:<8} {}",
            window.id, window.from, window.to, window.recurrence_type, window.description
        );
    }
    Ok(())
}
