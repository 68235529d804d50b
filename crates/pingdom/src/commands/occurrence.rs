use crate::QueryArgs;
use crate::utils::{self, Context};
use colored::Colorize;
use pingdom_api::OccurrenceApi;
use pingdom_provider::{
    Action, ActionType, OccurrenceConfig, OccurrenceGroup, OccurrenceResource, OccurrenceState,
    RESOURCE_TYPE, Resource, StateFile, timestamp,
};
use std::sync::Arc;

pub fn config_from_args(
    query: QueryArgs,
    from: Option<String>,
    to: Option<String>,
) -> OccurrenceConfig {
    OccurrenceConfig {
        maintenance_id: query.maintenance_id,
        effective_from: query.effective_from,
        effective_to: query.effective_to,
        from,
        to,
    }
}

fn resource(ctx: &Context) -> anyhow::Result<OccurrenceResource> {
    let api: Arc<dyn OccurrenceApi> = ctx.client()?;
    Ok(OccurrenceResource::new(api))
}

fn stored(state: &StateFile, name: &str) -> anyhow::Result<OccurrenceState> {
    state.get_typed(RESOURCE_TYPE, name)?.ok_or_else(|| {
        anyhow::anyhow!(
            "no stored state for {}; run `pingdom occurrence apply {}` first",
            StateFile::key(RESOURCE_TYPE, name),
            name
        )
    })
}

fn print_state(state: &OccurrenceState) {
    utils::print_fields(&[
        ("id", state.id.clone()),
        ("maintenance_id", state.maintenance_id.to_string()),
        ("effective_from", state.effective_from.clone()),
        ("effective_to", state.effective_to.clone()),
        ("from", state.from.clone()),
        ("to", state.to.clone()),
        ("size", state.size.to_string()),
    ]);
}

pub async fn handle_apply(
    ctx: &Context,
    name: &str,
    config: OccurrenceConfig,
    replace: bool,
) -> anyhow::Result<()> {
    let manager = ctx.state_manager();
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;
    let prior: Option<OccurrenceState> = state.get_typed(RESOURCE_TYPE, name)?;

    // Malformed input for a new group is rejected before credentials are needed
    if prior.is_none() {
        config.query()?;
        config.target_window()?;
    }

    let resource = resource(ctx)?;
    let action = Action::plan(&resource, name, prior.as_ref(), &config);
    println!("{} {}", "Planned:".blue(), action);

    let (applied, new_state) = match prior {
        None => (
            ActionType::Create,
            utils::check("create", resource.create(&config).await)?,
        ),
        Some(prior) if action.action_type == ActionType::Replace => {
            if !replace {
                anyhow::bail!(
                    "{} cannot be changed in place; rerun with --replace to delete and recreate the group",
                    action.replaced_by.join(", ")
                );
            }
            utils::check("delete", resource.delete(&prior).await)?;
            state.remove(RESOURCE_TYPE, name);
            manager.save(&state).await?;

            (
                ActionType::Replace,
                utils::check("create", resource.create(&config).await)?,
            )
        }
        Some(prior) => {
            let updated = utils::check("update", resource.update(&prior, &config).await)?;
            let applied = if updated == prior {
                ActionType::NoOp
            } else {
                ActionType::Update
            };
            (applied, updated)
        }
    };

    state.set_typed(RESOURCE_TYPE, name, &new_state)?;
    manager.save(&state).await?;
    lock.release().await?;

    println!(
        "{} {} {}",
        "✓".green(),
        applied,
        StateFile::key(RESOURCE_TYPE, name).cyan()
    );
    print_state(&new_state);
    Ok(())
}

pub async fn handle_refresh(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let manager = ctx.state_manager();
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;
    let prior = stored(&state, name)?;

    let resource = resource(ctx)?;
    let refreshed = utils::check("refresh", resource.read(&prior).await)?;

    if refreshed != prior {
        println!(
            "{}",
            "Remote occurrences drifted from stored state".yellow()
        );
    }

    state.set_typed(RESOURCE_TYPE, name, &refreshed)?;
    manager.save(&state).await?;
    lock.release().await?;

    print_state(&refreshed);
    Ok(())
}

pub async fn handle_destroy(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let manager = ctx.state_manager();
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;
    let prior = stored(&state, name)?;

    let resource = resource(ctx)?;
    println!(
        "{} {} occurrences of maintenance {}",
        "Deleting".red(),
        prior.size,
        prior.maintenance_id
    );
    utils::check("delete", resource.delete(&prior).await)?;

    state.remove(RESOURCE_TYPE, name);
    manager.save(&state).await?;
    lock.release().await?;

    println!(
        "{} destroyed {}",
        "✓".green(),
        StateFile::key(RESOURCE_TYPE, name).cyan()
    );
    Ok(())
}

pub async fn handle_show(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let state = ctx.state_manager().load().await?;
    let entry = state.get(RESOURCE_TYPE, name).ok_or_else(|| {
        anyhow::anyhow!(
            "no stored state for {}",
            StateFile::key(RESOURCE_TYPE, name)
        )
    })?;

    println!("{}", StateFile::key(RESOURCE_TYPE, name).cyan().bold());
    print_state(&entry.decode()?);
    println!(
        "  {}",
        format!(
            "created {}, updated {}",
            entry.created_at.to_rfc3339(),
            entry.updated_at.to_rfc3339()
        )
        .dimmed()
    );
    Ok(())
}

pub async fn handle_list(ctx: &Context, config: &OccurrenceConfig) -> anyhow::Result<()> {
    let query = config.query()?;
    let api: Arc<dyn OccurrenceApi> = ctx.client()?;
    let occurrences = OccurrenceGroup::new(api, query).list().await?;

    if occurrences.is_empty() {
        println!("{}", format!("No occurrences match {query}").dimmed());
        return Ok(());
    }

    println!(
        "{}",
        format!("{:<12} {:<22} {:<22}", "ID", "FROM", "TO").bold()
    );
    for occurrence in &occurrences {
        let from = timestamp::format(occurrence.from)?;
        let to = timestamp::format(occurrence.to)?;
        println!("{:<12} {:<22} {:<22}", occurrence.id, from, to);
    }
    println!();
    println!("{} occurrences", occurrences.len());
    Ok(())
}
