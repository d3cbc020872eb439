//! Migration sequence

use super::context::{MigrationContext, MigrationOutcome};
use crate::control_plane::ControlPlane;
use crate::error::{Error, Result, ResultExt};
use crate::prompt::Prompter;
use crate::review::ReviewFlow;
use crate::transform::transform;
use tracing::{info, warn};

/// Run one migration end to end
///
/// Fetches the legacy connector, warns when it is not paused, carries its
/// offsets forward and creates the replacement once the operator has
/// reviewed and confirmed the new config. Creation is attempted at most once.
pub async fn migrate(
    ctx: &mut MigrationContext,
    control_plane: &dyn ControlPlane,
    prompter: &mut dyn Prompter,
) -> Result<MigrationOutcome> {
    let name = ctx.connector_name.clone();
    let kind = ctx.kind;

    prompter.say(&format!("Fetching {kind} connector '{name}'..."));
    let legacy = control_plane
        .fetch_connector_status(&name)
        .await
        .context("fetching legacy connector")?;
    prompter.say(&format!("Connector status for {name}: {}", legacy.state));

    if !legacy.state.is_paused() {
        warn!("Legacy connector '{name}' is {}", legacy.state);
        let proceed = prompter.confirm(
            "The connector is not paused. There might be data duplication in the end system \
             if you continue. Do you still want to proceed?",
        )?;
        if !proceed {
            return Err(Error::cancelled("legacy connector is not paused"));
        }
    }
    let legacy_config = legacy.config.clone();
    ctx.legacy = Some(legacy);

    prompter.say("Fetching legacy connector offsets...");
    let offsets = control_plane
        .fetch_offsets(&name)
        .await
        .context("fetching legacy offsets")?;
    if let Some(count) = offsets.partition_count() {
        info!("Carrying forward offsets for {count} partitions");
    }
    ctx.offsets = Some(offsets.clone());

    prompter.say(&format!("Transforming config to {}...", kind.target_class()));
    let transformation =
        transform(&legacy_config, kind, &ctx.options).context("transforming config")?;

    let reviewed = ReviewFlow::new(kind, name.clone(), transformation)
        .run(prompter)
        .context("reviewing config")?;
    ctx.draft = Some(reviewed.config.clone());

    prompter.say(&format!(
        "Creating connector '{}' with the offsets of '{name}'...",
        reviewed.name
    ));
    let connector_id = control_plane
        .create_connector(&reviewed.name, &reviewed.config, &offsets)
        .await
        .context("creating connector")?;

    info!("Created connector '{}' ({connector_id})", reviewed.name);
    prompter.say(&format!(
        "✅ Connector '{}' created with id {connector_id}",
        reviewed.name
    ));

    Ok(MigrationOutcome {
        connector_id,
        connector_name: reviewed.name,
    })
}
