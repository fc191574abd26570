//! `project-draft`: load a project into a form controller and print the
//! payload a save would submit, without saving.
//!
//! Usage: `project-draft [PROJECT_ID]`. Without an id an empty create-mode
//! draft is used.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verdant_client::{ClientConfig, HttpCollaborator};
use verdant_forms::project::ProjectForm;
use verdant_forms::{EntityForm, FormController, FormErrorKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdant_forms=debug,verdant_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Arguments ---
    let project_id = match std::env::args().nth(1) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .with_context(|| format!("PROJECT_ID must be a whole number, got '{raw}'"))?,
        ),
        None => None,
    };

    // --- Configuration ---
    let config = ClientConfig::from_env().context("Failed to load client configuration")?;
    tracing::info!(
        base_url = %config.base_url,
        authenticated = config.session.is_some(),
        "Loaded client configuration"
    );

    let client = Arc::new(HttpCollaborator::new(&config).context("Failed to build HTTP client")?);

    // --- Form ---
    let form: FormController<ProjectForm, HttpCollaborator> =
        FormController::new(client, project_id);
    form.mount().await;

    let state = form.snapshot().await;
    if let Some(err) = &state.last_error {
        tracing::warn!(kind = ?err.kind, message = %err.message, "Form reported an error");
    }
    if let (Some(id), Some(FormErrorKind::HydrationFailure)) =
        (project_id, state.last_error.as_ref().map(|e| e.kind))
    {
        bail!("Could not load project {id}");
    }

    tracing::info!(
        name = %state.draft.name,
        phases = state.draft.phases.len(),
        allocated_trees = state.draft.allocated_tree_total(),
        species_available = state.references.len(),
        "Draft ready"
    );

    let payload = ProjectForm::to_payload(&state.draft).context("Draft is not submittable")?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    form.unmount();
    Ok(())
}
