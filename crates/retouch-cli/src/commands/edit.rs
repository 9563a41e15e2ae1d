//! One-shot edit command

use crate::config::SettingsManager;
use crate::export::DirectoryTarget;
use anyhow::Result;
use colored::Colorize;
use retouch_core::workflow::EDIT_FAILURE_MESSAGE;
use retouch_core::{ImageResource, Submission};
use std::path::PathBuf;

pub struct EditOptions {
    pub image: PathBuf,
    pub prompt: String,
    pub output: Option<PathBuf>,
    pub mime: Option<String>,
}

pub async fn execute(options: EditOptions) -> Result<()> {
    let (workflow, settings) = super::build_workflow()?;
    let observer = super::watch_state(workflow.subscribe());

    let resource = match options.mime {
        Some(mime) => ImageResource::new(&options.image, mime),
        None => ImageResource::from_path(&options.image),
    };

    println!(
        "{} {} ({})",
        "🖼  Loading".blue().bold(),
        resource.path.display(),
        resource.media_type.dimmed()
    );
    if !workflow.open_image(&resource).await {
        anyhow::bail!("{}", last_error(&workflow));
    }

    workflow.set_prompt(options.prompt);

    let bar = super::spinner("Editing image...");
    let submission = workflow.submit().await;
    bar.finish_and_clear();

    let edited = match &submission {
        Submission::Completed(outcome) => match outcome.artifact() {
            Some(artifact) => artifact,
            None => anyhow::bail!("{}", last_error(&workflow)),
        },
        Submission::Rejected => anyhow::bail!("{}", last_error(&workflow)),
        Submission::Busy => anyhow::bail!("An edit is already in progress"),
        Submission::Superseded => anyhow::bail!("The image changed while it was being edited"),
    };
    println!(
        "{} {}",
        "✨ Edited".green().bold(),
        edited
            .embedded_media_type()
            .unwrap_or(&edited.media_type)
            .dimmed()
    );

    let target = DirectoryTarget::new(SettingsManager::output_dir(
        &settings,
        options.output.as_deref(),
    ));
    if let Some(file_name) = workflow.download(&target).await? {
        println!(
            "{} {}",
            "✅ Saved".green().bold(),
            target.path_for(&file_name).display().to_string().cyan()
        );
    }

    drop(workflow);
    let _ = observer.await;

    Ok(())
}

fn last_error(workflow: &retouch_core::EditWorkflow) -> String {
    workflow
        .snapshot()
        .last_error
        .unwrap_or_else(|| EDIT_FAILURE_MESSAGE.to_string())
}
