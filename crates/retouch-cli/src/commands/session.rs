//! Interactive editing session

use crate::config::SettingsManager;
use crate::export::DirectoryTarget;
use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Select};
use retouch_core::{EditWorkflow, ImageResource, Submission, WorkflowState};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Open,
    Prompt,
    Submit,
    Regenerate,
    Undo,
    Download,
    Status,
    Quit,
}

impl Action {
    const ALL: [Action; 8] = [
        Action::Open,
        Action::Prompt,
        Action::Submit,
        Action::Regenerate,
        Action::Undo,
        Action::Download,
        Action::Status,
        Action::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::Open => "Open image",
            Action::Prompt => "Set prompt",
            Action::Submit => "Generate",
            Action::Regenerate => "Regenerate",
            Action::Undo => "Undo",
            Action::Download => "Download",
            Action::Status => "Status",
            Action::Quit => "Quit",
        }
    }

    /// Why the action is unavailable in the given state, if it is
    fn blocked_by(self, state: &WorkflowState) -> Option<&'static str> {
        match self {
            Action::Submit | Action::Regenerate if state.in_flight => {
                Some("An edit is already in progress")
            }
            Action::Regenerate if state.edited.is_none() => Some("Nothing to regenerate yet"),
            Action::Undo if state.edited.is_none() && state.last_error.is_none() => {
                Some("Nothing to undo")
            }
            Action::Download if !state.can_download() => Some("No edited image to download"),
            _ => None,
        }
    }
}

pub async fn run(image: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let (workflow, settings) = super::build_workflow()?;
    let observer = super::watch_state(workflow.subscribe());
    let target = DirectoryTarget::new(SettingsManager::output_dir(&settings, output.as_deref()));

    println!("{}", "✨ Retouch session".blue().bold());
    println!("   Output directory: {}", target.dir().display().to_string().dimmed());
    println!();

    if let Some(path) = image {
        open(&workflow, path).await;
    }

    loop {
        let state = workflow.snapshot();
        print_status(&state);

        let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
        let default = if state.can_submit() && state.edited.is_none() {
            2
        } else if state.original.is_none() {
            0
        } else {
            1
        };
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(default)
            .interact()?;
        let action = Action::ALL[choice];

        if let Some(reason) = action.blocked_by(&state) {
            println!("   {}", reason.yellow());
            continue;
        }

        match action {
            Action::Open => {
                let path: String = Input::new().with_prompt("Image path").interact_text()?;
                open(&workflow, PathBuf::from(path.trim())).await;
            }
            Action::Prompt => {
                let prompt: String = Input::new()
                    .with_prompt("Describe the edit")
                    .with_initial_text(state.pending_prompt.clone())
                    .allow_empty(true)
                    .interact_text()?;
                workflow.set_prompt(prompt);
            }
            Action::Submit => {
                let bar = super::spinner("Editing image...");
                let submission = workflow.submit().await;
                bar.finish_and_clear();
                report(&workflow, submission);
            }
            Action::Regenerate => {
                let bar = super::spinner("Regenerating...");
                let submission = workflow.regenerate().await;
                bar.finish_and_clear();
                report(&workflow, submission);
            }
            Action::Undo => {
                workflow.undo();
                println!("   {}", "↩ Edited image discarded".dimmed());
            }
            Action::Download => match workflow.download(&target).await {
                Ok(Some(file_name)) => println!(
                    "   {} {}",
                    "✅ Saved".green(),
                    target.path_for(&file_name).display().to_string().cyan()
                ),
                Ok(None) => println!("   {}", "No edited image to download".yellow()),
                Err(e) => println!("   {} {}", "✗ Could not save:".red(), e),
            },
            Action::Status => print_details(&state),
            Action::Quit => break,
        }
        println!();
    }

    drop(workflow);
    let _ = observer.await;

    Ok(())
}

async fn open(workflow: &EditWorkflow, path: PathBuf) {
    let resource = ImageResource::from_path(path);
    if workflow.open_image(&resource).await {
        println!(
            "   {} {} ({})",
            "✓ Loaded".green(),
            resource.path.display(),
            resource.media_type.dimmed()
        );
    }
}

fn report(workflow: &EditWorkflow, submission: Submission) {
    match submission {
        Submission::Completed(outcome) if outcome.is_success() => {
            println!("   {}", "✅ Edit ready. Download it or try again.".green());
        }
        Submission::Busy => println!("   {}", "An edit is already in progress".yellow()),
        Submission::Superseded => println!(
            "   {}",
            "The image changed while it was being edited; result discarded".yellow()
        ),
        // Failure text is already in the state
        _ => {
            if let Some(message) = workflow.snapshot().last_error {
                println!("   {} {}", "✗".red(), message);
            }
        }
    }
}

fn print_status(state: &WorkflowState) {
    let image = if state.original.is_some() {
        "image loaded".green()
    } else {
        "no image".dimmed()
    };
    let edited = if state.edited.is_some() {
        "edit ready".green()
    } else {
        "no edit".dimmed()
    };
    let prompt = if state.pending_prompt.trim().is_empty() {
        "(no prompt)".dimmed().to_string()
    } else {
        format!("\"{}\"", state.pending_prompt.trim()).cyan().to_string()
    };

    println!("[{} | {} | {}] {}", state.phase(), image, edited, prompt);
    if let Some(error) = &state.last_error {
        println!("   {} {}", "✗".red(), error.red());
    }
}

fn print_details(state: &WorkflowState) {
    println!("{}", "Session:".cyan().bold());
    match &state.original {
        Some(original) => println!(
            "   Original: {} ({} bytes encoded)",
            original.media_type,
            original.encoded_len()
        ),
        None => println!("   Original: {}", "none".dimmed()),
    }
    match &state.edited {
        Some(edited) => println!(
            "   Edited:   {} ({} bytes encoded)",
            edited.embedded_media_type().unwrap_or(&edited.media_type),
            edited.encoded_len()
        ),
        None => println!("   Edited:   {}", "none".dimmed()),
    }
    println!("   Prompt:   {}", state.pending_prompt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::ImageArtifact;

    #[test]
    fn test_blocked_actions() {
        let mut state = WorkflowState::default();
        assert!(Action::Open.blocked_by(&state).is_none());
        assert!(Action::Submit.blocked_by(&state).is_none());
        assert!(Action::Regenerate.blocked_by(&state).is_some());
        assert!(Action::Download.blocked_by(&state).is_some());
        assert!(Action::Undo.blocked_by(&state).is_some());

        state.edited = Some(ImageArtifact::from_base64("image/png", "AAAA"));
        assert!(Action::Regenerate.blocked_by(&state).is_none());
        assert!(Action::Download.blocked_by(&state).is_none());
        assert!(Action::Undo.blocked_by(&state).is_none());

        state.in_flight = true;
        assert!(Action::Submit.blocked_by(&state).is_some());
        assert!(Action::Regenerate.blocked_by(&state).is_some());
    }
}
