use aiself::handoff::{FileStore, HandoffReader, HandoffStore, WaitPolicy};
use aiself::{AiselfError, Config, Orchestrator};
use anyhow::Result;
use console::style;
use std::sync::Arc;

use super::commands::{Cli, Commands};
use super::terminal::{TerminalAnswers, collect_draft};
use super::view::{print_bullet, print_letters};

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Write { blocking } => write(&config, blocking).await,
        Commands::Show => show(&config).await,
        Commands::Clear => clear(&config),
    }
}

fn file_store(config: &Config) -> HandoffStore {
    HandoffStore::new(Arc::new(FileStore::new(config.handoff.resolved_dir())))
}

/// Show the person-facing message, keep the full chain for the exit status.
fn report(error: AiselfError) -> anyhow::Error {
    println!("  {} {}", style("✗").red().bold(), error.user_message());
    error.into()
}

async fn write(config: &Config, blocking: bool) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config).map_err(report)?;
    let draft = collect_draft()?;
    let mut answers = TerminalAnswers;

    let letters = if blocking {
        let session = orchestrator
            .run(draft, &mut answers)
            .await
            .map_err(report)?;
        session.letters
    } else {
        let mut handoff = orchestrator
            .run_optimistic(draft, &mut answers)
            .await
            .map_err(report)?;
        println!();
        print_bullet("Your future selves are writing. This can take a minute...");
        let letters = handoff
            .reader
            .wait()
            .await
            .map_err(|e| report(e.into()))?;
        if let Err(e) = handoff.task.await {
            tracing::warn!("letter writer task ended abnormally: {e}");
        }
        letters
    };

    let options = orchestrator.store().read_options()?;
    print_letters(options.as_ref(), &letters);
    Ok(())
}

async fn show(config: &Config) -> Result<()> {
    let store = file_store(config);
    let Some(options) = store.read_options()? else {
        print_bullet("Nothing to show yet. Run `aiself write` first.");
        return Ok(());
    };

    let mut reader = HandoffReader::detached(store, WaitPolicy::from(&config.handoff));
    print_bullet(&format!(
        "Waiting up to {}s for your letters...",
        reader.policy().deadline.as_secs()
    ));
    let letters = reader.wait().await.map_err(|e| report(e.into()))?;
    print_letters(Some(&options), &letters);
    Ok(())
}

fn clear(config: &Config) -> Result<()> {
    let files = Arc::new(FileStore::new(config.handoff.resolved_dir()));
    HandoffStore::new(files.clone()).clear()?;
    println!(
        "  {} Cleared {}",
        style("✓").green().bold(),
        style(files.dir().display()).dim()
    );
    Ok(())
}
