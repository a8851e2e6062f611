//! Run handler: send the snippet to the execution service and print what it captured.

use anyhow::Result;

use crate::{
    config::Config,
    execution::ExecutionClient,
    orchestrator::requests::RUN_FAILURE_PREFIX,
    printer::{TextPrinter, Tone},
};

pub async fn run(cfg: &Config, code: &str, language: &str) -> Result<()> {
    let client = ExecutionClient::from_config(cfg)?;
    match client.execute(language, code).await {
        Ok(outcome) if outcome.is_success() => {
            TextPrinter { tone: Tone::Output }.print(&outcome.into_text())
        }
        Ok(outcome) => TextPrinter { tone: Tone::Failure }.print(&outcome.into_text()),
        Err(e) => TextPrinter { tone: Tone::Failure }.print(&format!("{RUN_FAILURE_PREFIX}{e}")),
    }
    Ok(())
}
