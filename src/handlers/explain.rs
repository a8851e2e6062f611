//! Explain handler: analyze a snippet in-process and print the provider's answer.

use anyhow::Result;

use crate::{
    config::Config,
    error::ExplainError,
    explain::{AnalysisRequest, Explainer},
    orchestrator::Settled,
    printer::{print_settled, Tone},
};

pub async fn run(cfg: &Config, code: &str, language: &str, markdown: bool) -> Result<()> {
    let explainer = Explainer::from_config(cfg)?;
    let req = AnalysisRequest::new(code, Some(language));

    let result = match explainer.analyze(&req).await {
        Ok(text) => Settled::Success(text),
        Err(e @ ExplainError::MissingCode) => return Err(e.into()),
        Err(e) => Settled::Failure(format!("Error: {e}")),
    };
    print_settled(&result, markdown, Tone::Plain);
    Ok(())
}
