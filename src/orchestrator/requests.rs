//! Network calls issued by the orchestrator and how their replies become pane results.

use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use super::{PaneKind, PendingRequest, Settled};
use crate::{
    config::Config,
    execution::ExecutionClient,
    explain::AnalysisRequest,
};

pub const NETWORK_ERROR: &str = "Network error occurred";
pub const INVALID_RESPONSE_PREFIX: &str = "Invalid server response:";
pub const MISSING_EXPLANATION: &str = "Something went wrong.";
pub const RUN_FAILURE_PREFIX: &str = "Failed to run code: ";

/// Talks to the explanation endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct ExplainClient {
    http: Client,
    endpoint: String,
}

impl ExplainClient {
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self { http, endpoint: endpoint.into() }
    }

    pub async fn explain(&self, code: &str, language: &str) -> Settled {
        let body = AnalysisRequest::new(code, Some(language));
        let resp = match self.http.post(&self.endpoint).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, endpoint = %self.endpoint, "explanation request failed");
                return Settled::Failure(NETWORK_ERROR.to_string());
            }
        };
        let ok = resp.status().is_success();
        match resp.text().await {
            Ok(text) => interpret_explanation(ok, &text),
            Err(e) => {
                warn!(error = %e, "reading explanation response failed");
                Settled::Failure(NETWORK_ERROR.to_string())
            }
        }
    }
}

/// Turn the endpoint's status and raw body into what the explanation pane shows.
pub fn interpret_explanation(ok: bool, text: &str) -> Settled {
    let data: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return Settled::Failure(format!("{INVALID_RESPONSE_PREFIX}\n\n{text}")),
    };

    let field = |name: &str| {
        data.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if !ok {
        let detail = field("error").unwrap_or_else(|| text.to_string());
        return Settled::Failure(format!("Error: {detail}"));
    }

    match field("explanation") {
        Some(explanation) => Settled::Success(explanation),
        None => Settled::Failure(MISSING_EXPLANATION.to_string()),
    }
}

/// Runs a pending request against whichever backend its pane uses.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    explain: ExplainClient,
    execution: ExecutionClient,
}

impl Dispatcher {
    pub fn new(explain: ExplainClient, execution: ExecutionClient) -> Self {
        Self { explain, execution }
    }

    pub fn from_config(cfg: &Config, endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let explain = ExplainClient::new(builder.build()?, endpoint);
        let execution = ExecutionClient::from_config(cfg)?;
        Ok(Self::new(explain, execution))
    }

    pub async fn perform(&self, req: &PendingRequest) -> Settled {
        let language = req.language.as_str();
        match req.kind {
            PaneKind::Explanation => self.explain.explain(&req.code, language).await,
            PaneKind::Execution => self.run(&req.code, language).await,
        }
    }

    async fn run(&self, code: &str, language: &str) -> Settled {
        match self.execution.execute(language, code).await {
            Ok(outcome) if outcome.is_success() => Settled::Success(outcome.into_text()),
            Ok(outcome) => Settled::Failure(outcome.into_text()),
            Err(e) => {
                warn!(error = %e, url = %self.execution.url(), "execution request failed");
                Settled::Failure(format!("{RUN_FAILURE_PREFIX}{e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_json_body_is_reported_with_raw_text() {
        let result = interpret_explanation(false, "<html>502 Bad Gateway</html>");
        assert_eq!(
            result,
            Settled::Failure("Invalid server response:\n\n<html>502 Bad Gateway</html>".into())
        );
    }

    #[test]
    fn error_status_prefers_error_field() {
        let result = interpret_explanation(false, r#"{"error":"No code provided"}"#);
        assert_eq!(result, Settled::Failure("Error: No code provided".into()));
    }

    #[test]
    fn error_status_without_field_shows_body() {
        let body = r#"{"detail":"nope"}"#;
        let result = interpret_explanation(false, body);
        assert_eq!(result, Settled::Failure(format!("Error: {body}")));
    }

    #[test]
    fn success_returns_explanation() {
        let result = interpret_explanation(true, r#"{"explanation":"**EXPLANATION:**\nprints hi"}"#);
        assert_eq!(result, Settled::Success("**EXPLANATION:**\nprints hi".into()));
    }

    #[test]
    fn success_without_explanation_is_a_failure() {
        let result = interpret_explanation(true, "{}");
        assert_eq!(result, Settled::Failure(MISSING_EXPLANATION.into()));
    }
}
