//! Client for the hosted code execution service (Piston-compatible API).

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::{config::Config, error::ExecutionError};

pub const NO_OUTPUT: &str = "No output.";

/// Any version the service has installed; it picks the newest.
const LATEST_VERSION: &str = "*";
const MAIN_FILE: &str = "main";

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionRequest<'a> {
    pub language: &'a str,
    pub version: &'a str,
    pub files: Vec<SourceFile<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceFile<'a> {
    pub name: &'a str,
    pub content: &'a str,
}

impl<'a> ExecutionRequest<'a> {
    pub fn new(language: &'a str, code: &'a str) -> Self {
        Self {
            language,
            version: LATEST_VERSION,
            files: vec![SourceFile { name: MAIN_FILE, content: code }],
        }
    }
}

/// What the service sent back, in order of preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Captured program output (`run.output`).
    Output(String),
    /// Service-level message, e.g. an unknown runtime.
    Message(String),
    /// Neither output nor message.
    Empty,
}

impl ExecutionOutcome {
    pub fn from_body(body: &Value) -> Self {
        let output = body
            .get("run")
            .and_then(|run| run.get("output"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        if let Some(output) = output {
            return ExecutionOutcome::Output(output.to_string());
        }
        match body.get("message").and_then(Value::as_str) {
            Some(msg) if !msg.is_empty() => ExecutionOutcome::Message(msg.to_string()),
            _ => ExecutionOutcome::Empty,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, ExecutionOutcome::Message(_))
    }

    pub fn into_text(self) -> String {
        match self {
            ExecutionOutcome::Output(s) | ExecutionOutcome::Message(s) => s,
            ExecutionOutcome::Empty => NO_OUTPUT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutionClient {
    client: Client,
    url: String,
}

impl ExecutionClient {
    pub fn from_config(cfg: &Config) -> Result<Self, ExecutionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: cfg.execution_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The response status is not inspected: error bodies carry a `message` that is surfaced as-is.
    pub async fn execute(&self, language: &str, code: &str) -> Result<ExecutionOutcome, ExecutionError> {
        let request = ExecutionRequest::new(language, code);
        debug!(url = %self.url, language, "submitting code for execution");

        let resp = self.client.post(&self.url).json(&request).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        debug!(%status, "execution service replied");

        Ok(ExecutionOutcome::from_body(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_wildcard_version_and_main_file() {
        let value = serde_json::to_value(ExecutionRequest::new("python", "print(1)")).unwrap();
        assert_eq!(
            value,
            json!({
                "language": "python",
                "version": "*",
                "files": [{"name": "main", "content": "print(1)"}]
            })
        );
    }

    #[test]
    fn run_output_wins() {
        let body = json!({"run": {"output": "hi\n"}, "message": "ignored"});
        assert_eq!(ExecutionOutcome::from_body(&body).into_text(), "hi\n");
    }

    #[test]
    fn empty_output_falls_back_to_message_then_sentinel() {
        let body = json!({"run": {"output": ""}, "message": "python9 is not a known runtime"});
        let outcome = ExecutionOutcome::from_body(&body);
        assert!(!outcome.is_success());
        assert_eq!(outcome.into_text(), "python9 is not a known runtime");

        let outcome = ExecutionOutcome::from_body(&json!({"run": {"output": ""}}));
        assert_eq!(outcome, ExecutionOutcome::Empty);
        assert_eq!(outcome.into_text(), NO_OUTPUT);
    }
}
