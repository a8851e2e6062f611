//! Explanation request handling: validate the snippet, build the prompt, ask the provider.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    config::Config,
    error::{ExplainError, ProviderError},
    llm::{ChatMessage, ChatOptions, LlmClient, Role},
    prompt::{analysis_prompt, language_label},
};

/// Text returned when the provider answers without any message content.
pub const EMPTY_COMPLETION: &str = "No response";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            code: Some(code.into()),
            language: language.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct Explainer {
    client: LlmClient,
    model: String,
}

impl Explainer {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self { client, model: model.into() }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ProviderError> {
        Ok(Self::new(LlmClient::from_config(cfg)?, cfg.model()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the provider's raw text; the section layout is only requested, never checked.
    pub async fn analyze(&self, req: &AnalysisRequest) -> Result<String, ExplainError> {
        debug!(
            api_key_loaded = self.client.has_api_key(),
            "handling explanation request"
        );

        let code = match req.code.as_deref() {
            Some(code) if !code.trim().is_empty() => code,
            _ => return Err(ExplainError::MissingCode),
        };
        let lang = language_label(req.language.as_deref());
        let prompt = analysis_prompt(lang, code);

        let messages = vec![ChatMessage::new(Role::User, prompt)];
        let opts = ChatOptions { model: self.model.clone() };

        match self.client.chat(messages, &opts).await {
            Ok(Some(text)) if !text.is_empty() => Ok(text),
            Ok(_) => Ok(EMPTY_COMPLETION.to_string()),
            Err(e) => {
                error!(error = %e, "completion provider call failed");
                Err(e.into())
            }
        }
    }
}
