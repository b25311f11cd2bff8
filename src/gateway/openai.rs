//! OpenAI-compatible chat completion client.
//!
//! Wraps `async-openai` behind a private current-thread tokio runtime so
//! each call blocks until the service answers.

use crate::error::GatewayError;
use crate::gateway::SolverGateway;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use backoff::ExponentialBackoff;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// Chat completion gateway for any OpenAI-compatible endpoint.
///
/// Sends a single user-role message with the configured model and default
/// sampling parameters.
pub struct OpenAiGateway {
    client: Client<OpenAIConfig>,
    model: String,
    runtime: Runtime,
}

impl OpenAiGateway {
    /// Creates a client for `base_url` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Runtime`] if the blocking runtime cannot be
    /// started.
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, GatewayError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GatewayError::Runtime(e.to_string()))?;

        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        let client = Client::with_config(config).with_backoff(no_retry());

        Ok(Self {
            client,
            model: model.to_string(),
            runtime,
        })
    }

    /// The model every request is sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()];
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages(messages)
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GatewayError::EmptyResponse)
    }
}

impl SolverGateway for OpenAiGateway {
    fn solve(&self, prompt: &str) -> Result<String, GatewayError> {
        tracing::info!(
            model = %self.model,
            prompt_len = prompt.len(),
            "sending prompt to remote solver"
        );
        let result = self.runtime.block_on(self.complete(prompt));
        if let Err(ref err) = result {
            tracing::warn!(error = %err, "remote solver call failed");
        }
        result
    }
}

/// The client retries rate-limited calls by default; a zero time budget
/// turns that off.
fn no_retry() -> ExponentialBackoff {
    ExponentialBackoff {
        max_elapsed_time: Some(Duration::ZERO),
        ..ExponentialBackoff::default()
    }
}
