//! Remote solver gateway.
//!
//! A [`SolverGateway`] sends one prompt to a hosted chat-completion service
//! and returns the text of the first reply. Calls block the caller, are
//! never retried, and fail with a typed [`GatewayError`].
//!
//! # Feature Flags
//!
//! - `remote-solver`: Enables [`OpenAiGateway`], an OpenAI-compatible client
//!   (Groq by default)
//! - Without the feature: every call fails with [`GatewayError::Unavailable`]

mod offline;

#[cfg(feature = "remote-solver")]
mod openai;

pub mod prompt;

pub use offline::OfflineGateway;

#[cfg(feature = "remote-solver")]
pub use openai::OpenAiGateway;

use crate::error::{ConfigError, GatewayError};
use std::fmt;
use std::sync::Arc;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable overriding the endpoint.
pub const BASE_URL_ENV: &str = "STUDY_ASSIST_BASE_URL";

/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "STUDY_ASSIST_MODEL";

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// A blocking prompt-in, text-out remote call.
///
/// Implementations must be thread-safe (`Send + Sync`) so one gateway can
/// be shared by every session in the process.
///
/// # Examples
///
/// ```
/// use study_assist::error::GatewayError;
/// use study_assist::gateway::{OfflineGateway, SolverGateway};
///
/// let gateway = OfflineGateway::new(GatewayError::MissingCredentials);
/// assert!(gateway.solve("Solve this mathematical expression: 2+").is_err());
/// ```
pub trait SolverGateway: Send + Sync {
    /// Sends `prompt` as a single user message and returns the reply text.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on missing credentials, transport failure,
    /// a non-success response or an empty reply.
    fn solve(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Whether calls can succeed at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Process-wide gateway settings, fixed at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// API credential. `None` disables the remote solver.
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Creates a configuration with defaults and no credential.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credential. Blank keys count as absent.
    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Checks the endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a blank model or a base URL
    /// that is not `http://` or `https://`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "model".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "base_url".to_string(),
                reason: format!("expected an http(s) URL, got '{}'", self.base_url),
            });
        }
        Ok(())
    }

    /// Whether a credential is present.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Creates the gateway for this process.
///
/// - No credential: an [`OfflineGateway`] failing with
///   [`GatewayError::MissingCredentials`], after a warning.
/// - With `remote-solver`: an [`OpenAiGateway`].
/// - Without: an [`OfflineGateway`] failing with [`GatewayError::Unavailable`].
#[must_use]
pub fn create_gateway(config: &GatewayConfig) -> Arc<dyn SolverGateway> {
    let Some(api_key) = config.api_key.as_deref() else {
        tracing::warn!(
            "{API_KEY_ENV} is not set; remote solving is disabled, local evaluation still works"
        );
        return Arc::new(OfflineGateway::new(GatewayError::MissingCredentials));
    };
    remote_gateway(api_key, config)
}

#[cfg(feature = "remote-solver")]
fn remote_gateway(api_key: &str, config: &GatewayConfig) -> Arc<dyn SolverGateway> {
    match OpenAiGateway::new(api_key, &config.base_url, &config.model) {
        Ok(gateway) => Arc::new(gateway),
        Err(err) => {
            tracing::warn!(error = %err, "failed to start remote solver");
            Arc::new(OfflineGateway::new(err))
        }
    }
}

#[cfg(not(feature = "remote-solver"))]
fn remote_gateway(_api_key: &str, _config: &GatewayConfig) -> Arc<dyn SolverGateway> {
    tracing::warn!("built without the remote-solver feature; remote solving is disabled");
    Arc::new(OfflineGateway::new(GatewayError::Unavailable))
}
