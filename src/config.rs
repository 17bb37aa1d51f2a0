//! Generation backend configuration.
//!
//! Values are read once from the process environment at startup and then
//! passed explicitly to the generation client.

use std::env;
use std::fmt;
use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::error::ConfigError;

/// Environment variable holding the backend credential.
pub const CREDENTIAL_ENV_VAR: &str = "GROQ_API_KEY";

/// Environment variable holding the model identifier.
pub const MODEL_ENV_VAR: &str = "MODEL_NAME";

/// Environment variable overriding the chat-completions endpoint.
pub const API_URL_ENV_VAR: &str = "EZCOMMIT_API_URL";

/// Environment variable overriding the request timeout (seconds).
pub const TIMEOUT_ENV_VAR: &str = "EZCOMMIT_TIMEOUT";

/// Groq's OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default timeout for the generation request (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Settings for the text-generation backend.
#[derive(Clone)]
pub struct GenerationConfig {
    /// Bearer credential. `None` disables generation for the run.
    pub credential: Option<String>,
    pub model_id: String,
    pub api_url: Url,
    pub timeout: Duration,
}

impl GenerationConfig {
    /// Build a validated configuration from explicit values.
    pub fn new(
        credential: Option<String>,
        model_id: impl Into<String>,
        api_url: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let model_id = model_id.into();
        if model_id.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        let api_url = Url::parse(api_url).map_err(|_| ConfigError::InvalidValue {
            var: API_URL_ENV_VAR,
            value: api_url.to_string(),
        })?;

        Ok(Self {
            credential: credential.filter(|c| !c.trim().is_empty()),
            model_id,
            api_url,
            timeout,
        })
    }

    /// Read configuration from the environment.
    ///
    /// A missing credential is not an error here; the pipeline reports it
    /// as a clean no-op when the client is constructed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credential = env::var(CREDENTIAL_ENV_VAR).ok();
        let model_id = non_empty_var(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_url =
            non_empty_var(API_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self::new(credential, model_id, &api_url, get_timeout())
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("model_id", &self.model_id)
            .field("api_url", &self.api_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get the configured timeout duration.
///
/// Logs a warning if the environment variable is set but contains
/// an invalid value, and falls back to the default.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
