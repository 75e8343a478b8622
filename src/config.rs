#![allow(missing_docs)]
//! Configuration resolution for the AI Gateway plugin.
//!
//! Every field resolves independently with the precedence: explicit builder
//! override, then runtime setting, then environment variable, then the
//! hard-coded default. Setting keys and environment variable names are
//! identical.

use crate::error::{GatewayError, Result};
use crate::runtime::{get_setting_or_env, SettingsLookup};

/// Default gateway endpoint.
pub const DEFAULT_BASE_URL: &str = "https://ai-gateway.vercel.sh/v1";

/// Default small model.
pub const DEFAULT_SMALL_MODEL: &str = "gpt-5-mini";

/// Default large model.
pub const DEFAULT_LARGE_MODEL: &str = "gpt-5";

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default embedding dimensions.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// Default image generation model.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Default image description model.
pub const DEFAULT_IMAGE_DESCRIPTION_MODEL: &str = "gpt-5-mini";

/// Default transcription model.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default text-to-speech model and voice.
pub const DEFAULT_TTS_MODEL: &str = "tts-1";
pub const DEFAULT_TTS_VOICE: &str = "nova";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Shared default for max output tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Models that reject temperature/sampling parameters (reasoning models).
const NO_TEMPERATURE_MODELS: &[&str] = &[
    "o1",
    "o1-preview",
    "o1-mini",
    "o3",
    "o3-mini",
    "gpt-5",
    "gpt-5-mini",
];

/// Whether a model accepts temperature and penalty parameters.
pub fn model_supports_temperature(model: &str) -> bool {
    let model_lower = model.to_lowercase();
    !NO_TEMPERATURE_MODELS
        .iter()
        .any(|&m| model_lower.contains(m))
}

/// Fully resolved plugin configuration. Built fresh per call; nothing in it
/// outlives the request it was resolved for unless a caller chooses to cache
/// it.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub openai_compatible_url: Option<String>,
    pub account_id: Option<String>,
    pub workspace_id: Option<String>,
    pub small_model: String,
    pub large_model: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub image_model: String,
    pub image_description_model: String,
    pub transcription_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub timeout_ms: u64,
    pub max_tokens_small: u32,
    pub max_tokens_large: u32,
    pub resilient_embeddings: bool,
}

impl GatewayConfig {
    /// Create a configuration with defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            openai_compatible_url: None,
            account_id: None,
            workspace_id: None,
            small_model: DEFAULT_SMALL_MODEL.to_string(),
            large_model: DEFAULT_LARGE_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_description_model: DEFAULT_IMAGE_DESCRIPTION_MODEL.to_string(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_tokens_small: DEFAULT_MAX_TOKENS,
            max_tokens_large: DEFAULT_MAX_TOKENS,
            resilient_embeddings: false,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_small_model(mut self, model: impl Into<String>) -> Self {
        self.small_model = model.into();
        self
    }

    pub fn with_large_model(mut self, model: impl Into<String>) -> Self {
        self.large_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_embedding_dimensions(mut self, dims: usize) -> Self {
        self.embedding_dimensions = dims;
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_resilient_embeddings(mut self, resilient: bool) -> Self {
        self.resilient_embeddings = resilient;
        self
    }

    /// Resolve configuration from a settings lookup with environment
    /// fallback.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingCredential`] when no API key is found
    /// under any accepted key.
    pub async fn resolve(lookup: &dyn SettingsLookup) -> Result<Self> {
        let api_key = resolve_api_key(lookup).await.ok_or_else(|| {
            GatewayError::MissingCredential(
                "AI_GATEWAY_API_KEY, AIGATEWAY_API_KEY, or VERCEL_OIDC_TOKEN is required"
                    .to_string(),
            )
        })?;
        Ok(Self::resolve_with_api_key(lookup, api_key).await)
    }

    /// Resolve every non-credential field against the lookup, using the given
    /// API key. Used when provider resolution has already produced a
    /// credential from another source.
    pub async fn resolve_with_api_key(
        lookup: &dyn SettingsLookup,
        api_key: impl Into<String>,
    ) -> Self {
        let mut config = Self::new(api_key);

        config.account_id = get_setting_or_env(lookup, "AI_GATEWAY_ACCOUNT_ID").await;
        config.workspace_id = get_setting_or_env(lookup, "AI_GATEWAY_WORKSPACE_ID").await;

        // An explicit base URL wins; otherwise account/workspace identifiers
        // become path segments under the default endpoint.
        if let Some(base_url) = get_setting_or_env(lookup, "AI_GATEWAY_BASE_URL").await {
            config.base_url = base_url;
        } else if let (Some(account), Some(workspace)) =
            (config.account_id.as_deref(), config.workspace_id.as_deref())
        {
            config.base_url = format!("{}/{}/{}", DEFAULT_BASE_URL, account, workspace);
        }

        config.openai_compatible_url =
            get_setting_or_env(lookup, "AI_GATEWAY_OPENAI_COMPAT_URL").await;

        if let Some(model) = get_setting_or_env(lookup, "AI_GATEWAY_SMALL_MODEL").await {
            config.small_model = model;
        }
        if let Some(model) = get_setting_or_env(lookup, "AI_GATEWAY_LARGE_MODEL").await {
            config.large_model = model;
        }
        if let Some(model) = get_setting_or_env(lookup, "AI_GATEWAY_EMBEDDING_MODEL").await {
            config.embedding_model = model;
        }
        if let Some(model) = get_setting_or_env(lookup, "AI_GATEWAY_IMAGE_MODEL").await {
            config.image_model = model;
        }
        if let Some(model) = get_setting_or_env(lookup, "AI_GATEWAY_IMAGE_DESCRIPTION_MODEL").await
        {
            config.image_description_model = model;
        }
        if let Some(model) = get_setting_or_env(lookup, "AI_GATEWAY_TRANSCRIPTION_MODEL").await {
            config.transcription_model = model;
        }
        if let Some(model) = get_setting_or_env(lookup, "AI_GATEWAY_TTS_MODEL").await {
            config.tts_model = model;
        }
        if let Some(voice) = get_setting_or_env(lookup, "AI_GATEWAY_TTS_VOICE").await {
            config.tts_voice = voice;
        }

        if let Some(dims) =
            resolve_positive::<usize>(lookup, "AI_GATEWAY_EMBEDDING_DIMENSIONS").await
        {
            config.embedding_dimensions = dims;
        }
        if let Some(timeout) = resolve_positive::<u64>(lookup, "AI_GATEWAY_TIMEOUT_MS").await {
            config.timeout_ms = timeout;
        }

        // Per-capability max tokens fall back to the shared override before
        // the built-in default.
        let shared_max = resolve_positive::<u32>(lookup, "AI_GATEWAY_MAX_TOKENS").await;
        config.max_tokens_small = resolve_positive::<u32>(lookup, "AI_GATEWAY_SMALL_MAX_TOKENS")
            .await
            .or(shared_max)
            .unwrap_or(DEFAULT_MAX_TOKENS);
        config.max_tokens_large = resolve_positive::<u32>(lookup, "AI_GATEWAY_LARGE_MAX_TOKENS")
            .await
            .or(shared_max)
            .unwrap_or(DEFAULT_MAX_TOKENS);

        if let Some(flag) = get_setting_or_env(lookup, "AI_GATEWAY_RESILIENT_EMBEDDINGS").await {
            config.resilient_embeddings = is_truthy(&flag);
        }

        config
    }

    /// Resolve configuration from the process environment only.
    pub async fn from_env() -> Result<Self> {
        Self::resolve(&crate::runtime::EnvSettings).await
    }

    /// Max output tokens for the given model class.
    pub fn max_tokens_for(&self, large: bool) -> u32 {
        if large {
            self.max_tokens_large
        } else {
            self.max_tokens_small
        }
    }
}

async fn resolve_api_key(lookup: &dyn SettingsLookup) -> Option<String> {
    for key in ["AI_GATEWAY_API_KEY", "AIGATEWAY_API_KEY", "VERCEL_OIDC_TOKEN"] {
        if let Some(value) = get_setting_or_env(lookup, key).await {
            return Some(value);
        }
    }
    None
}

/// Parse a numeric setting defensively: non-numeric and non-positive values
/// are treated as absent.
async fn resolve_positive<T>(lookup: &dyn SettingsLookup, key: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = get_setting_or_env(lookup, key).await?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => None,
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
