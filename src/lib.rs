//! elizaOS AI Gateway Plugin
//!
//! Unified model-provider access for elizaOS agents through an AI Gateway
//! endpoint or any OpenAI-compatible provider API. Covers text generation
//! (plain and streaming), embeddings, image generation and description,
//! structured JSON objects, transcription, speech synthesis, and local
//! tokenization.
//!
//! # Example
//!
//! ```rust,no_run
//! use elizaos_plugin_aigateway::GatewayPlugin;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let plugin = GatewayPlugin::from_env().await?;
//! let response = plugin.generate_text_large("Hello, world!").await?;
//! println!("{}", response);
//! # Ok(())
//! # }
//! ```
//!
//! # Streaming Example
//!
//! ```rust,no_run
//! use elizaos_plugin_aigateway::{GatewayPlugin, TextGenerationParams};
//! use futures::StreamExt;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let plugin = GatewayPlugin::from_env().await?;
//! let params = TextGenerationParams::new("Tell me a story");
//! let mut stream = plugin.stream_text(&params).await?;
//!
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Runtime handlers
//!
//! The [`models`] module exposes the named capability handlers a host
//! runtime registers (TEXT_SMALL, TEXT_LARGE, TEXT_EMBEDDING, IMAGE, ...).
//! Each resolves configuration through the runtime's settings lookup with
//! environment fallback, picks a backend by credential availability, and
//! records a model usage event on success.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod audio;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod runtime;
pub mod tokenization;
pub mod types;

pub use client::{GatewayClient, TextStream, DEFAULT_IMAGE_DESCRIPTION_PROMPT};
pub use config::{model_supports_temperature, GatewayConfig};
pub use error::{GatewayError, Result};
pub use providers::{resolve_provider, Provider};
pub use runtime::{AgentRuntime, EnvSettings, EventEmitter, ModelUsedEvent, SettingsLookup};
pub use tokenization::{count_tokens, detokenize, tokenize, truncate_to_token_limit};
pub use types::*;

use bytes::Bytes;

/// AI Gateway plugin facade.
///
/// Wraps a resolved configuration and client behind one capability surface.
/// The facade holds the only state that outlives a call: the client's
/// connection pool and the lazy model-list cache.
pub struct GatewayPlugin {
    client: GatewayClient,
}

impl GatewayPlugin {
    /// Create a plugin from a resolved configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self {
            client: GatewayClient::new(config)?,
        })
    }

    /// Create a plugin from environment variables.
    ///
    /// Requires one of `AI_GATEWAY_API_KEY`, `AIGATEWAY_API_KEY`, or
    /// `VERCEL_OIDC_TOKEN`.
    pub async fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env().await?)
    }

    /// Generate text with the small model.
    pub async fn generate_text_small(&self, prompt: &str) -> Result<String> {
        let params = TextGenerationParams::new(prompt)
            .model(self.client.config().small_model.clone())
            .max_tokens(self.client.config().max_tokens_small);
        Ok(self.client.generate_text(&params).await?.text)
    }

    /// Generate text with the large model.
    pub async fn generate_text_large(&self, prompt: &str) -> Result<String> {
        let params = TextGenerationParams::new(prompt)
            .model(self.client.config().large_model.clone())
            .max_tokens(self.client.config().max_tokens_large);
        Ok(self.client.generate_text(&params).await?.text)
    }

    /// Generate text with full parameters.
    pub async fn generate_text(&self, params: &TextGenerationParams) -> Result<TextResult> {
        self.client.generate_text(params).await
    }

    /// Stream text fragments as they arrive.
    pub async fn stream_text(&self, params: &TextGenerationParams) -> Result<TextStream> {
        self.client.stream_text(params).await
    }

    /// Create an embedding for text, truncated to the input budget.
    pub async fn create_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let params = EmbeddingParams::new(models::embedding::truncate_for_embedding(text))
            .dimensions(self.client.config().embedding_dimensions);
        self.client.create_embedding(&params).await
    }

    /// Generate images.
    pub async fn generate_image(
        &self,
        params: &ImageGenerationParams,
    ) -> Result<Vec<ImageGenerationResult>> {
        self.client.generate_image(params).await
    }

    /// Describe an image.
    pub async fn describe_image(
        &self,
        params: &ImageDescriptionParams,
    ) -> Result<ImageDescriptionResult> {
        self.client.describe_image(params).await
    }

    /// Generate a structured JSON object with the small model.
    pub async fn generate_object_small(&self, prompt: &str) -> Result<serde_json::Value> {
        let params = ObjectGenerationParams::new(prompt)
            .model(self.client.config().small_model.clone());
        self.client.generate_object(&params).await
    }

    /// Generate a structured JSON object with the large model.
    pub async fn generate_object_large(&self, prompt: &str) -> Result<serde_json::Value> {
        let params = ObjectGenerationParams::new(prompt)
            .model(self.client.config().large_model.clone());
        self.client.generate_object(&params).await
    }

    /// Transcribe audio to text.
    pub async fn transcribe_audio(&self, params: &TranscriptionParams) -> Result<String> {
        self.client.transcribe_audio(params).await
    }

    /// Convert text to speech.
    pub async fn text_to_speech(&self, params: &TextToSpeechParams) -> Result<Bytes> {
        self.client.text_to_speech(params).await
    }

    /// Encode text into token ids for a model class.
    pub fn tokenize_text(&self, text: &str, large: bool) -> Result<Vec<u32>> {
        let config = self.client.config();
        let model = if large {
            &config.large_model
        } else {
            &config.small_model
        };
        tokenization::tokenize(text, model)
    }

    /// Decode token ids back into text for a model class.
    pub fn detokenize_text(&self, tokens: &[u32], large: bool) -> Result<String> {
        let config = self.client.config();
        let model = if large {
            &config.large_model
        } else {
            &config.small_model
        };
        tokenization::detokenize(tokens, model)
    }

    /// List models exposed by the gateway (cached after the first call).
    pub async fn list_models(&self, force_refresh: bool) -> Result<Vec<ModelInfo>> {
        self.client.list_models(force_refresh).await
    }

    /// Get the underlying client for advanced operations.
    pub fn client(&self) -> &GatewayClient {
        &self.client
    }
}

/// Plugin name.
pub const PLUGIN_NAME: &str = "aigateway";
/// Plugin description.
pub const PLUGIN_DESCRIPTION: &str =
    "AI Gateway model provider with text, embedding, image, object, and audio support";
/// Plugin version.
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");
