#![allow(missing_docs)]
//! Named capability handlers.
//!
//! Each handler resolves configuration from the host runtime, picks a
//! backend by credential availability, delegates to the HTTP client, and
//! records a model usage event on success. Handlers come in two dialects:
//! strict ones propagate every failure; resilient ones degrade into
//! [`crate::types::GatewayResponse`] (or, for embeddings, a sentinel
//! fallback vector) instead of failing.

pub mod embedding;
pub mod image;
pub mod object;
pub mod speech;
pub mod text;
pub mod tokenization;
pub mod transcription;

pub use embedding::{handle_text_embedding, handle_text_embedding_resilient};
pub use image::{handle_image_description, handle_image_generation};
pub use object::{
    handle_object_large, handle_object_large_resilient, handle_object_small,
    handle_object_small_resilient,
};
pub use speech::handle_text_to_speech;
pub use text::{
    handle_text_large, handle_text_large_resilient, handle_text_small,
    handle_text_small_resilient, handle_text_stream,
};
pub use tokenization::{handle_tokenizer_decode, handle_tokenizer_encode};
pub use transcription::handle_transcription;

use tracing::warn;

use crate::client::GatewayClient;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::providers::{resolve_provider, Provider};
use crate::runtime::{get_setting_or_env, AgentRuntime, ModelUsedEvent};
use crate::types::TokenUsage;

/// Resolve the backend for a call: pick a provider by credential
/// availability, then build the configuration and client for it.
pub(crate) async fn resolve_backend<R: AgentRuntime>(
    runtime: &R,
) -> Result<(GatewayClient, Provider)> {
    let provider = resolve_provider(Provider::AiGateway, runtime).await;

    let config = if provider == Provider::AiGateway {
        GatewayConfig::resolve(runtime).await?
    } else {
        let api_key = get_setting_or_env(runtime, provider.credential_key())
            .await
            .ok_or_else(|| {
                GatewayError::MissingCredential(format!(
                    "{} is required",
                    provider.credential_key()
                ))
            })?;
        let mut config = GatewayConfig::resolve_with_api_key(runtime, api_key).await;
        config.base_url = provider.default_base_url().to_string();
        // Gateway-specific URL overrides do not follow the call to another
        // provider's endpoint.
        config.openai_compatible_url = None;
        config
    };

    Ok((GatewayClient::new(config)?, provider))
}

/// Record a model usage event; failures are logged and never surfaced.
pub(crate) async fn emit_usage<R: AgentRuntime>(
    runtime: &R,
    provider: Provider,
    model_type: &str,
    prompt: &str,
    tokens: Option<TokenUsage>,
) {
    let event = ModelUsedEvent::new(provider.id(), model_type, prompt, tokens);
    if let Err(e) = runtime.emit_model_used(event).await {
        warn!("Failed to emit model usage event: {}", e);
    }
}
