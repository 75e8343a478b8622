#![allow(missing_docs)]
//! Text generation handlers (TEXT_SMALL, TEXT_LARGE, streaming).

use super::{emit_usage, resolve_backend};
use crate::client::TextStream;
use crate::error::Result;
use crate::runtime::{model_type, AgentRuntime};
use crate::types::{GatewayResponse, TextGenerationParams};

async fn generate<R: AgentRuntime>(
    runtime: &R,
    mut params: TextGenerationParams,
    large: bool,
) -> Result<String> {
    let (client, provider) = resolve_backend(runtime).await?;
    let config = client.config();

    if params.model.is_none() {
        params.model = Some(if large {
            config.large_model.clone()
        } else {
            config.small_model.clone()
        });
    }
    if params.max_tokens.is_none() {
        params.max_tokens = Some(config.max_tokens_for(large));
    }

    let result = client.generate_text(&params).await?;
    let capability = if large {
        model_type::TEXT_LARGE
    } else {
        model_type::TEXT_SMALL
    };
    emit_usage(runtime, provider, capability, &params.prompt, result.usage).await;

    Ok(result.text)
}

/// Handle TEXT_SMALL.
pub async fn handle_text_small<R: AgentRuntime>(
    runtime: &R,
    params: TextGenerationParams,
) -> Result<String> {
    generate(runtime, params, false).await
}

/// Handle TEXT_LARGE.
pub async fn handle_text_large<R: AgentRuntime>(
    runtime: &R,
    params: TextGenerationParams,
) -> Result<String> {
    generate(runtime, params, true).await
}

/// Handle streaming text generation.
///
/// Streaming responses carry no usage block, so the usage event is recorded
/// without token counts once the stream opens.
pub async fn handle_text_stream<R: AgentRuntime>(
    runtime: &R,
    mut params: TextGenerationParams,
) -> Result<TextStream> {
    let (client, provider) = resolve_backend(runtime).await?;
    let config = client.config();

    if params.model.is_none() {
        params.model = Some(config.large_model.clone());
    }
    if params.max_tokens.is_none() {
        params.max_tokens = Some(config.max_tokens_large);
    }

    let stream = client.stream_text(&params).await?;
    emit_usage(runtime, provider, model_type::TEXT_LARGE, &params.prompt, None).await;

    Ok(stream)
}

/// Resilient TEXT_SMALL: failures become an error-shaped response.
pub async fn handle_text_small_resilient<R: AgentRuntime>(
    runtime: &R,
    params: TextGenerationParams,
) -> GatewayResponse<String> {
    match generate(runtime, params, false).await {
        Ok(text) => GatewayResponse::ok(text),
        Err(e) => GatewayResponse::err(e.to_string()),
    }
}

/// Resilient TEXT_LARGE: failures become an error-shaped response.
pub async fn handle_text_large_resilient<R: AgentRuntime>(
    runtime: &R,
    params: TextGenerationParams,
) -> GatewayResponse<String> {
    match generate(runtime, params, true).await {
        Ok(text) => GatewayResponse::ok(text),
        Err(e) => GatewayResponse::err(e.to_string()),
    }
}
