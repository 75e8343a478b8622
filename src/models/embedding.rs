#![allow(missing_docs)]
//! Text embedding handler (TEXT_EMBEDDING).
//!
//! Two dialects: the strict handler propagates failures; the resilient
//! handler never fails, returning a zero vector whose leading element marks
//! the failure class so a single bad embedding cannot abort a batch
//! ingestion pipeline.

use tracing::warn;

use super::{emit_usage, resolve_backend};
use crate::config::DEFAULT_EMBEDDING_DIMENSIONS;
use crate::error::Result;
use crate::runtime::{model_type, AgentRuntime};
use crate::types::EmbeddingParams;

/// Approximate characters per token used for the pre-dispatch budget.
/// A heuristic, not a tokenizer; the cut lands on the nearest char boundary.
pub const EMBEDDING_CHARS_PER_TOKEN: usize = 4;

/// Token budget for embedding input.
pub const EMBEDDING_MAX_TOKENS: usize = 8192;

/// Leading element of the fallback vector for empty or missing input.
pub const EMPTY_INPUT_SENTINEL: f32 = 0.1;

/// Leading element of the fallback vector for upstream failures.
pub const FAILURE_SENTINEL: f32 = 0.2;

/// Truncate embedding input to the character budget.
pub fn truncate_for_embedding(text: &str) -> &str {
    let budget = EMBEDDING_MAX_TOKENS * EMBEDDING_CHARS_PER_TOKEN;
    if text.len() <= budget {
        return text;
    }
    let mut end = budget;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Zero vector with a sentinel leading element.
pub fn fallback_vector(dimensions: usize, sentinel: f32) -> Vec<f32> {
    let mut vector = vec![0.0; dimensions.max(1)];
    vector[0] = sentinel;
    vector
}

async fn embed<R: AgentRuntime>(runtime: &R, mut params: EmbeddingParams) -> Result<Vec<f32>> {
    let (client, provider) = resolve_backend(runtime).await?;
    let config = client.config();

    params.text = truncate_for_embedding(&params.text).to_string();
    if params.model.is_none() {
        params.model = Some(config.embedding_model.clone());
    }
    if params.dimensions.is_none() {
        params.dimensions = Some(config.embedding_dimensions);
    }

    let embedding = client.create_embedding(&params).await?;
    emit_usage(runtime, provider, model_type::TEXT_EMBEDDING, &params.text, None).await;

    Ok(embedding)
}

/// Handle TEXT_EMBEDDING under the configured error policy.
///
/// With `resilient_embeddings` enabled the call never fails; otherwise every
/// failure propagates to the caller.
pub async fn handle_text_embedding<R: AgentRuntime>(
    runtime: &R,
    params: EmbeddingParams,
) -> Result<Vec<f32>> {
    let resilient = crate::config::GatewayConfig::resolve(runtime)
        .await
        .map(|c| c.resilient_embeddings)
        .unwrap_or(false);

    if resilient {
        Ok(handle_text_embedding_resilient(runtime, params).await)
    } else {
        embed(runtime, params).await
    }
}

/// Resilient TEXT_EMBEDDING: always returns a vector.
///
/// Empty input short-circuits to the empty-input sentinel vector without a
/// network call; any other failure becomes the failure sentinel vector. This
/// is a deliberate degrade-not-fail contract, not error suppression.
pub async fn handle_text_embedding_resilient<R: AgentRuntime>(
    runtime: &R,
    params: EmbeddingParams,
) -> Vec<f32> {
    let dimensions = match params.dimensions {
        Some(dims) => dims,
        None => crate::config::GatewayConfig::resolve(runtime)
            .await
            .map(|c| c.embedding_dimensions)
            .unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS),
    };

    if params.text.trim().is_empty() {
        warn!("Embedding requested for empty input; returning sentinel vector");
        return fallback_vector(dimensions, EMPTY_INPUT_SENTINEL);
    }

    match embed(runtime, params).await {
        Ok(embedding) => embedding,
        Err(e) => {
            warn!("Embedding failed, returning fallback vector: {}", e);
            fallback_vector(dimensions, FAILURE_SENTINEL)
        }
    }
}
