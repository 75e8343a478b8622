#![allow(missing_docs)]
//! Tokenizer handlers (TEXT_TOKENIZER_ENCODE, TEXT_TOKENIZER_DECODE).
//!
//! Tokenization is local; no request leaves the process. Configuration is
//! consulted only to map the model type to a concrete model id, so a missing
//! credential falls back to the default model table rather than failing.

use crate::config::{GatewayConfig, DEFAULT_LARGE_MODEL, DEFAULT_SMALL_MODEL};
use crate::error::Result;
use crate::runtime::{model_type, AgentRuntime};
use crate::tokenization::{detokenize, tokenize};
use crate::types::{DetokenizeTextParams, TokenizeTextParams};

async fn model_for_type<R: AgentRuntime>(runtime: &R, requested: &str) -> String {
    let config = GatewayConfig::resolve(runtime).await.ok();
    match requested {
        model_type::TEXT_SMALL => config
            .map(|c| c.small_model)
            .unwrap_or_else(|| DEFAULT_SMALL_MODEL.to_string()),
        _ => config
            .map(|c| c.large_model)
            .unwrap_or_else(|| DEFAULT_LARGE_MODEL.to_string()),
    }
}

/// Handle TEXT_TOKENIZER_ENCODE.
pub async fn handle_tokenizer_encode<R: AgentRuntime>(
    runtime: &R,
    params: TokenizeTextParams,
) -> Result<Vec<u32>> {
    let model = model_for_type(runtime, &params.model_type).await;
    tokenize(&params.prompt, &model)
}

/// Handle TEXT_TOKENIZER_DECODE.
pub async fn handle_tokenizer_decode<R: AgentRuntime>(
    runtime: &R,
    params: DetokenizeTextParams,
) -> Result<String> {
    let model = model_for_type(runtime, &params.model_type).await;
    detokenize(&params.tokens, &model)
}
