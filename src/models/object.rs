#![allow(missing_docs)]
//! Structured object handlers (OBJECT_SMALL, OBJECT_LARGE).

use super::{emit_usage, resolve_backend};
use crate::error::Result;
use crate::runtime::{model_type, AgentRuntime};
use crate::types::{GatewayResponse, ObjectGenerationParams};

async fn generate<R: AgentRuntime>(
    runtime: &R,
    mut params: ObjectGenerationParams,
    large: bool,
) -> Result<serde_json::Value> {
    let (client, provider) = resolve_backend(runtime).await?;
    let config = client.config();

    if params.model.is_none() {
        params.model = Some(if large {
            config.large_model.clone()
        } else {
            config.small_model.clone()
        });
    }

    let object = client.generate_object(&params).await?;
    let capability = if large {
        model_type::OBJECT_LARGE
    } else {
        model_type::OBJECT_SMALL
    };
    emit_usage(runtime, provider, capability, &params.prompt, None).await;

    Ok(object)
}

/// Handle OBJECT_SMALL.
pub async fn handle_object_small<R: AgentRuntime>(
    runtime: &R,
    params: ObjectGenerationParams,
) -> Result<serde_json::Value> {
    generate(runtime, params, false).await
}

/// Handle OBJECT_LARGE.
pub async fn handle_object_large<R: AgentRuntime>(
    runtime: &R,
    params: ObjectGenerationParams,
) -> Result<serde_json::Value> {
    generate(runtime, params, true).await
}

/// Resilient OBJECT_SMALL: parse and transport failures become an
/// error-shaped response instead of propagating.
pub async fn handle_object_small_resilient<R: AgentRuntime>(
    runtime: &R,
    params: ObjectGenerationParams,
) -> GatewayResponse<serde_json::Value> {
    match generate(runtime, params, false).await {
        Ok(object) => GatewayResponse::ok(object),
        Err(e) => GatewayResponse::err(e.to_string()),
    }
}

/// Resilient OBJECT_LARGE.
pub async fn handle_object_large_resilient<R: AgentRuntime>(
    runtime: &R,
    params: ObjectGenerationParams,
) -> GatewayResponse<serde_json::Value> {
    match generate(runtime, params, true).await {
        Ok(object) => GatewayResponse::ok(object),
        Err(e) => GatewayResponse::err(e.to_string()),
    }
}
