#![allow(missing_docs)]
//! Image handlers (IMAGE, IMAGE_DESCRIPTION).

use super::{emit_usage, resolve_backend};
use crate::error::Result;
use crate::runtime::{model_type, AgentRuntime};
use crate::types::{
    ImageDescriptionParams, ImageDescriptionResult, ImageGenerationParams, ImageGenerationResult,
};

/// Handle IMAGE generation.
pub async fn handle_image_generation<R: AgentRuntime>(
    runtime: &R,
    mut params: ImageGenerationParams,
) -> Result<Vec<ImageGenerationResult>> {
    let (client, provider) = resolve_backend(runtime).await?;

    if params.model.is_none() {
        params.model = Some(client.config().image_model.clone());
    }

    let images = client.generate_image(&params).await?;
    emit_usage(runtime, provider, model_type::IMAGE, &params.prompt, None).await;

    Ok(images)
}

/// Handle IMAGE_DESCRIPTION.
pub async fn handle_image_description<R: AgentRuntime>(
    runtime: &R,
    mut params: ImageDescriptionParams,
) -> Result<ImageDescriptionResult> {
    let (client, provider) = resolve_backend(runtime).await?;

    if params.model.is_none() {
        params.model = Some(client.config().image_description_model.clone());
    }

    let result = client.describe_image(&params).await?;
    emit_usage(
        runtime,
        provider,
        model_type::IMAGE_DESCRIPTION,
        &params.image_url,
        None,
    )
    .await;

    Ok(result)
}
