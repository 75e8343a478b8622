#![allow(missing_docs)]
//! Audio transcription handler (TRANSCRIPTION).

use super::{emit_usage, resolve_backend};
use crate::error::Result;
use crate::runtime::{model_type, AgentRuntime};
use crate::types::TranscriptionParams;

/// Handle TRANSCRIPTION; returns the transcribed text.
pub async fn handle_transcription<R: AgentRuntime>(
    runtime: &R,
    mut params: TranscriptionParams,
) -> Result<String> {
    let (client, provider) = resolve_backend(runtime).await?;

    if params.model.is_none() {
        params.model = Some(client.config().transcription_model.clone());
    }

    let text = client.transcribe_audio(&params).await?;
    emit_usage(runtime, provider, model_type::TRANSCRIPTION, "", None).await;

    Ok(text)
}
