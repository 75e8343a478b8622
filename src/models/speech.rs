#![allow(missing_docs)]
//! Text-to-speech handler (TEXT_TO_SPEECH).

use bytes::Bytes;

use super::{emit_usage, resolve_backend};
use crate::error::Result;
use crate::runtime::{model_type, AgentRuntime};
use crate::types::TextToSpeechParams;

/// Handle TEXT_TO_SPEECH; returns raw audio bytes.
pub async fn handle_text_to_speech<R: AgentRuntime>(
    runtime: &R,
    mut params: TextToSpeechParams,
) -> Result<Bytes> {
    let (client, provider) = resolve_backend(runtime).await?;
    let config = client.config();

    if params.model.is_none() {
        params.model = Some(config.tts_model.clone());
    }
    if params.voice.is_none() {
        params.voice = Some(config.tts_voice.clone());
    }

    let audio = client.text_to_speech(&params).await?;
    emit_usage(runtime, provider, model_type::TEXT_TO_SPEECH, &params.text, None).await;

    Ok(audio)
}
