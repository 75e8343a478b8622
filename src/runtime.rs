//! Host runtime boundary.
//!
//! The plugin talks to its host through two narrow interfaces: a settings
//! lookup with environment-variable fallback, and a sink for model usage
//! events. An [`EnvSettings`] implementation is provided for embedding the
//! plugin without a runtime.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::TokenUsage;

/// Model type names, matching the runtime's handler registry keys.
pub mod model_type {
    /// Small text model
    pub const TEXT_SMALL: &str = "TEXT_SMALL";
    /// Large text model
    pub const TEXT_LARGE: &str = "TEXT_LARGE";
    /// Text embedding model
    pub const TEXT_EMBEDDING: &str = "TEXT_EMBEDDING";
    /// Image generation model
    pub const IMAGE: &str = "IMAGE";
    /// Image description model
    pub const IMAGE_DESCRIPTION: &str = "IMAGE_DESCRIPTION";
    /// Small object generation model
    pub const OBJECT_SMALL: &str = "OBJECT_SMALL";
    /// Large object generation model
    pub const OBJECT_LARGE: &str = "OBJECT_LARGE";
    /// Transcription model
    pub const TRANSCRIPTION: &str = "TRANSCRIPTION";
    /// Text to speech model
    pub const TEXT_TO_SPEECH: &str = "TEXT_TO_SPEECH";
    /// Text tokenizer encode
    pub const TEXT_TOKENIZER_ENCODE: &str = "TEXT_TOKENIZER_ENCODE";
    /// Text tokenizer decode
    pub const TEXT_TOKENIZER_DECODE: &str = "TEXT_TOKENIZER_DECODE";
}

/// Settings lookup exposed by the host runtime.
#[async_trait]
pub trait SettingsLookup: Send + Sync {
    /// Get a setting value by key. `None` means the runtime has no value;
    /// callers fall back to the process environment via
    /// [`get_setting_or_env`].
    async fn get_setting(&self, key: &str) -> Option<String>;
}

/// Resolve a key from runtime settings, falling back to the environment.
///
/// Empty and whitespace-only values are treated as absent at both levels.
pub async fn get_setting_or_env(lookup: &dyn SettingsLookup, key: &str) -> Option<String> {
    if let Some(value) = lookup.get_setting(key).await {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Settings source backed only by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettings;

#[async_trait]
impl SettingsLookup for EnvSettings {
    async fn get_setting(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Telemetry event recorded after a successful model call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsedEvent {
    /// Event id
    pub id: Uuid,
    /// Provider that served the call
    pub provider: String,
    /// Model type name (e.g. `TEXT_LARGE`)
    #[serde(rename = "type")]
    pub model_type: String,
    /// Prompt, truncated to [`EVENT_PROMPT_MAX_CHARS`]
    pub prompt: String,
    /// Token usage when the provider reported it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenUsage>,
}

/// Longest prompt prefix carried on a usage event.
pub const EVENT_PROMPT_MAX_CHARS: usize = 200;

impl ModelUsedEvent {
    /// Build an event, truncating the prompt to the event budget.
    pub fn new(
        provider: impl Into<String>,
        model_type: impl Into<String>,
        prompt: &str,
        tokens: Option<TokenUsage>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider: provider.into(),
            model_type: model_type.into(),
            prompt: prompt.chars().take(EVENT_PROMPT_MAX_CHARS).collect(),
            tokens,
        }
    }
}

/// Sink for model usage events exposed by the host runtime.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Record a model usage event. Failures here must never affect the
    /// primary result; callers log and move on.
    async fn emit_model_used(&self, event: ModelUsedEvent) -> anyhow::Result<()> {
        let _ = event;
        Ok(())
    }
}

/// The full runtime surface the capability handlers consume.
pub trait AgentRuntime: SettingsLookup + EventEmitter {}

impl<T: SettingsLookup + EventEmitter> AgentRuntime for T {}

impl EventEmitter for EnvSettings {}
