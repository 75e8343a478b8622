//! Unit tests for configuration resolution, provider policy, and the
//! pure normalization helpers.

use std::collections::HashMap;

use async_trait::async_trait;
use elizaos_plugin_aigateway::config::{
    DEFAULT_BASE_URL, DEFAULT_LARGE_MODEL, DEFAULT_MAX_TOKENS, DEFAULT_SMALL_MODEL,
};
use elizaos_plugin_aigateway::models::embedding::{
    fallback_vector, truncate_for_embedding, EMBEDDING_CHARS_PER_TOKEN, EMBEDDING_MAX_TOKENS,
    EMPTY_INPUT_SENTINEL, FAILURE_SENTINEL,
};
use elizaos_plugin_aigateway::{
    model_supports_temperature, resolve_provider, EnvSettings, GatewayConfig, GatewayError,
    GatewayResponse, Provider, SettingsLookup,
};
use pretty_assertions::assert_eq;

struct MapSettings(HashMap<String, String>);

impl MapSettings {
    fn new(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[async_trait]
impl SettingsLookup for MapSettings {
    async fn get_setting(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

// ============================================================================
// Config resolution precedence
// ============================================================================

#[tokio::test]
async fn config_uses_hard_default_when_nothing_is_set() {
    let lookup = MapSettings::new(&[("AI_GATEWAY_API_KEY", "k")]);
    let config = GatewayConfig::resolve(&lookup).await.unwrap();
    assert_eq!(config.large_model, DEFAULT_LARGE_MODEL);
    assert_eq!(config.small_model, DEFAULT_SMALL_MODEL);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
}

#[tokio::test]
async fn config_environment_beats_default() {
    // A key no other test in this binary resolves, to keep parallel tests
    // independent.
    std::env::set_var("AI_GATEWAY_TRANSCRIPTION_MODEL", "whisper-env");
    let lookup = MapSettings::new(&[("AI_GATEWAY_API_KEY", "k")]);
    let config = GatewayConfig::resolve(&lookup).await.unwrap();
    assert_eq!(config.transcription_model, "whisper-env");
    std::env::remove_var("AI_GATEWAY_TRANSCRIPTION_MODEL");
}

#[tokio::test]
async fn config_setting_beats_environment() {
    std::env::set_var("AI_GATEWAY_TTS_MODEL", "tts-env");
    let lookup = MapSettings::new(&[
        ("AI_GATEWAY_API_KEY", "k"),
        ("AI_GATEWAY_TTS_MODEL", "tts-setting"),
    ]);
    let config = GatewayConfig::resolve(&lookup).await.unwrap();
    assert_eq!(config.tts_model, "tts-setting");
    std::env::remove_var("AI_GATEWAY_TTS_MODEL");
}

#[tokio::test]
async fn config_builder_override_beats_setting() {
    let lookup = MapSettings::new(&[
        ("AI_GATEWAY_API_KEY", "k"),
        ("AI_GATEWAY_LARGE_MODEL", "from-setting"),
    ]);
    let config = GatewayConfig::resolve(&lookup)
        .await
        .unwrap()
        .with_large_model("explicit-override");
    assert_eq!(config.large_model, "explicit-override");
}

#[tokio::test]
async fn config_missing_credential_is_fatal() {
    let lookup = MapSettings::new(&[("AI_GATEWAY_BASE_URL", "https://example.test/v1")]);
    let err = GatewayConfig::resolve(&lookup).await.unwrap_err();
    assert!(matches!(err, GatewayError::MissingCredential(_)));
}

#[tokio::test]
async fn config_oidc_token_is_accepted_as_credential() {
    let lookup = MapSettings::new(&[("VERCEL_OIDC_TOKEN", "oidc")]);
    let config = GatewayConfig::resolve(&lookup).await.unwrap();
    assert_eq!(config.api_key, "oidc");
}

#[tokio::test]
async fn config_shared_max_tokens_fallback() {
    let lookup = MapSettings::new(&[
        ("AI_GATEWAY_API_KEY", "k"),
        ("AI_GATEWAY_MAX_TOKENS", "2048"),
    ]);
    let config = GatewayConfig::resolve(&lookup).await.unwrap();
    assert_eq!(config.max_tokens_small, 2048);
    assert_eq!(config.max_tokens_large, 2048);

    let lookup = MapSettings::new(&[("AI_GATEWAY_API_KEY", "k")]);
    let config = GatewayConfig::resolve(&lookup).await.unwrap();
    assert_eq!(config.max_tokens_small, DEFAULT_MAX_TOKENS);
}

#[test]
fn env_settings_reads_process_environment() {
    std::env::set_var("AIGW_UNIT_ENV_ONLY_KEY", "from-env");
    let value = tokio_test::block_on(EnvSettings.get_setting("AIGW_UNIT_ENV_ONLY_KEY"));
    assert_eq!(value.as_deref(), Some("from-env"));
    std::env::remove_var("AIGW_UNIT_ENV_ONLY_KEY");
}

// ============================================================================
// Temperature support predicate
// ============================================================================

#[test]
fn reasoning_models_reject_temperature() {
    assert!(!model_supports_temperature("gpt-5-mini"));
    assert!(!model_supports_temperature("gpt-5"));
    assert!(!model_supports_temperature("o1-mini"));
    assert!(!model_supports_temperature("o3"));
}

#[test]
fn chat_models_accept_temperature() {
    assert!(model_supports_temperature("gpt-4o"));
    assert!(model_supports_temperature("gpt-4-turbo"));
    assert!(model_supports_temperature("claude-3-5-sonnet"));
    assert!(model_supports_temperature("llama-3.1-70b"));
}

// ============================================================================
// Provider resolution policy
// ============================================================================

#[tokio::test]
async fn only_aggregator_credential_resolves_to_aggregator() {
    let lookup = MapSettings::new(&[("OPENROUTER_API_KEY", "r")]);
    assert_eq!(
        resolve_provider(Provider::OpenAi, &lookup).await,
        Provider::OpenRouter
    );
    assert_eq!(
        resolve_provider(Provider::Groq, &lookup).await,
        Provider::OpenRouter
    );
    assert_eq!(
        resolve_provider(Provider::AiGateway, &lookup).await,
        Provider::OpenRouter
    );
}

#[tokio::test]
async fn preferred_credential_short_circuits_fallback() {
    let lookup = MapSettings::new(&[
        ("GROQ_API_KEY", "q"),
        ("AI_GATEWAY_API_KEY", "g"),
        ("OPENROUTER_API_KEY", "r"),
    ]);
    assert_eq!(
        resolve_provider(Provider::Groq, &lookup).await,
        Provider::Groq
    );
}

#[tokio::test]
async fn resolution_without_credentials_keeps_preferred() {
    let lookup = MapSettings::new(&[]);
    assert_eq!(
        resolve_provider(Provider::Google, &lookup).await,
        Provider::Google
    );
}

// ============================================================================
// Embedding pre-processing and fallback
// ============================================================================

#[test]
fn embedding_truncation_matches_character_budget() {
    let budget = EMBEDDING_MAX_TOKENS * EMBEDDING_CHARS_PER_TOKEN;
    let text = "x".repeat(budget * 2);
    let truncated = truncate_for_embedding(&text);
    assert_eq!(truncated.len(), budget);
    assert!(text.starts_with(truncated));
}

#[test]
fn embedding_fallback_vector_classes() {
    let empty = fallback_vector(8, EMPTY_INPUT_SENTINEL);
    let failed = fallback_vector(8, FAILURE_SENTINEL);
    assert_eq!(empty.len(), 8);
    assert_eq!(empty[0], 0.1);
    assert_eq!(failed[0], 0.2);
    assert!(empty[1..].iter().all(|&v| v == 0.0));
}

// ============================================================================
// Response wrapper
// ============================================================================

#[test]
fn gateway_response_wire_shape() {
    let ok: GatewayResponse<Vec<f32>> = GatewayResponse::ok(vec![1.0]);
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"][0], 1.0);
    assert!(json.get("error").is_none());

    let err: GatewayResponse<Vec<f32>> = GatewayResponse::err("nope");
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "nope");
}
