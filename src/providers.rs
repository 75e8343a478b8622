//! Provider identities and credential-based resolution.
//!
//! Routing is a closed enumeration rather than string comparisons scattered
//! through the handlers: one resolution function decides which backend a call
//! targets, based on which credentials are actually present.

use crate::runtime::{get_setting_or_env, SettingsLookup};

/// Backends this plugin knows how to reach. Declaration order is the scan
/// order of the resolution fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// The generic AI Gateway endpoint (zero-overhead default).
    AiGateway,
    /// Direct OpenAI API.
    OpenAi,
    /// OpenRouter aggregator.
    OpenRouter,
    /// Direct Anthropic API (via OpenAI-compatible surface).
    Anthropic,
    /// Google Generative AI (via OpenAI-compatible surface).
    Google,
    /// xAI API.
    XAi,
    /// Groq API.
    Groq,
}

/// All providers in declaration order.
pub const ALL_PROVIDERS: &[Provider] = &[
    Provider::AiGateway,
    Provider::OpenAi,
    Provider::OpenRouter,
    Provider::Anthropic,
    Provider::Google,
    Provider::XAi,
    Provider::Groq,
];

impl Provider {
    /// Stable provider id used in telemetry and logs.
    pub fn id(&self) -> &'static str {
        match self {
            Self::AiGateway => "aigateway",
            Self::OpenAi => "openai",
            Self::OpenRouter => "openrouter",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::XAi => "xai",
            Self::Groq => "groq",
        }
    }

    /// Setting/environment key holding this provider's credential.
    pub fn credential_key(&self) -> &'static str {
        match self {
            Self::AiGateway => "AI_GATEWAY_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Google => "GOOGLE_GENERATIVE_AI_API_KEY",
            Self::XAi => "XAI_API_KEY",
            Self::Groq => "GROQ_API_KEY",
        }
    }

    /// Default OpenAI-compatible base URL for this provider.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::AiGateway => crate::config::DEFAULT_BASE_URL,
            Self::OpenAi => "https://api.openai.com/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Google => "https://generativelanguage.googleapis.com/v1beta/openai",
            Self::XAi => "https://api.x.ai/v1",
            Self::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Whether a credential for this provider is present.
    pub async fn has_credential(&self, lookup: &dyn SettingsLookup) -> bool {
        if *self == Self::AiGateway {
            // The gateway accepts any of its aliased credentials.
            for key in ["AI_GATEWAY_API_KEY", "AIGATEWAY_API_KEY", "VERCEL_OIDC_TOKEN"] {
                if get_setting_or_env(lookup, key).await.is_some() {
                    return true;
                }
            }
            return false;
        }
        get_setting_or_env(lookup, self.credential_key())
            .await
            .is_some()
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Pick the backend for a call preferring `preferred`, falling back by
/// credential availability.
///
/// Order: the preferred provider if its credential is present; else the
/// gateway; else OpenRouter; else the first credentialed provider in
/// [`ALL_PROVIDERS`] order; else `preferred` unchanged, so the subsequent
/// request fails with a real missing-credential or auth error instead of
/// silently doing nothing.
pub async fn resolve_provider(preferred: Provider, lookup: &dyn SettingsLookup) -> Provider {
    if preferred.has_credential(lookup).await {
        return preferred;
    }
    if Provider::AiGateway.has_credential(lookup).await {
        return Provider::AiGateway;
    }
    if Provider::OpenRouter.has_credential(lookup).await {
        return Provider::OpenRouter;
    }
    for &provider in ALL_PROVIDERS {
        if provider.has_credential(lookup).await {
            return provider;
        }
    }
    preferred
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapSettings(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl crate::runtime::SettingsLookup for MapSettings {
        async fn get_setting(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    fn creds(pairs: &[(&'static str, &'static str)]) -> MapSettings {
        MapSettings(pairs.iter().copied().collect())
    }

    #[tokio::test]
    async fn test_preferred_provider_wins_when_credentialed() {
        let lookup = creds(&[("XAI_API_KEY", "x"), ("AI_GATEWAY_API_KEY", "g")]);
        let resolved = resolve_provider(Provider::XAi, &lookup).await;
        assert_eq!(resolved, Provider::XAi);
    }

    #[tokio::test]
    async fn test_gateway_is_first_fallback() {
        let lookup = creds(&[("AI_GATEWAY_API_KEY", "g"), ("OPENROUTER_API_KEY", "r")]);
        let resolved = resolve_provider(Provider::OpenAi, &lookup).await;
        assert_eq!(resolved, Provider::AiGateway);
    }

    #[tokio::test]
    async fn test_openrouter_is_second_fallback() {
        let lookup = creds(&[("OPENROUTER_API_KEY", "r")]);
        let resolved = resolve_provider(Provider::OpenAi, &lookup).await;
        assert_eq!(resolved, Provider::OpenRouter);
    }

    #[tokio::test]
    async fn test_scan_order_is_declaration_order() {
        let lookup = creds(&[("GROQ_API_KEY", "q"), ("XAI_API_KEY", "x")]);
        let resolved = resolve_provider(Provider::OpenAi, &lookup).await;
        assert_eq!(resolved, Provider::XAi);
    }

    #[tokio::test]
    async fn test_no_credentials_returns_preferred_unchanged() {
        let lookup = creds(&[]);
        let resolved = resolve_provider(Provider::Anthropic, &lookup).await;
        assert_eq!(resolved, Provider::Anthropic);
    }

    #[tokio::test]
    async fn test_gateway_alias_credentials_count() {
        let lookup = creds(&[("VERCEL_OIDC_TOKEN", "t")]);
        assert!(Provider::AiGateway.has_credential(&lookup).await);
        let resolved = resolve_provider(Provider::OpenAi, &lookup).await;
        assert_eq!(resolved, Provider::AiGateway);
    }
}
