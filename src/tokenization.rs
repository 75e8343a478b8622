//! Tokenizer encode/decode for the gateway's model family.
//!
//! Uses tiktoken-rs; unknown model ids fall back along the GPT family chain
//! so tokenization never fails just because a gateway-routed model id is not
//! in the tiktoken registry.

use tiktoken_rs::{get_bpe_from_model, CoreBPE};

use crate::error::{GatewayError, Result};

fn tokenizer_for(model: &str) -> Result<CoreBPE> {
    if let Ok(bpe) = get_bpe_from_model(model) {
        return Ok(bpe);
    }

    let fallback = if model.contains("4o") || model.contains("gpt-5") {
        "gpt-4o"
    } else if model.contains('4') {
        "gpt-4"
    } else {
        "gpt-3.5-turbo"
    };
    get_bpe_from_model(fallback).map_err(|e| GatewayError::TokenizerError(e.to_string()))
}

/// Encode text into token ids using the model's tokenizer.
pub fn tokenize(text: &str, model: &str) -> Result<Vec<u32>> {
    let bpe = tokenizer_for(model)?;
    Ok(bpe.encode_with_special_tokens(text))
}

/// Decode token ids back into text.
pub fn detokenize(tokens: &[u32], model: &str) -> Result<String> {
    let bpe = tokenizer_for(model)?;
    bpe.decode(tokens.to_vec())
        .map_err(|e| GatewayError::TokenizerError(e.to_string()))
}

/// Number of tokens in `text` under the model's tokenizer.
pub fn count_tokens(text: &str, model: &str) -> Result<usize> {
    Ok(tokenize(text, model)?.len())
}

/// Truncate text to at most `max_tokens` tokens.
pub fn truncate_to_token_limit(text: &str, max_tokens: usize, model: &str) -> Result<String> {
    let tokens = tokenize(text, model)?;
    if tokens.len() <= max_tokens {
        return Ok(text.to_string());
    }
    detokenize(&tokens[..max_tokens], model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let text = "Hello, gateway!";
        let tokens = tokenize(text, "gpt-4o").unwrap();
        assert!(!tokens.is_empty());
        assert_eq!(detokenize(&tokens, "gpt-4o").unwrap(), text);
    }

    #[test]
    fn test_unknown_model_falls_back() {
        // Gateway model ids are not in the tiktoken registry.
        let tokens = tokenize("fallback works", "gpt-5-mini").unwrap();
        assert!(!tokens.is_empty());
    }

    #[test]
    fn test_count_tokens() {
        let count = count_tokens("Hello world", "gpt-4o").unwrap();
        assert!(count > 0 && count < 10);
    }

    #[test]
    fn test_truncate_to_token_limit() {
        let text = "This is a longer piece of text that should be truncated somewhere.";
        let truncated = truncate_to_token_limit(text, 5, "gpt-4o").unwrap();
        assert!(count_tokens(&truncated, "gpt-4o").unwrap() <= 5);
        assert!(text.starts_with(&truncated));
    }
}
