//! Gateway HTTP client.
//!
//! Async client for the gateway's OpenAI-compatible surface using reqwest.
//! Request timeouts are enforced at the client level; dropping an in-flight
//! response (including a partially consumed stream) releases the underlying
//! connection on every exit path.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, Response,
};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::config::{model_supports_temperature, GatewayConfig};
use crate::error::{GatewayError, Result};
use crate::types::{
    ChatCompletionResponse, ChatMessage, EmbeddingParams, EmbeddingResponse,
    ImageDescriptionParams, ImageDescriptionResult, ImageGenerationParams,
    ImageGenerationResponse, ImageGenerationResult, ModelInfo, ModelsResponse,
    ObjectGenerationParams, TextGenerationParams, TextResult, TextToSpeechParams,
    TranscriptionParams,
};

/// Default analysis prompt for image description. A caller-supplied prompt
/// different from this one bypasses title/description splitting.
pub const DEFAULT_IMAGE_DESCRIPTION_PROMPT: &str =
    "Please analyze this image and provide a title and detailed description.";

/// Placeholder title when the model reply carries no title marker.
pub const FALLBACK_IMAGE_TITLE: &str = "Image Analysis";

/// Server-Sent-Events data line marker.
const SSE_DATA_PREFIX: &str = "data:";

/// Literal payload signaling the end of a chat stream.
const SSE_DONE_SENTINEL: &str = "[DONE]";

lazy_static! {
    static ref TITLE_REGEX: Regex =
        Regex::new(r"(?i)title[:\s]+(.+?)(?:\n|$)").expect("title pattern is valid");
}

/// Finite, non-restartable stream of text fragments from a chat completion.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Gateway API client.
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
    models_cache: RwLock<Option<Vec<ModelInfo>>>,
}

impl GatewayClient {
    /// Create a new client from a resolved configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::MissingCredential(
                "API key must not be empty".to_string(),
            ));
        }
        Url::parse(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| GatewayError::ConfigError(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            models_cache: RwLock::new(None),
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Chat and embeddings honor the OpenAI-compatible URL override.
    fn compat_url(&self, endpoint: &str) -> String {
        let base = self
            .config
            .openai_compatible_url
            .as_deref()
            .unwrap_or(&self.config.base_url);
        format!("{}{}", base.trim_end_matches('/'), endpoint)
    }

    async fn check_response(&self, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string();
        let body = response.text().await.unwrap_or_default();

        // Prefer the provider's own error message when the body is JSON.
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or(if body.is_empty() { status_text } else { body });

        Err(GatewayError::Api { status, message })
    }

    fn chat_body(&self, params: &TextGenerationParams, model: &str) -> serde_json::Value {
        let mut messages: Vec<ChatMessage> = Vec::new();
        if let Some(system) = &params.system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: Some(system.clone()),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: Some(params.prompt.clone()),
        });

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if model_supports_temperature(model) {
            if let Some(temp) = params.temperature {
                body["temperature"] = serde_json::json!(temp);
            }
            if let Some(fp) = params.frequency_penalty {
                body["frequency_penalty"] = serde_json::json!(fp);
            }
            if let Some(pp) = params.presence_penalty {
                body["presence_penalty"] = serde_json::json!(pp);
            }
            if let Some(stop) = &params.stop_sequences {
                body["stop"] = serde_json::json!(stop);
            }
            if let Some(max) = params.max_tokens {
                body["max_tokens"] = serde_json::json!(max);
            }
        } else if let Some(max) = params.max_tokens {
            // Reasoning models take max_completion_tokens and reject
            // sampling parameters outright.
            body["max_completion_tokens"] = serde_json::json!(max);
        }

        body
    }

    // =========================================================================
    // Text generation
    // =========================================================================

    /// Generate text via chat completions.
    pub async fn generate_text(&self, params: &TextGenerationParams) -> Result<TextResult> {
        let model = params.model.as_deref().unwrap_or(&self.config.large_model);
        debug!("Generating text with model: {}", model);

        let body = self.chat_body(params, model);
        let response = self
            .client
            .post(self.compat_url("/chat/completions"))
            .json(&body)
            .send()
            .await?;
        let response = self.check_response(response).await?;

        let completion: ChatCompletionResponse = response.json().await?;
        normalize_chat_response(completion)
    }

    /// Stream text fragments from a chat completion.
    ///
    /// The stream ends when the server sends the `[DONE]` sentinel; no
    /// further bytes are read past it. Dropping the stream early closes the
    /// connection.
    pub async fn stream_text(&self, params: &TextGenerationParams) -> Result<TextStream> {
        let model = params.model.as_deref().unwrap_or(&self.config.large_model);
        debug!("Streaming text with model: {}", model);

        let mut body = self.chat_body(params, model);
        body["stream"] = serde_json::json!(true);

        let response = self
            .client
            .post(self.compat_url("/chat/completions"))
            .json(&body)
            .send()
            .await?;
        let response = self.check_response(response).await?;

        let inner = response.bytes_stream().boxed();
        let state = (inner, SseDecoder::new(), VecDeque::<String>::new());

        let stream = futures::stream::unfold(state, |(mut inner, mut decoder, mut queue)| async move {
            loop {
                if let Some(fragment) = queue.pop_front() {
                    return Some((Ok(fragment), (inner, decoder, queue)));
                }
                if decoder.is_done() {
                    return None;
                }
                match inner.next().await {
                    Some(Ok(bytes)) => queue.extend(decoder.feed(&bytes)),
                    Some(Err(e)) => {
                        decoder.close();
                        return Some((Err(GatewayError::from(e)), (inner, decoder, queue)));
                    }
                    None => return None,
                }
            }
        });

        Ok(Box::pin(stream))
    }

    // =========================================================================
    // Embeddings
    // =========================================================================

    /// Create an embedding vector for text.
    pub async fn create_embedding(&self, params: &EmbeddingParams) -> Result<Vec<f32>> {
        let model = params
            .model
            .as_deref()
            .unwrap_or(&self.config.embedding_model);
        debug!("Creating embedding with model: {}", model);

        let mut body = serde_json::json!({
            "model": model,
            "input": params.text,
        });
        if let Some(dims) = params.dimensions {
            body["dimensions"] = serde_json::json!(dims);
        }

        let response = self
            .client
            .post(self.compat_url("/embeddings"))
            .json(&body)
            .send()
            .await?;
        let response = self.check_response(response).await?;

        let embedding_response: EmbeddingResponse = response.json().await?;
        embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(GatewayError::EmptyEmbedding)
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Generate images.
    pub async fn generate_image(
        &self,
        params: &ImageGenerationParams,
    ) -> Result<Vec<ImageGenerationResult>> {
        let model = params.model.as_deref().unwrap_or(&self.config.image_model);
        debug!("Generating image with model: {}", model);

        let mut body = serde_json::json!({
            "model": model,
            "prompt": params.prompt,
        });
        if let Some(n) = params.n {
            body["n"] = serde_json::json!(n);
        }
        if let Some(size) = &params.size {
            body["size"] = serde_json::to_value(size)?;
        }
        if let Some(quality) = &params.quality {
            body["quality"] = serde_json::to_value(quality)?;
        }
        if let Some(style) = &params.style {
            body["style"] = serde_json::to_value(style)?;
        }

        let response = self
            .client
            .post(self.url("/images/generations"))
            .json(&body)
            .send()
            .await?;
        let response = self.check_response(response).await?;

        let image_response: ImageGenerationResponse = response.json().await?;
        Ok(image_response
            .data
            .into_iter()
            .map(normalize_image_item)
            .collect())
    }

    /// Describe an image using the vision-capable chat endpoint.
    pub async fn describe_image(
        &self,
        params: &ImageDescriptionParams,
    ) -> Result<ImageDescriptionResult> {
        let model = params
            .model
            .as_deref()
            .unwrap_or(&self.config.image_description_model);
        let prompt = params
            .prompt
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_DESCRIPTION_PROMPT);
        let max_tokens = params.max_tokens.unwrap_or(self.config.max_tokens_large);
        debug!("Describing image with model: {}", model);

        let body = serde_json::json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": prompt},
                    {"type": "image_url", "image_url": {"url": params.image_url}}
                ]
            }],
            "max_tokens": max_tokens
        });

        let response = self
            .client
            .post(self.compat_url("/chat/completions"))
            .json(&body)
            .send()
            .await?;
        let response = self.check_response(response).await?;

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or(GatewayError::EmptyResponse)?;

        // Callers asking for a specific format get the reply untouched.
        if prompt != DEFAULT_IMAGE_DESCRIPTION_PROMPT {
            return Ok(ImageDescriptionResult {
                title: FALLBACK_IMAGE_TITLE.to_string(),
                description: content,
            });
        }

        Ok(split_title_description(&content))
    }

    // =========================================================================
    // Structured objects
    // =========================================================================

    /// Generate a structured JSON object.
    pub async fn generate_object(
        &self,
        params: &ObjectGenerationParams,
    ) -> Result<serde_json::Value> {
        let model = params
            .model
            .clone()
            .unwrap_or_else(|| self.config.small_model.clone());

        let mut text_params =
            TextGenerationParams::new(object_prompt(&params.prompt, params.schema.as_ref()))
                .model(model);
        if let Some(temp) = params.temperature {
            text_params = text_params.temperature(temp);
        }

        let result = self.generate_text(&text_params).await?;
        parse_object_response(&result.text)
    }

    // =========================================================================
    // Audio
    // =========================================================================

    /// Transcribe audio via multipart upload.
    pub async fn transcribe_audio(&self, params: &TranscriptionParams) -> Result<String> {
        let model = params
            .model
            .as_deref()
            .unwrap_or(&self.config.transcription_model);
        let format = crate::audio::detect_audio_format(&params.audio);
        debug!(
            "Transcribing {} bytes ({}) with model: {}",
            params.audio.len(),
            format.mime_type(),
            model
        );

        let part = Part::bytes(params.audio.clone())
            .file_name(crate::audio::upload_filename(&params.audio))
            .mime_str(format.mime_type())
            .map_err(|e| GatewayError::ConfigError(e.to_string()))?;

        let mut form = Form::new().text("model", model.to_string()).part("file", part);
        if let Some(language) = &params.language {
            form = form.text("language", language.clone());
        }
        if let Some(prompt) = &params.prompt {
            form = form.text("prompt", prompt.clone());
        }
        if let Some(temp) = params.temperature {
            form = form.text("temperature", temp.to_string());
        }

        let response = self
            .client
            .post(self.url("/audio/transcriptions"))
            .multipart(form)
            .send()
            .await?;
        let response = self.check_response(response).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.contains("application/json") {
            let parsed: crate::types::TranscriptionResponse = response.json().await?;
            Ok(parsed.text)
        } else {
            Ok(response.text().await?)
        }
    }

    /// Convert text to speech; returns the raw audio bytes.
    pub async fn text_to_speech(&self, params: &TextToSpeechParams) -> Result<Bytes> {
        let model = params.model.as_deref().unwrap_or(&self.config.tts_model);
        let voice = params.voice.as_deref().unwrap_or(&self.config.tts_voice);
        debug!("Text-to-speech with model: {}", model);

        let mut body = serde_json::json!({
            "model": model,
            "input": params.text,
            "voice": voice,
        });
        if let Some(speed) = params.speed {
            body["speed"] = serde_json::json!(speed);
        }
        if let Some(format) = &params.response_format {
            body["response_format"] = serde_json::json!(format);
        }
        if let Some(instructions) = &params.instructions {
            body["instructions"] = serde_json::json!(instructions);
        }

        let response = self
            .client
            .post(self.url("/audio/speech"))
            .json(&body)
            .send()
            .await?;
        let response = self.check_response(response).await?;

        Ok(response.bytes().await?)
    }

    // =========================================================================
    // Models
    // =========================================================================

    /// List models exposed by the gateway.
    ///
    /// The result is cached after the first successful call; it is only
    /// refreshed when `force_refresh` is set.
    pub async fn list_models(&self, force_refresh: bool) -> Result<Vec<ModelInfo>> {
        if !force_refresh {
            if let Some(cached) = self.models_cache.read().await.as_ref() {
                return Ok(cached.clone());
            }
        }

        debug!("Listing gateway models");
        let response = self.client.get(self.url("/models")).send().await?;
        let response = self.check_response(response).await?;
        let models: ModelsResponse = response.json().await?;

        let mut cache = self.models_cache.write().await;
        *cache = Some(models.data.clone());
        Ok(models.data)
    }
}

// ============================================================================
// Normalizers
// ============================================================================

fn normalize_chat_response(completion: ChatCompletionResponse) -> Result<TextResult> {
    let usage = completion.usage.map(Into::into);
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| TextResult { text, usage })
        .ok_or(GatewayError::EmptyResponse)
}

/// Normalize one image item: hosted URL, inline base64 as a data URI, or an
/// empty string when the provider sent neither.
fn normalize_image_item(item: crate::types::ImageData) -> ImageGenerationResult {
    let url = match (item.url, item.b64_json) {
        (Some(url), _) => url,
        (None, Some(b64)) => {
            let mime = item.mime_type.as_deref().unwrap_or("image/png");
            format!("data:{};base64,{}", mime, b64)
        }
        (None, None) => String::new(),
    };
    ImageGenerationResult {
        url,
        revised_prompt: item.revised_prompt,
    }
}

/// Split a free-text analysis reply into title and description.
fn split_title_description(content: &str) -> ImageDescriptionResult {
    match TITLE_REGEX.captures(content).and_then(|c| c.get(1)) {
        Some(title) => ImageDescriptionResult {
            title: title.as_str().trim().to_string(),
            description: TITLE_REGEX.replace(content, "").trim().to_string(),
        },
        None => ImageDescriptionResult {
            title: FALLBACK_IMAGE_TITLE.to_string(),
            description: content.to_string(),
        },
    }
}

fn object_prompt(prompt: &str, schema: Option<&serde_json::Value>) -> String {
    match schema {
        Some(schema) => format!(
            "{}\n\nRespond with only valid JSON matching this schema: {}",
            prompt, schema
        ),
        None => format!("{}\n\nRespond with only valid JSON.", prompt),
    }
}

/// Strip a surrounding fenced code block (with or without a language tag).
fn strip_code_fences(text: &str) -> &str {
    let mut t = text.trim();
    if let Some(rest) = t.strip_prefix("```") {
        t = match rest.find('\n') {
            Some(i) => &rest[i + 1..],
            None => rest,
        };
    }
    if let Some(rest) = t.trim_end().strip_suffix("```") {
        t = rest;
    }
    t.trim()
}

fn parse_object_response(text: &str) -> Result<serde_json::Value> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(cleaned).map_err(|e| GatewayError::InvalidJson {
        message: e.to_string(),
        raw: text.to_string(),
    })
}

// ============================================================================
// SSE decoding
// ============================================================================

/// Incremental decoder for an OpenAI-style chat completion event stream.
///
/// Bytes are buffered until a full newline-terminated line is available;
/// the remainder carries over to the next read, so content is identical no
/// matter where the network splits the stream, including mid-UTF-8-sequence.
/// Lines without the `data:` marker are ignored, the `[DONE]` payload closes
/// the decoder, and payloads that fail to parse are skipped without ending
/// the stream.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    /// New decoder with an empty carry-over buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the termination sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Stop decoding; subsequent feeds return nothing.
    pub fn close(&mut self) {
        self.done = true;
        self.buffer.clear();
    }

    /// Feed one network chunk; returns the content fragments completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }

        self.buffer.extend_from_slice(chunk);

        let mut fragments = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
            // Only complete lines reach text conversion; partial multibyte
            // sequences stay in the buffer.
            let line = String::from_utf8_lossy(&line_bytes);
            let line = line.trim_end_matches(['\n', '\r']);

            let Some(payload) = line.strip_prefix(SSE_DATA_PREFIX) else {
                continue;
            };
            let payload = payload.trim_start();

            if payload == SSE_DONE_SENTINEL {
                self.close();
                break;
            }

            match serde_json::from_str::<serde_json::Value>(payload) {
                Ok(chunk) => {
                    if let Some(content) = chunk["choices"][0]["delta"]["content"].as_str() {
                        fragments.push(content.to_string());
                    }
                }
                Err(e) => {
                    // One bad chunk must not kill the stream.
                    warn!("Skipping malformed stream chunk: {}", e);
                }
            }
        }

        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_line(content: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{}\"}}}}]}}\n",
            content
        )
    }

    #[test]
    fn test_decoder_whole_line() {
        let mut decoder = SseDecoder::new();
        let fragments = decoder.feed(delta_line("Hello").as_bytes());
        assert_eq!(fragments, vec!["Hello"]);
        assert!(!decoder.is_done());
    }

    #[test]
    fn test_decoder_split_boundary_invariance() {
        let line = delta_line("Hello, world");
        let whole = SseDecoder::new().feed(line.as_bytes());

        let bytes = line.as_bytes();
        for split in 1..bytes.len() {
            let mut decoder = SseDecoder::new();
            let mut fragments = decoder.feed(&bytes[..split]);
            fragments.extend(decoder.feed(&bytes[split..]));
            assert_eq!(fragments, whole, "split at byte {}", split);
        }
    }

    #[test]
    fn test_decoder_done_sentinel_stops_processing() {
        let mut decoder = SseDecoder::new();
        let input = format!("{}data: [DONE]\n{}", delta_line("a"), delta_line("b"));
        let fragments = decoder.feed(input.as_bytes());
        assert_eq!(fragments, vec!["a"]);
        assert!(decoder.is_done());
        // Everything after the sentinel is discarded.
        assert!(decoder.feed(delta_line("c").as_bytes()).is_empty());
    }

    #[test]
    fn test_decoder_skips_malformed_json() {
        let mut decoder = SseDecoder::new();
        let input = format!("data: {{not json\n{}", delta_line("ok"));
        let fragments = decoder.feed(input.as_bytes());
        assert_eq!(fragments, vec!["ok"]);
        assert!(!decoder.is_done());
    }

    #[test]
    fn test_decoder_ignores_non_data_lines() {
        let mut decoder = SseDecoder::new();
        let input = format!(": keep-alive\nevent: ping\n\n{}", delta_line("x"));
        assert_eq!(decoder.feed(input.as_bytes()), vec!["x"]);
    }

    #[test]
    fn test_decoder_holds_incomplete_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: {\"choices\"").is_empty());
        assert!(!decoder.is_done());
    }

    #[test]
    fn test_decoder_handles_crlf() {
        let mut decoder = SseDecoder::new();
        let input = "data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\r\n";
        assert_eq!(decoder.feed(input.as_bytes()), vec!["hi"]);
    }

    #[test]
    fn test_strip_code_fences() {
        let plain = r#"{"a":1}"#;
        assert_eq!(strip_code_fences(plain), plain);
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), plain);
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), plain);
        assert_eq!(strip_code_fences("  ```json\n{\"a\":1}\n```  "), plain);
    }

    #[test]
    fn test_parse_object_response_fenced_equals_plain() {
        let fenced = parse_object_response("```json\n{\"name\":\"Test\"}\n```").unwrap();
        let plain = parse_object_response("{\"name\":\"Test\"}").unwrap();
        assert_eq!(fenced, plain);
    }

    #[test]
    fn test_parse_object_response_error_carries_raw_text() {
        let err = parse_object_response("definitely not json").unwrap_err();
        match err {
            GatewayError::InvalidJson { raw, .. } => assert_eq!(raw, "definitely not json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_split_title_description() {
        let result = split_title_description("Title: Robot\nA small robot.");
        assert_eq!(result.title, "Robot");
        assert_eq!(result.description, "A small robot.");
    }

    #[test]
    fn test_split_title_description_case_insensitive() {
        let result = split_title_description("TITLE: Sunset Beach\nWaves at dusk.");
        assert_eq!(result.title, "Sunset Beach");
        assert_eq!(result.description, "Waves at dusk.");
    }

    #[test]
    fn test_split_title_description_without_marker() {
        let result = split_title_description("Just a plain description.");
        assert_eq!(result.title, FALLBACK_IMAGE_TITLE);
        assert_eq!(result.description, "Just a plain description.");
    }

    #[test]
    fn test_normalize_image_item_variants() {
        let hosted = normalize_image_item(crate::types::ImageData {
            url: Some("https://img.example/1.png".to_string()),
            b64_json: None,
            mime_type: None,
            revised_prompt: Some("revised".to_string()),
        });
        assert_eq!(hosted.url, "https://img.example/1.png");
        assert_eq!(hosted.revised_prompt.as_deref(), Some("revised"));

        let inline = normalize_image_item(crate::types::ImageData {
            url: None,
            b64_json: Some("aGk=".to_string()),
            mime_type: Some("image/webp".to_string()),
            revised_prompt: None,
        });
        assert_eq!(inline.url, "data:image/webp;base64,aGk=");

        let inline_default_mime = normalize_image_item(crate::types::ImageData {
            url: None,
            b64_json: Some("aGk=".to_string()),
            mime_type: None,
            revised_prompt: None,
        });
        assert_eq!(inline_default_mime.url, "data:image/png;base64,aGk=");

        let empty = normalize_image_item(crate::types::ImageData {
            url: None,
            b64_json: None,
            mime_type: None,
            revised_prompt: None,
        });
        assert_eq!(empty.url, "");
    }

    #[test]
    fn test_object_prompt_mentions_schema() {
        let schema = serde_json::json!({"type": "object"});
        let with_schema = object_prompt("Make a thing.", Some(&schema));
        assert!(with_schema.starts_with("Make a thing."));
        assert!(with_schema.contains("matching this schema"));

        let without = object_prompt("Make a thing.", None);
        assert!(without.contains("only valid JSON"));
    }

    #[test]
    fn test_normalize_chat_response_empty() {
        let completion: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            normalize_chat_response(completion),
            Err(GatewayError::EmptyResponse)
        ));

        let null_content: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        )
        .unwrap();
        assert!(matches!(
            normalize_chat_response(null_content),
            Err(GatewayError::EmptyResponse)
        ));
    }

    #[test]
    fn test_normalize_chat_response_verbatim() {
        let completion: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  spaced  "}}]}"#,
        )
        .unwrap();
        let result = normalize_chat_response(completion).unwrap();
        assert_eq!(result.text, "  spaced  ");
        assert!(result.usage.is_none());
    }
}
