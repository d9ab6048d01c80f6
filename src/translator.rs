use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::language;
use crate::metrics::TRANSLATION_FAILURES;

pub const AUTO_SOURCE: &str = "auto";
pub const DEFAULT_CHUNK_SIZE: usize = 5000;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed translation response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> Result<String, TranslateError>;

    fn provider_name(&self) -> &str;
}

/// Google's keyless `translate_a/single` endpoint.
#[derive(Clone, Debug)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> Result<String, TranslateError> {
        let url = url::Url::parse_with_params(
            &self.base_url,
            &[
                ("client", "gtx"),
                ("sl", source_code),
                ("tl", target_code),
                ("dt", "t"),
            ],
        )
        .map_err(|e| TranslateError::Malformed(format!("invalid translate url: {e}")))?;

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("q", text)
            .finish();

        let res = self
            .client
            .post(url.as_str())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded;charset=utf-8",
            )
            .body(body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(TranslateError::Api { status, body });
        }

        let json: JsonValue = res.json().await?;
        join_segments(&json)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}

// Response shape: [[["translated", "source", ...], ...], null, "detected-lang", ...]
fn join_segments(json: &JsonValue) -> Result<String, TranslateError> {
    let segments = json
        .get(0)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| TranslateError::Malformed("missing segment list".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(JsonValue::as_str))
        .collect())
}

/// Split `text` into contiguous pieces of at most `chunk_size` characters.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Translate `text` into the language called `target_language`.
///
/// Never fails: an unknown language or a service error comes back as a
/// descriptive message in place of the translation.
pub async fn translate_text(
    translator: &dyn Translator,
    text: &str,
    target_language: &str,
    chunk_size: usize,
) -> String {
    let Some(target_code) = language::resolve(target_language) else {
        TRANSLATION_FAILURES.inc();
        return format!("Language '{target_language}' is not supported.");
    };

    if text.is_empty() {
        return String::new();
    }

    let result = if text.chars().count() <= chunk_size {
        translator.translate(text, AUTO_SOURCE, &target_code).await
    } else {
        translate_chunks(translator, text, &target_code, chunk_size).await
    };

    match result {
        Ok(translated) => translated,
        Err(e) => {
            TRANSLATION_FAILURES.inc();
            tracing::warn!(
                provider = translator.provider_name(),
                target = %target_code,
                error = %e,
                "translation failed"
            );
            format!("An error occurred: {e}")
        }
    }
}

async fn translate_chunks(
    translator: &dyn Translator,
    text: &str,
    target_code: &str,
    chunk_size: usize,
) -> Result<String, TranslateError> {
    let chunks = chunk_text(text, chunk_size);
    tracing::debug!(chunks = chunks.len(), "translating oversized text in chunks");

    let mut translated = String::with_capacity(text.len());
    for chunk in &chunks {
        translated.push_str(&translator.translate(chunk, AUTO_SOURCE, target_code).await?);
    }
    Ok(translated)
}
