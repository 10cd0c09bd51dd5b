//! LibreTranslate-compatible detection and translation client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{truncate_chars, LanguageDetector, Translator, MAX_TRANSLATE_CHARS};
use crate::error::ServiceError;

#[derive(Clone)]
pub struct LibreTranslateClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for LibreTranslateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibreTranslateClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl LibreTranslateClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn post<B, R>(
        &self,
        path: &str,
        body: &B,
        service: &'static str,
    ) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service,
                status,
                body,
            });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl LanguageDetector for LibreTranslateClient {
    async fn detect(&self, text: &str) -> Result<String, ServiceError> {
        let body = DetectRequest {
            q: truncate_chars(text, MAX_TRANSLATE_CHARS),
            api_key: self.api_key.as_deref(),
        };
        let candidates: Vec<DetectedLanguage> = self.post("/detect", &body, "detect").await?;

        // Results come back ranked; only the top guess matters.
        candidates
            .into_iter()
            .next()
            .map(|c| c.language)
            .filter(|code| !code.is_empty())
            .ok_or(ServiceError::EmptyResult("detect"))
    }
}

#[async_trait]
impl Translator for LibreTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ServiceError> {
        let body = TranslateRequest {
            q: truncate_chars(text, MAX_TRANSLATE_CHARS),
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };
        let resp: TranslateResponse = self.post("/translate", &body, "translate").await?;
        Ok(resp.translated_text)
    }
}

// ── API request/response types ─────────────────────────────────────────────

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct DetectedLanguage {
    language: String,
    #[allow(dead_code)]
    #[serde(default)]
    confidence: f64,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    #[serde(default)]
    translated_text: String,
}
