//! HTTP speech-synthesis client.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;

use super::{truncate_chars, SpeechSynthesizer, MAX_SPEECH_CHARS};
use crate::error::ServiceError;

#[derive(Debug, Clone)]
pub struct HttpSpeechClient {
    client: Client,
    url: String,
}

impl HttpSpeechClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechClient {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes, ServiceError> {
        let body = SpeakRequest {
            text: truncate_chars(text, MAX_SPEECH_CHARS),
            voice,
            format: "mp3",
        };

        let resp = self.client.post(&self.url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                service: "speech",
                status,
                body,
            });
        }

        let mut audio = BytesMut::new();
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }

        tracing::debug!("Synthesized {} bytes with voice {}", audio.len(), voice);
        Ok(audio.freeze())
    }
}

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
    voice: &'a str,
    format: &'a str,
}
