//! Adapters over the external language and speech services.

pub mod speech;
pub mod translate;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ServiceError;

pub use speech::HttpSpeechClient;
pub use translate::LibreTranslateClient;

/// Character limit accepted by the detection and translation services.
pub const MAX_TRANSLATE_CHARS: usize = 5000;

/// Character limit accepted by the speech service.
pub const MAX_SPEECH_CHARS: usize = 3000;

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Best-guess ISO language code for `text`.
    async fn detect(&self, text: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str)
        -> Result<String, ServiceError>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with `voice` and return the complete MP3 buffer.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes, ServiceError>;
}

/// Cut `text` to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
