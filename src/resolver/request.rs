use serde::Deserialize;
use serde_json::Value;

use crate::error::ResolveError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    Chat,
    Ebook,
    Sketch,
    Video,
    Audio,
    /// Anything else the caller sent; always ends in a 400.
    Unsupported(String),
}

impl Format {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("") {
            "" | "chat" => Format::Chat,
            "ebook" => Format::Ebook,
            "sketch" => Format::Sketch,
            "video" => Format::Video,
            "audio" => Format::Audio,
            other => Format::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Format::Chat => "chat",
            Format::Ebook => "ebook",
            Format::Sketch => "sketch",
            Format::Video => "video",
            Format::Audio => "audio",
            Format::Unsupported(s) => s,
        }
    }

    /// Extension of the pre-rendered file for media formats.
    pub fn media_extension(&self) -> Option<&'static str> {
        match self {
            Format::Ebook => Some("pdf"),
            Format::Sketch => Some("png"),
            Format::Video => Some("mp4"),
            Format::Audio => Some("mp3"),
            Format::Chat | Format::Unsupported(_) => None,
        }
    }
}

/// Incoming request after parsing. `message` is guaranteed non-blank.
#[derive(Debug, Clone)]
pub struct Request {
    pub format: Format,
    pub message: String,
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRequest {
    format: Option<String>,
    message: Option<String>,
    language: Option<String>,
}

/// Function-style invocation event; only `body` is read.
#[derive(Debug, Default, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub body: Value,
}

impl Request {
    /// Parse an event body that is either JSON text or an already-decoded object.
    pub fn from_body(body: &Value) -> Result<Self, ResolveError> {
        let raw: RawRequest = match body {
            Value::Null => RawRequest::default(),
            Value::String(text) => serde_json::from_str(text)?,
            other => RawRequest::deserialize(other)?,
        };

        let message = raw.message.unwrap_or_default();
        if message.trim().is_empty() {
            return Err(ResolveError::EmptyPrompt);
        }

        Ok(Self {
            format: Format::parse(raw.format.as_deref()),
            message,
            language: raw.language,
        })
    }
}
