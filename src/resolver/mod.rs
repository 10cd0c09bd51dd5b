//! Request resolution: language handling, topic/knowledge matching and
//! response assembly.

pub mod content;
pub mod envelope;
pub mod request;
pub mod tables;

use std::sync::Arc;

use base64::Engine;
use serde_json::Value;

use crate::error::ResolveError;
use crate::services::{LanguageDetector, SpeechSynthesizer, Translator};

pub use content::ContentStore;
pub use envelope::{Envelope, Reply};
pub use request::{Event, Format, Request};

/// Canonical language used for topic matching.
pub const CANONICAL_LANGUAGE: &str = "en";

pub struct Resolver {
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<dyn Translator>,
    speech: Arc<dyn SpeechSynthesizer>,
    content: ContentStore,
}

impl Resolver {
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        translator: Arc<dyn Translator>,
        speech: Arc<dyn SpeechSynthesizer>,
        content: ContentStore,
    ) -> Self {
        Self {
            detector,
            translator,
            speech,
            content,
        }
    }

    pub async fn handle(&self, event: &Event) -> Envelope {
        self.handle_body(&event.body).await
    }

    /// Resolve one request body into exactly one 200 or 400 envelope.
    pub async fn handle_body(&self, body: &Value) -> Envelope {
        tracing::debug!("Received body: {}", body);

        match self.resolve(body).await {
            Ok(reply) => Envelope::success(&reply),
            Err(e) => e.to_envelope(),
        }
    }

    async fn resolve(&self, body: &Value) -> Result<Reply, ResolveError> {
        let request = Request::from_body(body)?;
        tracing::info!(
            "Parsed request: format={} language={:?}",
            request.format.as_str(),
            request.language
        );

        // 1. Detect language
        let detected = self.detect_language(&request.message).await;

        // 2. Normalize to English for topic matching
        let english = self.to_canonical(&request.message, &detected).await;

        // 3. Preloaded media
        if let Some(slug) = tables::match_topic(&english.to_lowercase()) {
            if let Some(file_url) = self.content.url_for(&request.format, slug) {
                let format = request.format.as_str();
                tracing::info!("Serving preloaded {} for topic {}", format, slug);
                return Ok(Reply {
                    reply: Some(format!("Here is your {} on {}", format, slug)),
                    file_url: Some(file_url),
                    kind: format.to_string(),
                    ..Default::default()
                });
            }
        }

        // 4. Synthesized answers
        match request.format {
            Format::Chat => Ok(self.chat(&request, &detected).await),
            Format::Audio => self.audio(&request, &detected).await,
            _ => Err(ResolveError::UnsupportedFormat),
        }
    }

    async fn detect_language(&self, message: &str) -> String {
        match self.detector.detect(message).await {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!("Language detection failed, defaulting to en: {}", e);
                CANONICAL_LANGUAGE.to_string()
            }
        }
    }

    async fn to_canonical(&self, message: &str, detected: &str) -> String {
        if detected == CANONICAL_LANGUAGE {
            return message.to_string();
        }

        match self
            .translator
            .translate(message, detected, CANONICAL_LANGUAGE)
            .await
        {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => message.to_string(),
            Err(e) => {
                tracing::warn!("Translate failed - using original prompt: {}", e);
                message.to_string()
            }
        }
    }

    async fn chat(&self, request: &Request, detected: &str) -> Reply {
        // Knowledge matching runs on the original, untranslated message.
        let answer = tables::match_knowledge(&request.message.to_lowercase());

        let target = request
            .language
            .as_deref()
            .and_then(tables::language_code)
            .unwrap_or(if detected.is_empty() {
                CANONICAL_LANGUAGE
            } else {
                detected
            });

        let reply = if target == CANONICAL_LANGUAGE {
            answer.to_string()
        } else {
            match self
                .translator
                .translate(answer, CANONICAL_LANGUAGE, target)
                .await
            {
                Ok(text) if !text.is_empty() => text,
                Ok(_) => answer.to_string(),
                Err(e) => {
                    tracing::warn!("Response translation failed: {}", e);
                    answer.to_string()
                }
            }
        };

        Reply {
            reply: Some(reply),
            kind: Format::Chat.as_str().to_string(),
            detected_language: Some(detected.to_string()),
            ..Default::default()
        }
    }

    async fn audio(&self, request: &Request, detected: &str) -> Result<Reply, ResolveError> {
        let answer = tables::match_knowledge(&request.message.to_lowercase());
        let voice = tables::voice_for(detected);

        // Synthesis failures are not degraded: they fail the request.
        let audio = self
            .speech
            .synthesize(answer, voice)
            .await
            .map_err(ResolveError::Synthesis)?;

        let encoded = base64::engine::general_purpose::STANDARD.encode(&audio);

        Ok(Reply {
            reply: Some("Here is your audio response".to_string()),
            audio: Some(format!("data:audio/mp3;base64,{}", encoded)),
            kind: Format::Audio.as_str().to_string(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::services::MAX_SPEECH_CHARS;
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    pub const BASE: &str = "https://cdn.example.com";

    /// In-process stand-in for all three external services.
    #[derive(Default)]
    pub struct FakeServices {
        /// `None` simulates a detection outage.
        pub detected: Option<String>,
        /// Target code → translated text; unknown targets fail.
        pub translations: HashMap<String, String>,
        /// `None` simulates a synthesis outage.
        pub audio: Option<Vec<u8>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeServices {
        pub fn detecting(code: &str) -> Self {
            Self {
                detected: Some(code.to_string()),
                audio: Some(b"ID3-fake-mp3".to_vec()),
                ..Default::default()
            }
        }

        pub fn translating(mut self, target: &str, text: &str) -> Self {
            self.translations.insert(target.to_string(), text.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn outage(service: &'static str) -> ServiceError {
            ServiceError::Status {
                service,
                status: 503,
                body: "unavailable".into(),
            }
        }
    }

    #[async_trait]
    impl LanguageDetector for FakeServices {
        async fn detect(&self, _text: &str) -> Result<String, ServiceError> {
            self.record("detect".into());
            self.detected.clone().ok_or_else(|| Self::outage("detect"))
        }
    }

    #[async_trait]
    impl Translator for FakeServices {
        async fn translate(
            &self,
            _text: &str,
            source: &str,
            target: &str,
        ) -> Result<String, ServiceError> {
            self.record(format!("translate:{}->{}", source, target));
            self.translations
                .get(target)
                .cloned()
                .ok_or_else(|| Self::outage("translate"))
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeServices {
        async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes, ServiceError> {
            assert!(text.chars().count() <= MAX_SPEECH_CHARS);
            self.record(format!("speak:{}", voice));
            self.audio
                .clone()
                .map(Bytes::from)
                .ok_or_else(|| Self::outage("speech"))
        }
    }

    pub fn resolver_with(fakes: Arc<FakeServices>) -> Resolver {
        Resolver::new(
            fakes.clone(),
            fakes.clone(),
            fakes,
            ContentStore::new(BASE),
        )
    }

    async fn run(fakes: &Arc<FakeServices>, body: Value) -> (u16, Value) {
        let envelope = resolver_with(fakes.clone()).handle_body(&body).await;
        let parsed = serde_json::from_str(&envelope.body).unwrap();
        (envelope.status_code, parsed)
    }

    #[tokio::test]
    async fn test_empty_prompt_makes_no_calls() {
        for body in [
            json!({ "format": "audio", "message": "  ", "language": "chinese" }),
            json!({ "format": "ebook", "message": "" }),
            json!("{}"),
        ] {
            let fakes = Arc::new(FakeServices::detecting("zh"));
            let (status, resp) = run(&fakes, body).await;
            assert_eq!(status, 400);
            assert_eq!(resp, json!({ "error": "Empty prompt" }));
            assert!(fakes.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_ebook_topic_match() {
        let fakes = Arc::new(FakeServices::detecting("en"));
        let (status, resp) = run(
            &fakes,
            json!(r#"{"format":"ebook","message":"tell me about the water cycle"}"#),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            resp,
            json!({
                "reply": "Here is your ebook on water-cycle",
                "fileUrl": "https://cdn.example.com/ebook/water-cycle.pdf",
                "type": "ebook"
            })
        );
        assert_eq!(fakes.calls(), vec!["detect"]);
    }

    #[tokio::test]
    async fn test_media_formats_and_extensions() {
        for (format, ext) in [("sketch", "png"), ("video", "mp4"), ("audio", "mp3")] {
            let fakes = Arc::new(FakeServices::detecting("en"));
            let (status, resp) = run(
                &fakes,
                json!({ "format": format, "message": "Newton's Law of motion" }),
            )
            .await;
            assert_eq!(status, 200);
            assert_eq!(
                resp["fileUrl"],
                format!("{}/{}/newtons-law.{}", BASE, format, ext)
            );
            assert_eq!(resp["type"], format);
            assert!(!fakes.calls().iter().any(|c| c.starts_with("speak")));
        }
    }

    #[tokio::test]
    async fn test_inbound_translation_drives_topic_match() {
        let fakes = Arc::new(
            FakeServices::detecting("ms").translating("en", "What is the water cycle?"),
        );
        let (status, resp) = run(
            &fakes,
            json!({ "format": "video", "message": "Apakah kitaran air?" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(resp["fileUrl"], format!("{}/video/water-cycle.mp4", BASE));
        assert_eq!(fakes.calls(), vec!["detect", "translate:ms->en"]);
    }

    #[tokio::test]
    async fn test_inbound_translation_failure_uses_original() {
        let fakes = Arc::new(FakeServices::detecting("ms"));
        let (status, resp) = run(
            &fakes,
            json!({ "format": "ebook", "message": "photosynthesis untuk pelajar" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(resp["fileUrl"], format!("{}/ebook/photosynthesis.pdf", BASE));
    }

    #[tokio::test]
    async fn test_empty_translation_uses_original() {
        let fakes = Arc::new(FakeServices::detecting("ta").translating("en", ""));
        let (status, resp) = run(
            &fakes,
            json!({ "format": "sketch", "message": "water-cycle" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(resp["fileUrl"], format!("{}/sketch/water-cycle.png", BASE));
    }

    #[tokio::test]
    async fn test_chat_bypasses_media_path() {
        let fakes = Arc::new(FakeServices::detecting("en"));
        let (status, resp) = run(
            &fakes,
            json!({ "format": "chat", "message": "What is photosynthesis?" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            resp,
            json!({
                "reply": tables::KNOWLEDGE[0].1,
                "type": "chat",
                "detectedLanguage": "en"
            })
        );
        assert_eq!(fakes.calls(), vec!["detect"]);
    }

    #[tokio::test]
    async fn test_detection_failure_falls_back_to_english() {
        let fakes = Arc::new(FakeServices {
            detected: None,
            ..Default::default()
        });
        let (status, resp) = run(&fakes, json!({ "message": "explain algebra" })).await;
        assert_eq!(status, 200);
        assert_eq!(resp["detectedLanguage"], "en");
        assert_eq!(resp["reply"], tables::KNOWLEDGE[4].1);
        assert_eq!(fakes.calls(), vec!["detect"]);
    }

    #[tokio::test]
    async fn test_chat_translates_to_requested_language() {
        let fakes = Arc::new(FakeServices::detecting("en").translating("zh", "物理学是..."));
        let (status, resp) = run(
            &fakes,
            json!({ "message": "physics please", "language": "Chinese" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(resp["reply"], "物理学是...");
        assert_eq!(resp["type"], "chat");
        assert_eq!(resp["detectedLanguage"], "en");
        assert_eq!(fakes.calls(), vec!["detect", "translate:en->zh"]);
    }

    #[tokio::test]
    async fn test_chat_translation_failure_returns_english() {
        let fakes = Arc::new(FakeServices::detecting("en"));
        let (status, resp) = run(
            &fakes,
            json!({ "message": "physics please", "language": "chinese" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(resp["reply"], tables::KNOWLEDGE[5].1);
        assert_eq!(resp["type"], "chat");
        assert_eq!(fakes.calls(), vec!["detect", "translate:en->zh"]);
    }

    #[tokio::test]
    async fn test_chat_unknown_label_uses_detected_language() {
        let fakes = Arc::new(
            FakeServices::detecting("ta")
                .translating("en", "what is chemistry")
                .translating("ta", "வேதியியல்..."),
        );
        let (_, resp) = run(
            &fakes,
            json!({ "message": "வேதியியல் என்றால் என்ன", "language": "klingon" }),
        )
        .await;
        assert_eq!(resp["reply"], "வேதியியல்...");
        assert_eq!(resp["detectedLanguage"], "ta");
        assert_eq!(
            fakes.calls(),
            vec!["detect", "translate:ta->en", "translate:en->ta"]
        );
    }

    #[tokio::test]
    async fn test_english_label_skips_outbound_translation() {
        let fakes = Arc::new(FakeServices::detecting("ms").translating("en", "what is biology"));
        let (_, resp) = run(
            &fakes,
            json!({ "message": "biology itu apa", "language": "english" }),
        )
        .await;
        assert_eq!(resp["reply"], tables::KNOWLEDGE[7].1);
        assert_eq!(fakes.calls(), vec!["detect", "translate:ms->en"]);
    }

    #[tokio::test]
    async fn test_knowledge_matches_untranslated_message() {
        // The English translation mentions photosynthesis, but knowledge
        // matching only sees the original text.
        let fakes = Arc::new(
            FakeServices::detecting("zh")
                .translating("en", "what is photosynthesis")
                .translating("zh", "默认回答"),
        );
        let (status, resp) = run(&fakes, json!({ "message": "光合作用是什么" })).await;
        assert_eq!(status, 200);
        assert_eq!(resp["reply"], "默认回答");
        assert_eq!(
            fakes.calls(),
            vec!["detect", "translate:zh->en", "translate:en->zh"]
        );
    }

    #[tokio::test]
    async fn test_audio_synthesizes_answer() {
        let fakes = Arc::new(FakeServices::detecting("en"));
        let (status, resp) = run(
            &fakes,
            json!({ "format": "audio", "message": "tell me some chemistry" }),
        )
        .await;
        assert_eq!(status, 200);
        let expected = base64::engine::general_purpose::STANDARD.encode(b"ID3-fake-mp3");
        assert_eq!(
            resp,
            json!({
                "reply": "Here is your audio response",
                "audio": format!("data:audio/mp3;base64,{}", expected),
                "type": "audio"
            })
        );
        assert_eq!(fakes.calls(), vec!["detect", "speak:Joanna"]);
    }

    #[tokio::test]
    async fn test_audio_voice_follows_detected_language() {
        let fakes = Arc::new(FakeServices::detecting("zh").translating("en", "hello"));
        let (status, _) = run(
            &fakes,
            json!({ "format": "audio", "message": "你好", "language": "tamil" }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(fakes.calls().last().map(String::as_str), Some("speak:Zhiyu"));
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_fatal() {
        let fakes = Arc::new(FakeServices {
            detected: Some("en".into()),
            audio: None,
            ..Default::default()
        });
        let (status, resp) = run(&fakes, json!({ "format": "audio", "message": "math" })).await;
        assert_eq!(status, 400);
        assert_eq!(resp, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_media_format_without_topic() {
        let fakes = Arc::new(FakeServices::detecting("en"));
        let (status, resp) = run(
            &fakes,
            json!({ "format": "video", "message": "explain black holes" }),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(
            resp,
            json!({ "error": "Invalid format or no content available" })
        );
    }

    #[tokio::test]
    async fn test_unknown_format_is_rejected() {
        let fakes = Arc::new(FakeServices::detecting("en"));
        let (status, resp) = run(
            &fakes,
            json!({ "format": "podcast", "message": "photosynthesis" }),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(
            resp,
            json!({ "error": "Invalid format or no content available" })
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported_generically() {
        let fakes = Arc::new(FakeServices::detecting("en"));
        let (status, resp) = run(&fakes, json!("{\"message\": ")).await;
        assert_eq!(status, 400);
        assert_eq!(resp, json!({ "error": "Internal server error" }));
        assert!(fakes.calls().is_empty());
    }

    #[tokio::test]
    async fn test_handle_reads_event_body() {
        let fakes = Arc::new(FakeServices::detecting("en"));
        let event: Event = serde_json::from_value(json!({
            "httpMethod": "POST",
            "body": "{\"format\":\"ebook\",\"message\":\"photosynthesis\"}"
        }))
        .unwrap();
        let envelope = resolver_with(fakes).handle(&event).await;
        assert_eq!(envelope.status_code, 200);
        assert!(envelope.body.contains("/ebook/photosynthesis.pdf"));
    }
}
