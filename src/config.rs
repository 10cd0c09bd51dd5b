use std::net::SocketAddr;

use crate::error::ConfigError;

pub const DEFAULT_CONTENT_BASE: &str =
    "https://edunova-content-alfaruk.s3.ap-southeast-1.amazonaws.com";

/// Process-wide settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub content_base_url: String,
    pub translate_url: String,
    pub translate_api_key: Option<String>,
    pub speech_url: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port_raw = get("PORT", "3000");
        let port = port_raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
            var: "PORT",
            expected: "a number between 0 and 65535",
            value: port_raw.clone(),
        })?;

        Ok(Self {
            host: get("HOST", "0.0.0.0"),
            port,
            content_base_url: get("CONTENT_BASE_URL", DEFAULT_CONTENT_BASE)
                .trim_end_matches('/')
                .to_string(),
            translate_url: get("TRANSLATE_URL", "http://localhost:5000")
                .trim_end_matches('/')
                .to_string(),
            translate_api_key: lookup("TRANSLATE_API_KEY").filter(|v| !v.is_empty()),
            speech_url: get("SPEECH_URL", "http://localhost:3001/api/speak"),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(format!("{}:{}", self.host, self.port).parse::<SocketAddr>()?)
    }
}
