use crate::resolver::Envelope;

/// Failure talking to one of the external services.
#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} returned no result")]
    EmptyResult(&'static str),
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("Empty prompt")]
    EmptyPrompt,

    #[error("Invalid format or no content available")]
    UnsupportedFormat,

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[source] ServiceError),
}

impl ResolveError {
    /// Internal detail is logged, never echoed back to the caller.
    pub fn to_envelope(&self) -> Envelope {
        match self {
            ResolveError::EmptyPrompt | ResolveError::UnsupportedFormat => {
                tracing::info!("Request rejected: {}", self);
                Envelope::error(&self.to_string())
            }
            ResolveError::MalformedBody(_) | ResolveError::Synthesis(_) => {
                tracing::error!("Handler error: {}", self);
                Envelope::error("Internal server error")
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Invalid bind address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}
