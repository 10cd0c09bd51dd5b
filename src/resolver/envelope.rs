use serde::Serialize;

/// Successful reply payload. Absent fields are omitted from the JSON.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// `{ statusCode, body }` where `body` is already-serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub body: String,
}

impl Envelope {
    pub fn success(reply: &Reply) -> Self {
        Self {
            status_code: 200,
            body: serde_json::to_string(reply).unwrap_or_else(|_| "{}".to_string()),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status_code: 400,
            body: serde_json::to_string(&ErrorBody { error: message })
                .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string()),
        }
    }
}
