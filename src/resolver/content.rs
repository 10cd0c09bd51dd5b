use super::request::Format;

/// Read-only store of pre-rendered media, addressed by URL.
///
/// Objects are never checked for existence; a missing file surfaces only
/// when the client follows the link.
#[derive(Debug, Clone)]
pub struct ContentStore {
    base_url: String,
}

impl ContentStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// `{base}/{format}/{encoded slug.ext}`, or `None` for non-media formats.
    pub fn url_for(&self, format: &Format, slug: &str) -> Option<String> {
        let ext = format.media_extension()?;
        let filename = urlencoding::encode(&format!("{}.{}", slug, ext)).into_owned();
        Some(format!("{}/{}/{}", self.base_url, format.as_str(), filename))
    }
}
