use std::time::Duration;

use archive_core::ARCHIVE_BASE_URL;

use crate::types::BodyKind;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted when a page is expected.
    pub html_content_types: Vec<String>,
    /// Media types accepted from the JSON API.
    pub json_content_types: Vec<String>,
}

impl FetchSettings {
    pub fn content_types(&self, kind: BodyKind) -> &[String] {
        match kind {
            BodyKind::Html => &self.html_content_types,
            BodyKind::Json => &self.json_content_types,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 8 * 1024 * 1024,
            html_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            json_content_types: vec!["application/json".to_string()],
        }
    }
}

/// Where the archive lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct ArchiveSettings {
    /// Host that pages are fetched from. Records always point at the public site.
    pub base_url: String,
    pub fetch: FetchSettings,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            base_url: ARCHIVE_BASE_URL.to_string(),
            fetch: FetchSettings::default(),
        }
    }
}
