use archive_logging::archive_debug;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Response, Url};

use crate::settings::FetchSettings;
use crate::types::{BodyKind, FailureKind, FetchError, FetchMetadata, FetchOutput};

/// Retrieves raw response bodies of an expected kind. Timeouts, limits and
/// content-type checks are the fetcher's concern; callers only see
/// `FetchError`.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, kind: BodyKind) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    /// Redirects are followed by hand in [`ReqwestFetcher::follow`], so the
    /// client itself never follows one.
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    /// Sends `url`, chasing `Location` headers up to the configured limit.
    /// Returns the final response and how many hops it took.
    async fn follow(&self, url: Url) -> Result<(Response, usize), FetchError> {
        let mut current = url;
        for hops in 0..=self.settings.redirect_limit {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(transport_failure)?;
            if !response.status().is_redirection() {
                return Ok((response, hops));
            }

            let status = response.status();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    FetchError::new(
                        FailureKind::HttpStatus(status.as_u16()),
                        format!("{status} without a location from {current}"),
                    )
                })?;
            let next = current
                .join(location)
                .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
            archive_debug!("{} redirected to {}", current, next);
            current = next;
        }

        Err(FetchError::new(
            FailureKind::RedirectLimitExceeded,
            format!("more than {} redirects", self.settings.redirect_limit),
        ))
    }

    fn check_content_type(&self, kind: BodyKind, header: Option<&str>) -> Result<(), FetchError> {
        // A missing header is left to the decoder.
        let Some(header) = header else {
            return Ok(());
        };
        let media_type = header.split(';').next().unwrap_or_default().trim();
        let accepted = self
            .settings
            .content_types(kind)
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type));
        if accepted {
            Ok(())
        } else {
            Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: header.to_string(),
                },
                format!("expected a {kind} body"),
            ))
        }
    }

    fn check_size(&self, actual: u64) -> Result<(), FetchError> {
        if actual <= self.settings.max_bytes {
            return Ok(());
        }
        Err(FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        ))
    }

    async fn read_body(&self, response: Response) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(transport_failure)?;
            self.check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str, kind: BodyKind) -> Result<FetchOutput, FetchError> {
        let parsed = Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        archive_debug!("GET {} expecting {}", parsed, kind);
        let (response, redirect_count) = self.follow(parsed).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{status} for {url}"),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.check_content_type(kind, content_type.as_deref())?;
        if let Some(declared) = response.content_length() {
            self.check_size(declared)?;
        }

        let final_url = response.url().to_string();
        let bytes = self.read_body(response).await?;
        let metadata = FetchMetadata {
            requested_url: url.to_string(),
            final_url,
            redirect_count,
            content_type,
            byte_len: bytes.len() as u64,
        };
        archive_debug!("Fetched {} bytes from {}", metadata.byte_len, metadata.final_url);

        Ok(FetchOutput { bytes, metadata })
    }
}

fn transport_failure(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
