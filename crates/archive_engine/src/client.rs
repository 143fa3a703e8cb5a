use std::sync::Arc;

use archive_core::{
    archive_channel_url_at, archive_channel_videos_url_at, archive_latest_url_at,
    archive_search_url_at, archive_video_api_url_at, build_save_url, extract_cards,
    extract_channel_id, extract_video_id, scrape_channel_page, ChannelDirectory, ChannelRecord,
    RecordAssembler, VideoId, VideoRecord,
};
use archive_logging::{archive_debug, archive_info, archive_warn};
use chrono::Utc;
use thiserror::Error;

use crate::decode::decode_page;
use crate::details::VideoDetails;
use crate::fetch::{Fetcher, ReqwestFetcher};
use crate::settings::ArchiveSettings;
use crate::types::{BodyKind, FailureKind, FetchError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not a recognized video url: {0}")]
    InvalidVideoUrl(String),
    #[error("not a recognized channel url: {0}")]
    InvalidChannelUrl(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("video {video_id} is not archived yet, request it at {save_url}")]
    NotArchived { video_id: VideoId, save_url: String },
    #[error("video {0} has been disabled")]
    Disabled(VideoId),
    #[error("malformed video payload: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Host-side session: fetches archive pages and feeds them through the core.
/// Owns the channel directory for the lifetime of the session.
pub struct ArchiveClient {
    settings: ArchiveSettings,
    fetcher: Arc<dyn Fetcher>,
    directory: ChannelDirectory,
}

impl ArchiveClient {
    pub fn new(settings: ArchiveSettings) -> Result<Self, ClientError> {
        let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch.clone())?);
        Ok(Self::with_fetcher(settings, fetcher))
    }

    pub fn with_fetcher(settings: ArchiveSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            settings,
            fetcher,
            directory: ChannelDirectory::new(),
        }
    }

    /// Starts from a previously persisted directory.
    pub fn with_directory(mut self, directory: ChannelDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn directory(&self) -> &ChannelDirectory {
        &self.directory
    }

    pub fn into_directory(self) -> ChannelDirectory {
        self.directory
    }

    /// Latest archived videos. Empty when the page cannot be fetched.
    pub async fn home(&self) -> Vec<VideoRecord> {
        let url = archive_latest_url_at(&self.settings.base_url);
        self.listing(&url).await
    }

    /// Search results. Empty when the page cannot be fetched.
    pub async fn search(&self, query: &str) -> Vec<VideoRecord> {
        let url = archive_search_url_at(&self.settings.base_url, query);
        self.listing(&url).await
    }

    /// Channel metadata for an archive or legacy channel URL, fetched at most
    /// once per session.
    pub async fn channel(&mut self, url: &str) -> Result<ChannelRecord, ClientError> {
        let id = extract_channel_id(url)
            .ok_or_else(|| ClientError::InvalidChannelUrl(url.to_string()))?;
        if let Some(record) = self.directory.lookup(&id) {
            archive_debug!("Channel {} served from directory", id);
            return Ok(record.clone());
        }

        let page_url = archive_channel_url_at(&self.settings.base_url, &id);
        let page = self.fetch_html(&page_url).await;
        let record = self
            .directory
            .resolve(&id, |id| page.map(|html| scrape_channel_page(id, &html)))?;
        Ok(record.clone())
    }

    /// Videos on a channel page, all attributed to that channel.
    pub async fn channel_contents(&mut self, url: &str) -> Vec<VideoRecord> {
        let Some(id) = extract_channel_id(url) else {
            archive_warn!("Not a channel url: {}", url);
            return Vec::new();
        };

        let videos_url = archive_channel_videos_url_at(&self.settings.base_url, &id);
        let html = match self.fetch_html(&videos_url).await {
            Ok(html) => html,
            Err(err) => {
                archive_debug!("Videos tab unavailable for {}: {}", id, err);
                let page_url = archive_channel_url_at(&self.settings.base_url, &id);
                match self.fetch_html(&page_url).await {
                    Ok(html) => html,
                    Err(err) => {
                        archive_warn!("Failed to fetch channel {}: {}", id, err);
                        return Vec::new();
                    }
                }
            }
        };
        let cards = extract_cards(&html);

        let record = match self.channel(url).await {
            Ok(record) => Some(record),
            Err(err) => {
                archive_warn!("Failed to get channel info for {}: {}", id, err);
                None
            }
        };

        RecordAssembler::new().channel_videos(cards, &id, record.as_ref())
    }

    /// Details of an archived video from the archive's JSON API.
    pub async fn video_details(&self, url: &str) -> Result<VideoDetails, ClientError> {
        let id =
            extract_video_id(url).ok_or_else(|| ClientError::InvalidVideoUrl(url.to_string()))?;
        let api_url = archive_video_api_url_at(&self.settings.base_url, &id);

        let output = match self.fetcher.fetch(&api_url, BodyKind::Json).await {
            Ok(output) => output,
            Err(err) if err.kind == FailureKind::HttpStatus(404) => {
                let save_url = build_save_url(&id);
                archive_info!("Video {} not archived, save page: {}", id, save_url);
                return Err(ClientError::NotArchived {
                    video_id: id,
                    save_url,
                });
            }
            Err(err) => return Err(err.into()),
        };

        let details = VideoDetails::from_json(&id, &output.bytes, Utc::now())?;
        if details.disabled {
            return Err(ClientError::Disabled(id));
        }
        Ok(details)
    }

    async fn listing(&self, url: &str) -> Vec<VideoRecord> {
        match self.fetch_html(url).await {
            Ok(html) => RecordAssembler::new().videos(extract_cards(&html)),
            Err(err) => {
                archive_warn!("Failed to fetch listing {}: {}", url, err);
                Vec::new()
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let output = self.fetcher.fetch(url, BodyKind::Html).await?;
        let page = decode_page(&output.bytes, output.metadata.content_type.as_deref())?;
        Ok(page.text)
    }
}
