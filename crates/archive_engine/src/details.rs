use archive_core::{
    archive_channel_url, archive_video_url, parse_timestamp, AuthorRef, ChannelId, VideoId,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

const FALLBACK_SOURCE_HOST: &str = "https://s0.archive.party/preservetube";

/// Body of the archive's `/video/{id}` endpoint. Every field is optional;
/// absent values degrade to defaults instead of failing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoPayload {
    id: Option<String>,
    title: Option<String>,
    thumbnail: Option<String>,
    description: Option<String>,
    channel: Option<String>,
    channel_id: Option<String>,
    channel_avatar: Option<String>,
    published: Option<String>,
    archived: Option<String>,
    disabled: Option<bool>,
    source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    pub name: String,
    pub container: String,
    pub codec: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub id: VideoId,
    pub title: String,
    pub thumbnail_url: String,
    pub description: String,
    pub author: AuthorRef,
    /// Unix seconds.
    pub uploaded_at: i64,
    pub archived_date_raw: Option<String>,
    pub url: String,
    pub disabled: bool,
    pub source: VideoSource,
}

impl VideoDetails {
    pub(crate) fn from_json(
        requested: &VideoId,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        let payload: VideoPayload = serde_json::from_slice(body)?;
        Ok(Self::from_payload(requested, payload, now))
    }

    fn from_payload(requested: &VideoId, payload: VideoPayload, now: DateTime<Utc>) -> Self {
        let id = payload
            .id
            .as_deref()
            .and_then(VideoId::parse)
            .unwrap_or_else(|| requested.clone());

        let author = match payload.channel_id.filter(|c| !c.is_empty()) {
            Some(channel_id) => {
                let channel_id = ChannelId::new(channel_id);
                AuthorRef {
                    url: archive_channel_url(&channel_id),
                    name: payload
                        .channel
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    avatar_url: payload.channel_avatar.unwrap_or_default(),
                    id: channel_id,
                }
            }
            None => AuthorRef::unknown(),
        };

        let source_url = payload
            .source
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{FALLBACK_SOURCE_HOST}/{id}.webm"));

        Self {
            title: payload
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format!("Video {id}")),
            thumbnail_url: payload.thumbnail.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            author,
            uploaded_at: parse_timestamp(payload.published.as_deref(), now),
            archived_date_raw: payload.archived,
            url: archive_video_url(&id),
            disabled: payload.disabled.unwrap_or(false),
            source: VideoSource {
                name: "WebM".to_string(),
                container: "video/webm".to_string(),
                codec: "vp9".to_string(),
                url: source_url,
            },
            id,
        }
    }
}
