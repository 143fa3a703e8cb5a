use chrono::{DateTime, Utc};

use crate::cards::{ChannelRef, VideoCard};
use crate::dates::parse_timestamp;
use crate::directory::ChannelRecord;
use crate::ids::{ChannelId, VideoId};
use crate::urls::{archive_channel_url, archive_video_url};

const UNKNOWN_AUTHOR_ID: &str = "unknown";
const UNKNOWN_AUTHOR_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRef {
    pub id: ChannelId,
    pub name: String,
    pub url: String,
    pub avatar_url: String,
}

impl AuthorRef {
    /// Placeholder for videos with no channel byline.
    pub fn unknown() -> Self {
        let id = ChannelId::new(UNKNOWN_AUTHOR_ID);
        Self {
            url: archive_channel_url(&id),
            id,
            name: UNKNOWN_AUTHOR_NAME.to_string(),
            avatar_url: String::new(),
        }
    }

    /// Author named after its id, used when a channel could not be resolved.
    pub fn placeholder(id: &ChannelId) -> Self {
        Self {
            id: id.clone(),
            name: id.to_string(),
            url: archive_channel_url(id),
            avatar_url: String::new(),
        }
    }
}

impl From<&ChannelRef> for AuthorRef {
    fn from(channel: &ChannelRef) -> Self {
        let name = if channel.name.is_empty() {
            UNKNOWN_AUTHOR_NAME.to_string()
        } else {
            channel.name.clone()
        };
        Self {
            id: channel.id.clone(),
            name,
            url: channel.profile_url.clone(),
            avatar_url: channel.avatar_url.clone(),
        }
    }
}

impl From<&ChannelRecord> for AuthorRef {
    fn from(record: &ChannelRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.display_name.clone(),
            url: record.canonical_url.clone(),
            avatar_url: record.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    pub id: VideoId,
    pub title: String,
    pub thumbnail_url: String,
    pub author: AuthorRef,
    /// Unix seconds.
    pub uploaded_at: i64,
    pub url: String,
    pub archived_date_raw: Option<String>,
}

/// Turns extracted cards into host-facing video records.
#[derive(Debug, Clone, Copy)]
pub struct RecordAssembler {
    now: DateTime<Utc>,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Uses `now` as the fallback upload time.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Listing pages: each card keeps its own byline.
    pub fn videos(&self, cards: Vec<VideoCard>) -> Vec<VideoRecord> {
        cards
            .into_iter()
            .map(|card| {
                let author = card
                    .channel
                    .as_ref()
                    .map(AuthorRef::from)
                    .unwrap_or_else(AuthorRef::unknown);
                self.record(card, author)
            })
            .collect()
    }

    /// Channel pages: every card belongs to `channel`, enriched from the
    /// directory record when one is available.
    pub fn channel_videos(
        &self,
        cards: Vec<VideoCard>,
        channel: &ChannelId,
        record: Option<&ChannelRecord>,
    ) -> Vec<VideoRecord> {
        let author = record
            .map(AuthorRef::from)
            .unwrap_or_else(|| AuthorRef::placeholder(channel));
        cards
            .into_iter()
            .map(|card| self.record(card, author.clone()))
            .collect()
    }

    fn record(&self, card: VideoCard, author: AuthorRef) -> VideoRecord {
        VideoRecord {
            url: archive_video_url(&card.id),
            uploaded_at: parse_timestamp(card.published_date_raw.as_deref(), self.now),
            id: card.id,
            title: card.title,
            thumbnail_url: card.thumbnail_url,
            author,
            archived_date_raw: card.archived_date_raw,
        }
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new()
    }
}
