//! Archive core: URL recognition, listing-page card extraction and channel
//! records. Everything here is synchronous and free of IO.
mod assemble;
mod cards;
mod channel_page;
mod dates;
mod directory;
mod ids;
mod urls;

pub use assemble::{AuthorRef, RecordAssembler, VideoRecord};
pub use cards::{correlate_channel, extract_cards, ChannelAnchor, ChannelRef, VideoCard};
pub use channel_page::scrape_channel_page;
pub use dates::parse_timestamp;
pub use directory::{ChannelDirectory, ChannelRecord, PersistedState, StateError};
pub use ids::{ChannelId, ChannelIdShape, VideoId};
pub use urls::{
    archive_channel_url, archive_channel_url_at, archive_channel_videos_url,
    archive_channel_videos_url_at, archive_latest_url, archive_latest_url_at, archive_search_url,
    archive_search_url_at, archive_video_api_url, archive_video_api_url_at, archive_video_url,
    build_legacy_channel_url, build_legacy_video_url, build_save_url, classify_channel_url,
    classify_video_url, extract_channel_id, extract_video_id, is_channel_url, is_video_url,
    ChannelUrlShape, VideoUrlShape, ARCHIVE_BASE_URL, LEGACY_BASE_URL,
};
