//! Recognition of archive and legacy-platform URLs, and the inverse builders.
//!
//! Each URL family is an ordered rule table of `(shape, pattern)` pairs. The
//! first rule whose pattern matches decides the shape and the captured id.

use once_cell::sync::Lazy;
use regex::Regex;
use url::form_urlencoded;

use crate::ids::{ChannelId, ChannelIdShape, VideoId};

pub const ARCHIVE_BASE_URL: &str = "https://preservetube.com";
pub const LEGACY_BASE_URL: &str = "https://www.youtube.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoUrlShape {
    /// `preservetube.com/watch?v=ID`
    Archive,
    /// `youtube.com/watch?...v=ID`
    Watch,
    /// `youtu.be/ID`
    ShortLink,
    /// `youtube.com/embed/ID`
    Embed,
    /// `youtube.com/v/ID`
    Legacy,
    /// `youtube.com/shorts/ID`
    Shorts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelUrlShape {
    /// `preservetube.com/channel/NAME`
    Archive,
    /// `youtube.com/channel/UC...`
    LegacyId,
    /// `youtube.com/@NAME`
    Handle,
    /// `youtube.com/c/NAME`
    Custom,
    /// `youtube.com/user/NAME`
    User,
}

impl ChannelUrlShape {
    fn normalize(self, captured: &str) -> ChannelId {
        match self {
            ChannelUrlShape::Handle => ChannelId::new(format!("@{captured}")),
            _ => ChannelId::new(captured),
        }
    }
}

struct Rule<S> {
    shape: S,
    pattern: Regex,
}

fn compile<S: Copy>(table: &[(S, &str)]) -> Vec<Rule<S>> {
    table
        .iter()
        .map(|&(shape, pattern)| Rule {
            shape,
            pattern: Regex::new(pattern).expect("static url pattern"),
        })
        .collect()
}

static VIDEO_RULES: Lazy<Vec<Rule<VideoUrlShape>>> = Lazy::new(|| {
    compile(&[
        (
            VideoUrlShape::Archive,
            r"https://(?:www\.)?preservetube\.com/watch\?v=([A-Za-z0-9_-]{11})",
        ),
        (
            VideoUrlShape::Watch,
            r"https?://(?:www\.|music\.|m\.)?youtube\.com/watch\?(?:.*&)?v=([A-Za-z0-9_-]{11})",
        ),
        (
            VideoUrlShape::ShortLink,
            r"https?://youtu\.be/([A-Za-z0-9_-]{11})",
        ),
        (
            VideoUrlShape::Embed,
            r"https?://(?:www\.)?youtube\.com/embed/([A-Za-z0-9_-]{11})",
        ),
        (
            VideoUrlShape::Legacy,
            r"https?://(?:www\.)?youtube\.com/v/([A-Za-z0-9_-]{11})",
        ),
        (
            VideoUrlShape::Shorts,
            r"https?://(?:www\.|m\.)?youtube\.com/shorts/([A-Za-z0-9_-]{11})",
        ),
    ])
});

static CHANNEL_RULES: Lazy<Vec<Rule<ChannelUrlShape>>> = Lazy::new(|| {
    compile(&[
        (
            ChannelUrlShape::Archive,
            r"https://(?:www\.)?preservetube\.com/channel/(@?[A-Za-z0-9_-]+)",
        ),
        (
            ChannelUrlShape::LegacyId,
            r"https?://(?:www\.|m\.)?youtube\.com/channel/(UC[A-Za-z0-9_-]{22})",
        ),
        (
            ChannelUrlShape::Handle,
            r"https?://(?:www\.|m\.)?youtube\.com/@([A-Za-z0-9_.-]+)",
        ),
        (
            ChannelUrlShape::Custom,
            r"https?://(?:www\.|m\.)?youtube\.com/c/([^/?]+)",
        ),
        (
            ChannelUrlShape::User,
            r"https?://(?:www\.|m\.)?youtube\.com/user/([^/?]+)",
        ),
    ])
});

fn first_match<'a, S: Copy>(rules: &[Rule<S>], url: &'a str) -> Option<(S, &'a str)> {
    rules.iter().find_map(|rule| {
        rule.pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| (rule.shape, m.as_str()))
    })
}

pub fn classify_video_url(url: &str) -> Option<(VideoUrlShape, VideoId)> {
    let (shape, raw) = first_match(&VIDEO_RULES, url)?;
    VideoId::parse(raw).map(|id| (shape, id))
}

pub fn classify_channel_url(url: &str) -> Option<(ChannelUrlShape, ChannelId)> {
    first_match(&CHANNEL_RULES, url).map(|(shape, raw)| (shape, shape.normalize(raw)))
}

/// Video id from an archive or legacy URL; `None` means "not a video URL".
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    classify_video_url(url).map(|(_, id)| id)
}

/// Channel id from an archive or legacy URL. Handle URLs yield `@name`.
pub fn extract_channel_id(url: &str) -> Option<ChannelId> {
    classify_channel_url(url).map(|(_, id)| id)
}

pub fn is_video_url(url: &str) -> bool {
    VIDEO_RULES.iter().any(|rule| rule.pattern.is_match(url))
}

pub fn is_channel_url(url: &str) -> bool {
    CHANNEL_RULES.iter().any(|rule| rule.pattern.is_match(url))
}

/// Best-effort legacy channel URL. Custom and user names come back as
/// `@name`, which is not necessarily the URL they were extracted from.
pub fn build_legacy_channel_url(id: &ChannelId) -> Option<String> {
    if id.is_empty() {
        return None;
    }
    let url = match id.shape() {
        ChannelIdShape::LegacyId => format!("{LEGACY_BASE_URL}/channel/{id}"),
        ChannelIdShape::Handle => format!("{LEGACY_BASE_URL}/{id}"),
        ChannelIdShape::Name => format!("{LEGACY_BASE_URL}/@{id}"),
    };
    Some(url)
}

pub fn build_legacy_video_url(id: &VideoId) -> String {
    format!("{LEGACY_BASE_URL}/watch?v={id}")
}

/// Archive page that asks the archive to preserve a video it does not hold yet.
pub fn build_save_url(id: &VideoId) -> String {
    let legacy = build_legacy_video_url(id);
    format!("{ARCHIVE_BASE_URL}/save?url={}", encode(&legacy))
}

pub fn archive_video_url(id: &VideoId) -> String {
    format!("{ARCHIVE_BASE_URL}/watch?v={id}")
}

pub fn archive_channel_url(id: &ChannelId) -> String {
    archive_channel_url_at(ARCHIVE_BASE_URL, id)
}

pub fn archive_channel_url_at(base: &str, id: &ChannelId) -> String {
    format!("{}/channel/{id}", trim_base(base))
}

pub fn archive_channel_videos_url(id: &ChannelId) -> String {
    archive_channel_videos_url_at(ARCHIVE_BASE_URL, id)
}

pub fn archive_channel_videos_url_at(base: &str, id: &ChannelId) -> String {
    format!("{}/channel/{id}/videos", trim_base(base))
}

/// JSON details endpoint for an archived video.
pub fn archive_video_api_url(id: &VideoId) -> String {
    archive_video_api_url_at(ARCHIVE_BASE_URL, id)
}

pub fn archive_video_api_url_at(base: &str, id: &VideoId) -> String {
    format!("{}/video/{id}", trim_base(base))
}

pub fn archive_latest_url() -> String {
    archive_latest_url_at(ARCHIVE_BASE_URL)
}

pub fn archive_latest_url_at(base: &str) -> String {
    format!("{}/latest", trim_base(base))
}

pub fn archive_search_url(query: &str) -> String {
    archive_search_url_at(ARCHIVE_BASE_URL, query)
}

pub fn archive_search_url_at(base: &str, query: &str) -> String {
    format!("{}/search?search={}", trim_base(base), encode(query))
}

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
