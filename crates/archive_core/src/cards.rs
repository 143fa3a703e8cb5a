//! Video card extraction from archive listing pages.
//!
//! Listing pages carry no per-card container, so a video is paired with its
//! channel by document order: the first channel anchor that starts after the
//! video anchor ends is taken as the video's byline.

use std::collections::HashSet;

use archive_logging::archive_debug;
use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::ids::{ChannelId, VideoId};
use crate::urls::archive_channel_url;

const MIN_TITLE_CHARS: usize = 10;
const MIN_FALLBACK_TITLE_CHARS: usize = 20;

static VIDEO_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<a(?:\s[^>]*)?\shref\s*=\s*["']/watch\?v=([A-Za-z0-9_-]{11})(?:&[^"']*)?["'][^>]*>(.*?)</a\s*>"#,
    )
    .expect("video anchor pattern")
});

static CHANNEL_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<a(?:\s[^>]*)?\shref\s*=\s*["']/channel/(@?[A-Za-z0-9_-]+)["'][^>]*>(.*?)</a\s*>"#,
    )
    .expect("channel anchor pattern")
});

static PUBLISHED_ON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Published on ([^|<]+)").expect("published pattern"));

static ARCHIVED_ON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Archived on ([^<]+)").expect("archived pattern"));

static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("img selector"));

static TITLE_BLOCKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div, span, p").expect("title selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: ChannelId,
    pub name: String,
    pub avatar_url: String,
    pub profile_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCard {
    pub id: VideoId,
    pub title: String,
    pub thumbnail_url: String,
    pub published_date_raw: Option<String>,
    pub archived_date_raw: Option<String>,
    pub channel: Option<ChannelRef>,
}

struct VideoAnchor<'a> {
    id: VideoId,
    content: &'a str,
    /// Byte offset just past the closing `</a>`.
    end: usize,
}

/// A `/channel/{id}` anchor found in a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAnchor<'a> {
    pub id: ChannelId,
    pub content: &'a str,
    /// Byte offset of the opening `<a`.
    pub start: usize,
}

/// Extracts one card per distinct video id, in document order.
pub fn extract_cards(html: &str) -> Vec<VideoCard> {
    let videos = scan_video_anchors(html);
    let channels = scan_channel_anchors(html);

    let mut seen = HashSet::new();
    let mut cards = Vec::new();
    for video in &videos {
        if !seen.insert(video.id.clone()) {
            continue;
        }
        cards.push(build_card(video, &channels));
    }

    archive_debug!(
        "Extracted {} cards from {} video anchors and {} channel anchors",
        cards.len(),
        videos.len(),
        channels.len()
    );
    cards
}

/// First channel anchor starting strictly after `video_end`.
pub fn correlate_channel<'c, 'a>(
    video_end: usize,
    channels: &'c [ChannelAnchor<'a>],
) -> Option<&'c ChannelAnchor<'a>> {
    channels.iter().find(|channel| channel.start > video_end)
}

fn scan_video_anchors(html: &str) -> Vec<VideoAnchor<'_>> {
    VIDEO_ANCHOR
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = VideoId::parse(caps.get(1)?.as_str())?;
            let content = caps.get(2).map_or("", |m| m.as_str());
            Some(VideoAnchor {
                id,
                content,
                end: whole.end(),
            })
        })
        .collect()
}

fn scan_channel_anchors(html: &str) -> Vec<ChannelAnchor<'_>> {
    CHANNEL_ANCHOR
        .captures_iter(html)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = ChannelId::new(caps.get(1)?.as_str());
            let content = caps.get(2).map_or("", |m| m.as_str());
            Some(ChannelAnchor {
                id,
                content,
                start: whole.start(),
            })
        })
        .collect()
}

fn build_card(video: &VideoAnchor<'_>, channels: &[ChannelAnchor<'_>]) -> VideoCard {
    let fragment = Html::parse_fragment(video.content);

    let thumbnail_url = first_image_src(&fragment).unwrap_or_default();
    let title = extract_title(&fragment).unwrap_or_else(|| format!("Video {}", video.id));
    let published_date_raw = capture_trimmed(&PUBLISHED_ON, video.content);
    let archived_date_raw = capture_trimmed(&ARCHIVED_ON, video.content);
    let channel = correlate_channel(video.end, channels).map(channel_ref);

    VideoCard {
        id: video.id.clone(),
        title,
        thumbnail_url,
        published_date_raw,
        archived_date_raw,
        channel,
    }
}

fn channel_ref(anchor: &ChannelAnchor<'_>) -> ChannelRef {
    let fragment = Html::parse_fragment(anchor.content);
    let avatar_url = first_image_src(&fragment).unwrap_or_default();
    let name = text_nodes(&fragment)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| anchor.id.to_string());

    ChannelRef {
        profile_url: archive_channel_url(&anchor.id),
        id: anchor.id.clone(),
        name,
        avatar_url,
    }
}

fn first_image_src(fragment: &Html) -> Option<String> {
    fragment
        .select(&IMG)
        .find_map(|img| img.value().attr("src"))
        .map(str::to_string)
}

/// Title preference: the first div/span/p holding only text of at least ten
/// characters, then any text node of at least twenty.
fn extract_title(fragment: &Html) -> Option<String> {
    let from_block = fragment
        .select(&TITLE_BLOCKS)
        .filter_map(own_text)
        .find(|text| text.chars().count() >= MIN_TITLE_CHARS)
        .map(|text| collapse_whitespace(&text))
        .filter(|text| !text.is_empty());

    from_block.or_else(|| {
        text_nodes(fragment)
            .find(|text| text.chars().count() >= MIN_FALLBACK_TITLE_CHARS)
            .map(collapse_whitespace)
            .filter(|text| !text.is_empty())
    })
}

/// Text of an element whose children are all text nodes.
fn own_text(element: ElementRef<'_>) -> Option<String> {
    let mut text = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            _ => return None,
        }
    }
    Some(text)
}

fn text_nodes(fragment: &Html) -> impl Iterator<Item = &str> {
    fragment
        .root_element()
        .descendants()
        .filter_map(|node: NodeRef<'_, Node>| match node.value() {
            Node::Text(t) => Some(&**t),
            _ => None,
        })
}

fn capture_trimmed(pattern: &Regex, haystack: &str) -> Option<String> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{collapse_whitespace, extract_title};
    use scraper::Html;

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
    }

    #[test]
    fn short_block_text_falls_through_to_long_text_node() {
        let fragment =
            Html::parse_fragment("<span>tiny</span><b>A bold title that is long enough</b>");
        assert_eq!(
            extract_title(&fragment).as_deref(),
            Some("A bold title that is long enough")
        );
    }

    #[test]
    fn nested_markup_disqualifies_block() {
        let fragment = Html::parse_fragment(
            "<div><b>x</b> Not a pure text block</div><p>Plain paragraph title</p>",
        );
        assert_eq!(
            extract_title(&fragment).as_deref(),
            Some("Plain paragraph title")
        );
    }
}
