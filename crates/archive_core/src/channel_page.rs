use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::directory::ChannelRecord;
use crate::ids::ChannelId;
use crate::urls::{archive_channel_url, build_legacy_channel_url};

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("heading selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").expect("img selector"));

/// Builds a channel record from an archive channel page. Missing markers
/// degrade to the id (name) or an empty string (avatar).
pub fn scrape_channel_page(id: &ChannelId, html: &str) -> ChannelRecord {
    let doc = Html::parse_document(html);

    let display_name = doc
        .select(&HEADING)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| id.to_string());

    let avatar_url = find_avatar(&doc).unwrap_or_default();
    let verified = html.contains("verified") || html.contains("checkmark");

    ChannelRecord {
        id: id.clone(),
        description: format!("Archived videos from {display_name} on PreserveTube"),
        display_name,
        avatar_url,
        canonical_url: archive_channel_url(id),
        legacy_url_alternatives: build_legacy_channel_url(id).into_iter().collect(),
        verified,
    }
}

fn find_avatar(doc: &Html) -> Option<String> {
    let by_class = doc.select(&IMG).find(|img| {
        img.value()
            .attr("class")
            .is_some_and(|class| class.split_whitespace().any(|token| token.contains("avatar")))
    });
    let by_style = || {
        doc.select(&IMG).find(|img| {
            img.value()
                .attr("style")
                .is_some_and(|style| style.contains("border-radius"))
        })
    };

    by_class
        .or_else(by_style)
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
}
