use archive_core::{correlate_channel, extract_cards, ChannelAnchor, ChannelId};
use pretty_assertions::assert_eq;

fn init_logging() {
    archive_logging::initialize_for_tests();
}

#[test]
fn single_video_with_following_channel() {
    init_logging();
    let html = r#"<a href="/watch?v=AAAAAAAAAAA">Title text here</a><hr><a href="/channel/@foo">Foo Channel</a>"#;
    let cards = extract_cards(html);

    assert_eq!(cards.len(), 1);
    let card = &cards[0];
    assert_eq!(card.id.as_str(), "AAAAAAAAAAA");
    let channel = card.channel.as_ref().expect("channel");
    assert_eq!(channel.id.as_str(), "@foo");
    assert_eq!(channel.name, "Foo Channel");
    assert_eq!(channel.profile_url, "https://preservetube.com/channel/@foo");
    assert_eq!(channel.avatar_url, "");
}

#[test]
fn no_channel_anchors_means_no_channels() {
    init_logging();
    let html = r#"
        <a href="/watch?v=AAAAAAAAAAA"><div>First video title</div></a>
        <a href="/watch?v=BBBBBBBBBBB"><div>Second video title</div></a>
    "#;
    let cards = extract_cards(html);

    assert_eq!(cards.len(), 2);
    assert!(cards.iter().all(|card| card.channel.is_none()));
}

#[test]
fn repeated_anchor_yields_one_card() {
    init_logging();
    let anchor = r#"<a href="/watch?v=CCCCCCCCCCC"><p>Repeated video title</p></a>"#;
    let html = format!("{anchor}{anchor}{anchor}");
    let cards = extract_cards(&html);

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id.as_str(), "CCCCCCCCCCC");
}

#[test]
fn first_occurrence_wins_for_duplicates() {
    init_logging();
    let html = r#"
        <a href="/watch?v=DDDDDDDDDDD"><span>The original title</span></a>
        <a href="/channel/@first">First</a>
        <a href="/watch?v=DDDDDDDDDDD"><span>A later duplicate title</span></a>
        <a href="/channel/@second">Second</a>
    "#;
    let cards = extract_cards(html);

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].title, "The original title");
    assert_eq!(cards[0].channel.as_ref().unwrap().id.as_str(), "@first");
}

#[test]
fn closest_following_channel_is_chosen() {
    init_logging();
    let html = r#"
        <a href="/channel/@before">Before</a>
        <a href="/watch?v=EEEEEEEEEEE"><div>Video in the middle</div></a>
        <a href="/channel/@near">Near</a>
        <a href="/channel/@far">Far</a>
    "#;
    let cards = extract_cards(html);

    assert_eq!(cards[0].channel.as_ref().unwrap().id.as_str(), "@near");
}

#[test]
fn each_video_pairs_with_its_own_byline() {
    init_logging();
    let html = r#"
        <div class="grid">
          <a href="/watch?v=AAAAAAAAAAA"><div>Alpha video title</div></a>
          <a href="/channel/UCaaaaaaaaaaaaaaaaaaaaaa"><img src="/alpha.png"> Alpha </a>
          <a href="/watch?v=BBBBBBBBBBB"><div>Bravo video title</div></a>
          <a href="/channel/@bravo"><img src="/bravo.png"><span>Bravo</span></a>
          <a href="/watch?v=CCCCCCCCCCC"><div>Charlie video title</div></a>
        </div>
    "#;
    let cards = extract_cards(html);
    let channels: Vec<_> = cards
        .iter()
        .map(|card| {
            card.channel
                .as_ref()
                .map(|c| (c.id.as_str(), c.name.as_str(), c.avatar_url.as_str()))
        })
        .collect();

    assert_eq!(
        channels,
        vec![
            Some(("UCaaaaaaaaaaaaaaaaaaaaaa", "Alpha", "/alpha.png")),
            Some(("@bravo", "Bravo", "/bravo.png")),
            None,
        ]
    );
}

#[test]
fn card_metadata_is_extracted_from_anchor_content() {
    init_logging();
    let html = r#"
        <a class="video" data-x="1" href="/watch?v=FFFFFFFFFFF" title="ignored">
            <img alt="thumb" src="https://cdn.example/thumb.jpg">
            <div class="title">  A   video
                with spacing  </div>
            <small>Published on December 17, 2023 | Archived on January 2, 2024</small>
        </a>
    "#;
    let cards = extract_cards(html);
    let card = &cards[0];

    assert_eq!(card.thumbnail_url, "https://cdn.example/thumb.jpg");
    assert_eq!(card.title, "A video with spacing");
    assert_eq!(card.published_date_raw.as_deref(), Some("December 17, 2023"));
    assert_eq!(card.archived_date_raw.as_deref(), Some("January 2, 2024"));
}

#[test]
fn missing_fields_degrade_gracefully() {
    init_logging();
    let html = r#"<a href='/watch?v=GGGGGGGGGGG'><img alt="no source"><b>short</b></a>"#;
    let cards = extract_cards(html);
    let card = &cards[0];

    assert_eq!(card.thumbnail_url, "");
    assert_eq!(card.title, "Video GGGGGGGGGGG");
    assert_eq!(card.published_date_raw, None);
    assert_eq!(card.archived_date_raw, None);
    assert_eq!(card.channel, None);
}

#[test]
fn channel_anchor_without_text_is_named_after_id() {
    init_logging();
    let html = r#"<a href="/watch?v=HHHHHHHHHHH">x</a> <a href="/channel/@quiet"><img src="/q.png">  </a>"#;
    let cards = extract_cards(html);
    let channel = cards[0].channel.as_ref().unwrap();

    assert_eq!(channel.name, "@quiet");
    assert_eq!(channel.avatar_url, "/q.png");
}

#[test]
fn non_watch_links_are_ignored() {
    init_logging();
    let html = r#"
        <a href="/watch?v=tooshort">Broken</a>
        <a href="https://example.com/watch?v=IIIIIIIIIII">External</a>
        <a href="/channel/@foo/videos">Videos tab</a>
    "#;
    assert!(extract_cards(html).is_empty());
}

#[test]
fn correlation_requires_strictly_later_start() {
    let channels = vec![
        ChannelAnchor {
            id: ChannelId::new("@at"),
            content: "",
            start: 10,
        },
        ChannelAnchor {
            id: ChannelId::new("@after"),
            content: "",
            start: 11,
        },
    ];
    assert_eq!(
        correlate_channel(10, &channels).map(|c| c.id.as_str()),
        Some("@after")
    );
    assert_eq!(correlate_channel(11, &channels), None);
}
