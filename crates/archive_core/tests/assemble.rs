use archive_core::{
    extract_cards, AuthorRef, ChannelDirectory, ChannelId, RecordAssembler, VideoRecord,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

const LISTING: &str = r#"
    <a href="/watch?v=AAAAAAAAAAA">
        <img src="/thumb/a.jpg">
        <div>First archived video</div>
        <span>Published on March 3, 2021 | Archived on March 4, 2021</span>
    </a>
    <a href="/channel/@alpha"><img src="/alpha.png">Alpha</a>
    <a href="/watch?v=BBBBBBBBBBB"><div>Second archived video</div></a>
"#;

fn assembler() -> RecordAssembler {
    RecordAssembler::at(Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap())
}

#[test]
fn listing_videos_keep_their_bylines() {
    let records = assembler().videos(extract_cards(LISTING));

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.url, "https://preservetube.com/watch?v=AAAAAAAAAAA");
    assert_eq!(first.title, "First archived video");
    assert_eq!(first.thumbnail_url, "/thumb/a.jpg");
    assert_eq!(
        first.uploaded_at,
        Utc.with_ymd_and_hms(2021, 3, 3, 0, 0, 0).unwrap().timestamp()
    );
    assert_eq!(first.archived_date_raw.as_deref(), Some("March 4, 2021"));
    assert_eq!(
        first.author,
        AuthorRef {
            id: ChannelId::new("@alpha"),
            name: "Alpha".to_string(),
            url: "https://preservetube.com/channel/@alpha".to_string(),
            avatar_url: "/alpha.png".to_string(),
        }
    );
}

#[test]
fn missing_byline_and_date_use_sentinels() {
    let now = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
    let records = assembler().videos(extract_cards(LISTING));
    let second: &VideoRecord = &records[1];

    assert_eq!(second.author, AuthorRef::unknown());
    assert_eq!(second.author.name, "Unknown");
    assert_eq!(second.uploaded_at, now.timestamp());
}

#[test]
fn channel_pages_use_directory_record_when_available() {
    let id = ChannelId::new("@alpha");
    let mut directory = ChannelDirectory::new();
    let page = r#"<h1>Alpha Official</h1><img class="avatar" src="/big-alpha.png">"#;
    let record = directory
        .resolve(&id, |id| {
            Ok::<_, String>(archive_core::scrape_channel_page(id, page))
        })
        .unwrap()
        .clone();

    let records = assembler().channel_videos(extract_cards(LISTING), &id, Some(&record));
    assert!(records.iter().all(|r| r.author.name == "Alpha Official"));
    assert!(records.iter().all(|r| r.author.avatar_url == "/big-alpha.png"));
}

#[test]
fn channel_pages_fall_back_to_placeholder_author() {
    let id = ChannelId::new("somechannel");
    let records = assembler().channel_videos(extract_cards(LISTING), &id, None);

    assert_eq!(records[1].author, AuthorRef::placeholder(&id));
    assert_eq!(records[1].author.name, "somechannel");
    assert_eq!(
        records[1].author.url,
        "https://preservetube.com/channel/somechannel"
    );
}
