//! End-to-end rendering checks: output is parsed back with real feed readers.

use std::str::FromStr;
use tola_feed::{
    DateTimeUtc, Enclosure, FeedConfig, FeedError, FeedFormat, FeedModel, Feeds, Item, Person,
    Source,
};

const NOW: DateTimeUtc = DateTimeUtc::new(2024, 12, 14, 12, 0, 0);

fn blog() -> FeedModel {
    FeedModel {
        title: "Bliztek Blog".to_string(),
        description: Some("Posts & notes".to_string()),
        id: "https://example.com/".to_string(),
        link: Some("https://example.com".to_string()),
        language: Some("en".to_string()),
        updated: DateTimeUtc::parse("2024-12-10T08:00:00Z"),
        generator: Some("tola-ssg".to_string()),
        author: Some(Person::new("Jane Doe").with_email("jane@example.com")),
        categories: vec!["tech".to_string()],
        items: vec![
            Item {
                title: Some("First <Post>".to_string()),
                link: Some("https://example.com/first".to_string()),
                description: Some("<p>Intro with ]]> inside</p>".to_string()),
                content: Some("<article>Full</article>".to_string()),
                date: DateTimeUtc::parse("2024-12-01T10:00:00Z"),
                author: Some(Person::new("Jane Doe").with_email("jane@example.com")),
                categories: vec!["rust".to_string(), "feeds".to_string()],
                comments: Some("https://example.com/first#comments".to_string()),
                ..Item::default()
            },
            Item {
                title: Some("Episode 2".to_string()),
                id: Some("urn:episode:2".to_string()),
                image: Some(Enclosure {
                    url: "https://example.com/ep2.mp3".to_string(),
                    mime_type: "audio/mpeg".to_string(),
                    length: Some(1234),
                }),
                source: Some(Source {
                    url: "https://other.example.com/feed.xml".to_string(),
                    title: "Other".to_string(),
                }),
                ..Item::default()
            },
        ],
        ..FeedModel::default()
    }
}

#[test]
fn rss_output_parses_with_rss_crate() {
    let xml = Feeds::default()
        .render_at(FeedFormat::Rss, &blog(), NOW)
        .unwrap();
    let channel = rss::Channel::from_str(&xml).unwrap();

    assert_eq!(channel.title(), "Bliztek Blog");
    assert_eq!(channel.description(), "Posts & notes");
    assert_eq!(channel.generator(), Some("tola-ssg"));
    assert_eq!(channel.managing_editor(), Some("jane@example.com (Jane Doe)"));
    assert_eq!(
        channel.last_build_date(),
        Some("Tue, 10 Dec 2024 08:00:00 GMT")
    );

    let items = channel.items();
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first.title(), Some("First <Post>"));
    assert_eq!(first.description(), Some("<p>Intro with ]]> inside</p>"));
    assert_eq!(first.content(), Some("<article>Full</article>"));
    assert_eq!(first.pub_date(), Some("Sun, 01 Dec 2024 10:00:00 GMT"));
    assert_eq!(first.categories().len(), 2);
    let guid = first.guid().unwrap();
    assert_eq!(guid.value(), "https://example.com/first");
    assert!(guid.is_permalink());

    let second = &items[1];
    assert_eq!(second.guid().unwrap().value(), "urn:episode:2");
    assert!(!second.guid().unwrap().is_permalink());
    // No pubDate on the item: channel lastBuildDate is used
    assert_eq!(second.pub_date(), Some("Tue, 10 Dec 2024 08:00:00 GMT"));
    let enclosure = second.enclosure().unwrap();
    assert_eq!(enclosure.url(), "https://example.com/ep2.mp3");
    assert_eq!(enclosure.length(), "1234");
    assert_eq!(second.source().unwrap().title(), Some("Other"));
}

#[test]
fn atom_output_parses_with_atom_crate() {
    let xml = Feeds::default()
        .render_at(FeedFormat::Atom, &blog(), NOW)
        .unwrap();
    let feed = atom_syndication::Feed::from_str(&xml).unwrap();

    assert_eq!(feed.title().as_str(), "Bliztek Blog");
    assert_eq!(feed.id(), "https://example.com/");
    assert_eq!(feed.updated().to_rfc3339(), "2024-12-10T08:00:00+00:00");
    assert_eq!(feed.authors()[0].name(), "Jane Doe");
    assert_eq!(feed.authors()[0].email(), Some("jane@example.com"));

    let entries = feed.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title().as_str(), "First <Post>");
    assert_eq!(entries[0].id(), "https://example.com/first");
    assert_eq!(entries[0].categories().len(), 2);
    assert_eq!(
        entries[0].content().and_then(|c| c.value()),
        Some("<article>Full</article>")
    );
    assert_eq!(entries[1].id(), "urn:episode:2");
    // Missing entry date falls back to the render time
    assert_eq!(entries[1].updated().to_rfc3339(), "2024-12-14T12:00:00+00:00");
    assert!(
        entries[1]
            .links()
            .iter()
            .any(|l| l.rel() == "enclosure" && l.href() == "https://example.com/ep2.mp3")
    );
}

#[test]
fn json_output_round_trips_as_value_tree() {
    let json = Feeds::default()
        .render_at(FeedFormat::Json, &blog(), NOW)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["version"], "https://jsonfeed.org/version/1.1");
    assert_eq!(value["feed_url"], "https://example.com/feed.json");
    assert_eq!(value["items"][0]["id"], "https://example.com/first");
    assert_eq!(value["items"][0]["date_published"], "2024-12-01T10:00:00Z");
    assert_eq!(value["items"][1]["id"], "urn:episode:2");
    assert!(value["items"][1].get("external_url").is_none());
    assert!(value["items"][1].get("date_published").is_none());
}

#[test]
fn minified_xml_has_no_newlines() {
    let feeds = Feeds::new(FeedConfig {
        minify: true,
        ..FeedConfig::default()
    });
    for format in [FeedFormat::Rss, FeedFormat::Atom] {
        let xml = feeds.render_at(format, &blog(), NOW).unwrap();
        assert!(!xml.contains('\n'), "{format} output has newlines");
    }
}

#[test]
fn pretty_xml_has_no_blank_lines() {
    let mut model = blog();
    model.copyright = Some("  ".to_string());
    model.items[0].comments = Some(String::new());
    for format in [FeedFormat::Rss, FeedFormat::Atom] {
        let xml = Feeds::default().render_at(format, &model, NOW).unwrap();
        assert!(xml.lines().all(|line| !line.trim().is_empty()));
        assert!(!xml.contains("<copyright>"));
        assert!(!xml.contains("<rights"));
    }
}

#[test]
fn missing_fields_produce_no_output() {
    let mut model = blog();
    model.title = String::new();
    model.link = None;
    let err = Feeds::default()
        .render_at(FeedFormat::Rss, &model, NOW)
        .unwrap_err();
    assert!(matches!(err, FeedError::MissingRequiredField { .. }));
    assert_eq!(err.to_string(), "missing required field(s): title, link");
}

#[test]
fn dispatcher_accepts_format_names() {
    let model = blog();
    assert!(tola_feed::render("json", &model).unwrap().starts_with('{'));
    assert!(matches!(
        tola_feed::render("rdf", &model),
        Err(FeedError::UnsupportedFormat(_))
    ));
}

#[test]
fn config_file_drives_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tola.toml");
    std::fs::write(&path, "[feed]\nformat = \"atom\"\nminify = true\n").unwrap();

    let feeds = Feeds::new(FeedConfig::load(&path).unwrap());
    let xml = feeds.render_default(&blog()).unwrap();
    assert!(xml.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom" xml:lang="en">"#));
}
