//! JSON Feed 1.1 rendering.
//!
//! Keys are emitted in the order jsonfeed.org documents them. Absent
//! optional values are left out of the object entirely; an explicitly empty
//! list (`Some(vec![])`) still renders as `[]`.

use crate::{
    config::FeedConfig,
    debug,
    error::{Required, Result},
    model::{FeedModel, Person},
    utils::{date::DateTimeUtc, xml::non_blank},
};
use serde::Serialize;

pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonFeed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<JsonAuthor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hubs: Option<Vec<Hub>>,
    pub items: Vec<JsonItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JsonAuthor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&Person> for JsonAuthor {
    fn from(person: &Person) -> Self {
        Self {
            name: Some(person.name.clone()),
            url: person.link.clone(),
            avatar: person.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hub {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<DateTimeUtc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTimeUtc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<JsonAuthor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub url: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_in_seconds: Option<u64>,
}

/// Serialized shape: the version key first, then the feed's own keys.
#[derive(Serialize)]
struct Versioned<'a> {
    version: &'static str,
    #[serde(flatten)]
    feed: &'a JsonFeed,
}

// ============================================================================
// Conversion from the canonical model
// ============================================================================

impl JsonFeed {
    pub fn from_model(model: &FeedModel, config: &FeedConfig) -> Self {
        let items = model
            .items
            .iter()
            .map(|item| {
                // Images go to `image`, anything else becomes an attachment
                let (image, attachment) = match &item.image {
                    Some(e) if e.mime_type.starts_with("image/") => (Some(e.url.clone()), None),
                    Some(e) => (
                        None,
                        Some(Attachment {
                            url: e.url.clone(),
                            mime_type: e.mime_type.clone(),
                            size_in_bytes: e.length,
                            ..Attachment::default()
                        }),
                    ),
                    None => (None, None),
                };

                JsonItem {
                    id: item.resolved_id().unwrap_or_default().to_string(),
                    url: item.link.clone(),
                    external_url: None,
                    title: item.title.clone(),
                    content_html: item.content.clone(),
                    summary: item.description.clone(),
                    image,
                    date_published: item.date,
                    date_modified: item.updated,
                    authors: item
                        .author
                        .as_ref()
                        .map(|author| vec![JsonAuthor::from(author)]),
                    tags: (!item.categories.is_empty()).then(|| item.categories.clone()),
                    attachments: attachment.map(|a| vec![a]),
                    ..JsonItem::default()
                }
            })
            .collect();

        Self {
            title: model.title.clone(),
            home_page_url: model.link.clone(),
            feed_url: model.feed_links.json.clone().or_else(|| {
                non_blank(model.link.as_deref())
                    .map(|link| FeedConfig::feed_url(link, &config.json_path))
            }),
            description: model.description.clone(),
            icon: model.image.as_ref().map(|image| image.url.clone()),
            favicon: model.favicon.clone(),
            authors: model
                .author
                .as_ref()
                .map(|author| vec![JsonAuthor::from(author)]),
            language: model.language.clone(),
            items,
            ..Self::default()
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders [`JsonFeed`] documents.
#[derive(Debug, Clone)]
pub struct JsonFeedRenderer {
    pretty: bool,
}

impl Default for JsonFeedRenderer {
    fn default() -> Self {
        Self::new(&FeedConfig::default())
    }
}

impl JsonFeedRenderer {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            pretty: config.pretty,
        }
    }

    pub fn render(&self, feed: &JsonFeed) -> Result<String> {
        validate(feed)?;

        let mut feed = feed.clone();
        feed.title = feed.title.trim().to_string();
        for item in &mut feed.items {
            item.id = item.id.trim().to_string();
        }

        let doc = Versioned {
            version: JSON_FEED_VERSION,
            feed: &feed,
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&doc)?
        } else {
            serde_json::to_string(&doc)?
        };

        debug!("json"; "rendered feed `{}` with {} items", feed.title, feed.items.len());
        Ok(json)
    }
}

fn validate(feed: &JsonFeed) -> Result<()> {
    let mut required = Required::new();
    required
        .text("title", Some(feed.title.as_str()))
        .check("items", !feed.items.is_empty());
    for (i, item) in feed.items.iter().enumerate() {
        required.text(format!("items[{i}].id"), Some(item.id.as_str()));
    }
    required.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Enclosure, Item, Source};
    use serde_json::Value;

    fn make_feed() -> JsonFeed {
        JsonFeed {
            title: "Feed Title".to_string(),
            items: vec![JsonItem {
                id: "1".to_string(),
                content_html: Some("<p>Hello</p>".to_string()),
                ..JsonItem::default()
            }],
            ..JsonFeed::default()
        }
    }

    fn render_value(feed: &JsonFeed) -> Value {
        let json = JsonFeedRenderer::default().render(feed).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_minimal_item_has_only_set_keys() {
        let value = render_value(&make_feed());
        assert_eq!(value["version"], JSON_FEED_VERSION);
        assert_eq!(value["title"], "Feed Title");

        let item = value["items"][0].as_object().unwrap();
        let keys: Vec<&str> = item.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "content_html"]);
    }

    #[test]
    fn test_top_level_key_order() {
        let mut feed = make_feed();
        feed.home_page_url = Some("https://x".to_string());
        feed.description = Some("D".to_string());
        feed.expired = Some(false);
        feed.hubs = Some(vec![Hub {
            kind: "WebSub".to_string(),
            url: "https://hub.x".to_string(),
        }]);
        let value = render_value(&feed);
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["version", "title", "home_page_url", "description", "expired", "hubs", "items"]
        );
        assert_eq!(value["hubs"][0]["type"], "WebSub");
    }

    #[test]
    fn test_no_nulls_for_unset_fields() {
        let value = render_value(&make_feed());
        fn has_null(v: &Value) -> bool {
            match v {
                Value::Null => true,
                Value::Array(a) => a.iter().any(has_null),
                Value::Object(o) => o.values().any(has_null),
                _ => false,
            }
        }
        assert!(!has_null(&value));
    }

    #[test]
    fn test_explicit_empty_lists_are_kept() {
        let mut feed = make_feed();
        feed.items[0].authors = Some(vec![]);
        feed.items[0].tags = Some(vec![]);
        feed.items[0].attachments = Some(vec![]);
        let value = render_value(&feed);
        assert_eq!(value["items"][0]["authors"], Value::Array(vec![]));
        assert_eq!(value["items"][0]["tags"], Value::Array(vec![]));
        assert_eq!(value["items"][0]["attachments"], Value::Array(vec![]));
    }

    #[test]
    fn test_pretty_uses_two_spaces() {
        let json = JsonFeedRenderer::default().render(&make_feed()).unwrap();
        assert!(json.contains("\n  \"version\""));

        let compact = JsonFeedRenderer::new(&FeedConfig {
            pretty: false,
            ..FeedConfig::default()
        })
        .render(&make_feed())
        .unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_missing_title_and_items() {
        let err = JsonFeedRenderer::default()
            .render(&JsonFeed::default())
            .unwrap_err();
        assert_eq!(err.missing_fields(), ["title", "items"]);
    }

    #[test]
    fn test_item_without_id_aborts_render() {
        let mut feed = make_feed();
        feed.items.push(JsonItem {
            title: Some("No id".to_string()),
            ..JsonItem::default()
        });
        let err = JsonFeedRenderer::default().render(&feed).unwrap_err();
        assert_eq!(err.missing_fields(), ["items[1].id"]);
    }

    #[test]
    fn test_dates_and_attachments() {
        let mut feed = make_feed();
        feed.items[0].date_published = Some(DateTimeUtc::new(2024, 12, 14, 12, 0, 0));
        feed.items[0].attachments = Some(vec![Attachment {
            url: "https://x/a.mp3".to_string(),
            mime_type: "audio/mpeg".to_string(),
            duration_in_seconds: Some(60),
            ..Attachment::default()
        }]);
        let value = render_value(&feed);
        assert_eq!(value["items"][0]["date_published"], "2024-12-14T12:00:00Z");
        let attachment = value["items"][0]["attachments"][0].as_object().unwrap();
        let keys: Vec<&str> = attachment.keys().map(String::as_str).collect();
        assert_eq!(keys, ["url", "mime_type", "duration_in_seconds"]);
    }

    #[test]
    fn test_from_model() {
        let model = FeedModel {
            title: "T".to_string(),
            id: "https://x".to_string(),
            link: Some("https://x/".to_string()),
            author: Some(Person::new("Jane").with_email("jane@x.com")),
            items: vec![
                Item {
                    id: Some("a".to_string()),
                    content: Some("<p>A</p>".to_string()),
                    categories: vec!["rust".to_string()],
                    image: Some(Enclosure {
                        url: "https://x/a.png".to_string(),
                        mime_type: "image/png".to_string(),
                        length: None,
                    }),
                    ..Item::default()
                },
                Item {
                    link: Some("https://x/b".to_string()),
                    image: Some(Enclosure {
                        url: "https://x/b.mp3".to_string(),
                        mime_type: "audio/mpeg".to_string(),
                        length: Some(9),
                    }),
                    ..Item::default()
                },
            ],
            ..FeedModel::default()
        };
        let feed = JsonFeed::from_model(&model, &FeedConfig::default());
        assert_eq!(feed.feed_url.as_deref(), Some("https://x/feed.json"));

        let value = render_value(&feed);
        // Only name/url/avatar survive; email is dropped
        assert_eq!(value["authors"][0], serde_json::json!({ "name": "Jane" }));
        assert_eq!(value["items"][0]["id"], "a");
        assert_eq!(value["items"][0]["image"], "https://x/a.png");
        assert_eq!(value["items"][0]["tags"][0], "rust");
        assert!(value["items"][0].get("attachments").is_none());
        assert_eq!(value["items"][1]["id"], "https://x/b");
        assert_eq!(value["items"][1]["attachments"][0]["size_in_bytes"], 9);
    }

    #[test]
    fn test_source_feed_is_not_external_url() {
        let model = FeedModel {
            title: "T".to_string(),
            items: vec![Item {
                id: Some("a".to_string()),
                source: Some(Source {
                    url: "https://other.example.com/feed.xml".to_string(),
                    title: "Other".to_string(),
                }),
                ..Item::default()
            }],
            ..FeedModel::default()
        };
        let value = render_value(&JsonFeed::from_model(&model, &FeedConfig::default()));
        assert!(value["items"][0].get("external_url").is_none());
    }
}
