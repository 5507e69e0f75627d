//! Canonical feed model.
//!
//! One format-neutral description of a feed. The dispatcher converts it into
//! the RSS, Atom or JSON Feed document types; callers who need format-only
//! fields (RSS `cloud`, Atom `rights`, JSON Feed `hubs`, ...) build those
//! documents directly instead.
//!
//! The model deserializes from any serde format, so a pipeline can keep it in
//! TOML or JSON:
//!
//! ```toml
//! title = "My Blog"
//! description = "Notes"
//! id = "https://example.com/"
//! link = "https://example.com/"
//!
//! [[items]]
//! title = "Hello"
//! link = "https://example.com/hello/"
//! date = "2024-12-14T12:00:00Z"
//! ```

use crate::utils::{date::DateTimeUtc, xml::non_blank};
use serde::{Deserialize, Serialize};

/// A feed: site metadata plus an ordered list of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedModel {
    pub title: String,
    /// Required for RSS and Atom (as subtitle), optional for JSON Feed.
    pub description: Option<String>,
    /// URI or opaque unique string.
    pub id: String,
    /// Home page. Required for RSS and Atom.
    pub link: Option<String>,
    pub language: Option<String>,
    pub copyright: Option<String>,
    /// Defaults to the render time.
    pub updated: Option<DateTimeUtc>,
    pub generator: Option<String>,
    pub image: Option<Image>,
    pub favicon: Option<String>,
    pub author: Option<Person>,
    pub categories: Vec<String>,
    pub contributors: Vec<Person>,
    pub feed_links: FeedLinks,
    pub items: Vec<Item>,
}

/// One published entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub title: Option<String>,
    /// Falls back to `link` when absent.
    pub id: Option<String>,
    pub link: Option<String>,
    /// Short description or summary.
    pub description: Option<String>,
    /// Full HTML content.
    pub content: Option<String>,
    pub author: Option<Person>,
    pub contributors: Vec<Person>,
    /// Publish time.
    pub date: Option<DateTimeUtc>,
    /// Last modification time.
    pub updated: Option<DateTimeUtc>,
    pub image: Option<Enclosure>,
    pub categories: Vec<String>,
    /// Overrides the derived RSS `isPermaLink` when set.
    pub guid_is_permalink: Option<bool>,
    pub comments: Option<String>,
    pub source: Option<Source>,
}

impl Item {
    /// Explicit id, else the link.
    pub fn resolved_id(&self) -> Option<&str> {
        non_blank(self.id.as_deref()).or_else(|| non_blank(self.link.as_deref()))
    }
}

/// Author or contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: String,
    pub email: Option<String>,
    /// Profile page.
    pub link: Option<String>,
    /// JSON Feed only.
    pub avatar: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Feed-level image or icon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    /// Alt text. RSS uses the channel title when absent.
    pub title: Option<String>,
    /// Where the image links to. RSS uses the channel link when absent.
    pub link: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub description: Option<String>,
}

/// External binary resource attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
    /// Size in bytes.
    pub length: Option<u64>,
}

/// The feed an item was republished from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub url: String,
    pub title: String,
}

/// Self links of the generated documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedLinks {
    pub rss: Option<String>,
    pub atom: Option<String>,
    pub json: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_id_falls_back_to_link() {
        let mut item = Item {
            link: Some("https://example.com/a".to_string()),
            ..Item::default()
        };
        assert_eq!(item.resolved_id(), Some("https://example.com/a"));

        item.id = Some("urn:a".to_string());
        assert_eq!(item.resolved_id(), Some("urn:a"));

        item.id = Some("  ".to_string());
        assert_eq!(item.resolved_id(), Some("https://example.com/a"));

        item.link = None;
        assert_eq!(item.resolved_id(), None);
    }

    #[test]
    fn test_model_from_toml() {
        let model: FeedModel = toml::from_str(
            r#"
title = "My Blog"
description = "Notes"
id = "https://example.com/"
link = "https://example.com/"
updated = "2024-12-14T12:00:00Z"
categories = ["rust"]

[author]
name = "Jane"
email = "jane@example.com"

[[items]]
title = "Hello"
link = "https://example.com/hello/"
date = "Sat, 14 Dec 2024 12:00:00 GMT"

[[items]]
title = "World"
"#,
        )
        .unwrap();

        assert_eq!(model.title, "My Blog");
        assert_eq!(model.updated, Some(DateTimeUtc::new(2024, 12, 14, 12, 0, 0)));
        assert_eq!(model.author.as_ref().unwrap().name, "Jane");
        assert_eq!(model.items.len(), 2);
        assert_eq!(model.items[0].date, model.updated);
        assert_eq!(model.items[1].title.as_deref(), Some("World"));
    }

    #[test]
    fn test_person_builder() {
        let p = Person::new("Jane").with_email("jane@example.com");
        assert_eq!(p.name, "Jane");
        assert_eq!(p.email.as_deref(), Some("jane@example.com"));
        assert!(p.link.is_none());
    }
}
