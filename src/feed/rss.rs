//! RSS 2.0 feed rendering.
//!
//! [`RssChannel`] mirrors the RSS 2.0 channel schema. It can be filled in
//! directly, or converted from the canonical [`FeedModel`] with
//! [`RssChannel::from_model`].

use crate::{
    config::FeedConfig,
    debug,
    error::{Required, Result},
    model::{FeedModel, Person},
    utils::{
        date::DateTimeUtc,
        xml::{
            Fragments, Layout, XML_DECLARATION, attrs, element, empty_element, escape,
            non_blank, opt_cdata_element, opt_element,
        },
    },
};
use regex::Regex;
use std::{fmt, sync::LazyLock};

const RSS_OPEN: &str = concat!(
    r#"<rss version="2.0""#,
    r#" xmlns:atom="http://www.w3.org/2005/Atom""#,
    r#" xmlns:content="http://purl.org/rss/1.0/modules/content/""#,
    r#" xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
);

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssChannel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: Option<String>,
    pub image: Option<RssImage>,
    pub copyright: Option<String>,
    pub last_build_date: Option<DateTimeUtc>,
    pub generator: Option<String>,
    pub docs: Option<String>,
    pub managing_editor: Option<String>,
    pub web_master: Option<String>,
    pub categories: Vec<RssCategory>,
    /// Rendered as `dc:contributor`.
    pub contributors: Vec<String>,
    pub ttl: Option<u32>,
    pub cloud: Option<Cloud>,
    pub skip_hours: Vec<u8>,
    pub skip_days: Vec<SkipDay>,
    /// Href of the `atom:link rel="self"`; defaults to `<link>/<rss_path>`.
    pub self_link: Option<String>,
    pub items: Vec<RssItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssImage {
    pub url: String,
    /// Defaults to the channel title.
    pub title: Option<String>,
    /// Defaults to the channel link.
    pub link: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssCategory {
    pub value: String,
    pub domain: Option<String>,
}

impl RssCategory {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            domain: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloud {
    pub domain: String,
    pub port: u16,
    pub path: String,
    pub register_procedure: String,
    pub protocol: CloudProtocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudProtocol {
    HttpPost,
    XmlRpc,
    Soap,
}

impl CloudProtocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HttpPost => "http-post",
            Self::XmlRpc => "xml-rpc",
            Self::Soap => "soap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl fmt::Display for SkipDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RssItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// Wrapped in CDATA.
    pub description: Option<String>,
    /// Full content, rendered as `content:encoded` in CDATA.
    pub content: Option<String>,
    /// `email (Name)` form.
    pub author: Option<String>,
    pub categories: Vec<RssCategory>,
    pub comments: Option<String>,
    pub enclosure: Option<RssEnclosure>,
    pub guid: Option<Guid>,
    /// Defaults to the channel's last build date, then the render time.
    pub pub_date: Option<DateTimeUtc>,
    pub source: Option<RssSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssEnclosure {
    pub url: String,
    pub mime_type: String,
    pub length: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guid {
    pub value: String,
    /// Overrides the derived default (true exactly when the item has a link).
    pub is_permalink: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssSource {
    pub url: String,
    pub title: String,
}

// ============================================================================
// Conversion from the canonical model
// ============================================================================

impl RssChannel {
    pub fn from_model(model: &FeedModel, config: &FeedConfig) -> Self {
        let items = model
            .items
            .iter()
            .map(|item| RssItem {
                title: item.title.clone(),
                link: item.link.clone(),
                description: item.description.clone(),
                content: item.content.clone(),
                author: item.author.as_ref().map(normalize_rss_author),
                categories: item.categories.iter().map(RssCategory::new).collect(),
                comments: item.comments.clone(),
                enclosure: item.image.as_ref().map(|image| RssEnclosure {
                    url: image.url.clone(),
                    mime_type: image.mime_type.clone(),
                    length: image.length.unwrap_or(0),
                }),
                guid: item.resolved_id().map(|value| Guid {
                    value: value.to_string(),
                    is_permalink: item.guid_is_permalink,
                }),
                pub_date: item.date,
                source: item.source.as_ref().map(|source| RssSource {
                    url: source.url.clone(),
                    title: source.title.clone(),
                }),
            })
            .collect();

        Self {
            title: model.title.clone(),
            link: model.link.clone().unwrap_or_default(),
            description: model.description.clone().unwrap_or_default(),
            language: model.language.clone(),
            image: model.image.as_ref().map(|image| RssImage {
                url: image.url.clone(),
                title: image.title.clone(),
                link: image.link.clone(),
                width: image.width,
                height: image.height,
                description: image.description.clone(),
            }),
            copyright: model.copyright.clone(),
            last_build_date: model.updated,
            generator: model.generator.clone().or_else(|| config.generator.clone()),
            managing_editor: model.author.as_ref().map(normalize_rss_author),
            categories: model.categories.iter().map(RssCategory::new).collect(),
            contributors: model.contributors.iter().map(|p| p.name.clone()).collect(),
            self_link: model.feed_links.rss.clone(),
            items,
            ..Self::default()
        }
    }
}

/// Normalize a person to the RSS author format: "email (Name)".
fn normalize_rss_author(person: &Person) -> String {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$")
            .expect("author pattern is valid")
    });

    let name = person.name.trim();

    // Already in RSS form
    if RE_VALID_AUTHOR.is_match(name) {
        return name.to_string();
    }

    match non_blank(person.email.as_deref()) {
        Some(email) => format!("{email} ({name})"),
        None => name.to_string(),
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders [`RssChannel`] documents.
#[derive(Debug, Clone)]
pub struct RssRenderer {
    layout: Layout,
    rss_path: String,
}

impl Default for RssRenderer {
    fn default() -> Self {
        Self::new(&FeedConfig::default())
    }
}

/// Defaults resolved once per render.
struct Resolved {
    last_build_date: Option<DateTimeUtc>,
    /// Publish date for items without one.
    item_date: DateTimeUtc,
    self_link: String,
}

impl RssRenderer {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            layout: Layout::from_minify(config.minify),
            rss_path: config.rss_path.clone(),
        }
    }

    pub fn render(&self, channel: &RssChannel) -> Result<String> {
        self.render_at(channel, DateTimeUtc::now())
    }

    /// Render with `now` as the current time.
    pub fn render_at(&self, channel: &RssChannel, now: DateTimeUtc) -> Result<String> {
        validate(channel)?;

        let resolved = Resolved {
            last_build_date: channel.last_build_date,
            item_date: channel.last_build_date.unwrap_or(now),
            self_link: non_blank(channel.self_link.as_deref()).map_or_else(
                || FeedConfig::feed_url(&channel.link, &self.rss_path),
                str::to_string,
            ),
        };

        let mut body = channel_head(channel, &resolved);
        for item in &channel.items {
            body.block("<item>", render_item(item, &resolved), "</item>");
        }

        let mut rss = Fragments::new();
        rss.block("<channel>", body, "</channel>");

        let mut doc = Fragments::new();
        doc.push(XML_DECLARATION).block(RSS_OPEN, rss, "</rss>");

        debug!("rss"; "rendered channel `{}` with {} items", channel.title.trim(), channel.items.len());
        Ok(doc.render(self.layout))
    }
}

fn validate(channel: &RssChannel) -> Result<()> {
    let mut required = Required::new();
    required
        .text("title", Some(channel.title.as_str()))
        .text("description", Some(channel.description.as_str()))
        .text("link", Some(channel.link.as_str()));
    required.into_result()
}

fn channel_head(channel: &RssChannel, resolved: &Resolved) -> Fragments {
    let mut f = Fragments::new();
    f.push(element("title", &channel.title))
        .push(element("link", &channel.link))
        .push(element("description", &channel.description))
        .opt(opt_element("language", channel.language.as_deref()));

    if let Some(image) = &channel.image
        && let Some(url) = non_blank(Some(image.url.as_str()))
    {
        let mut inner = Fragments::new();
        inner
            .push(element("url", url))
            .push(element(
                "title",
                non_blank(image.title.as_deref()).unwrap_or(&channel.title),
            ))
            .push(element(
                "link",
                non_blank(image.link.as_deref()).unwrap_or(&channel.link),
            ))
            .opt(image.width.map(|w| format!("<width>{w}</width>")))
            .opt(image.height.map(|h| format!("<height>{h}</height>")))
            .opt(opt_element("description", image.description.as_deref()));
        f.block("<image>", inner, "</image>");
    }

    f.opt(opt_element("copyright", channel.copyright.as_deref()))
        .opt(
            resolved
                .last_build_date
                .map(|d| element("lastBuildDate", &d.to_rfc2822())),
        )
        .opt(opt_element("generator", channel.generator.as_deref()))
        .opt(opt_element("docs", channel.docs.as_deref()))
        .opt(opt_element("managingEditor", channel.managing_editor.as_deref()))
        .opt(opt_element("webMaster", channel.web_master.as_deref()))
        .extend(render_categories(&channel.categories))
        .extend(
            channel
                .contributors
                .iter()
                .filter_map(|name| opt_element("dc:contributor", Some(name.as_str()))),
        )
        .opt(channel.ttl.map(|ttl| format!("<ttl>{ttl}</ttl>")))
        .opt(channel.cloud.as_ref().map(|cloud| {
            let port = cloud.port.to_string();
            empty_element(
                "cloud",
                &[
                    ("domain", Some(cloud.domain.as_str())),
                    ("port", Some(port.as_str())),
                    ("path", Some(cloud.path.as_str())),
                    ("registerProcedure", Some(cloud.register_procedure.as_str())),
                    ("protocol", Some(cloud.protocol.as_str())),
                ],
            )
        }));

    if !channel.skip_hours.is_empty() {
        let mut hours = Fragments::new();
        hours.extend(channel.skip_hours.iter().map(|h| format!("<hour>{h}</hour>")));
        f.block("<skipHours>", hours, "</skipHours>");
    }
    if !channel.skip_days.is_empty() {
        let mut days = Fragments::new();
        days.extend(channel.skip_days.iter().map(|d| format!("<day>{d}</day>")));
        f.block("<skipDays>", days, "</skipDays>");
    }

    f.push(empty_element(
        "atom:link",
        &[
            ("href", Some(resolved.self_link.as_str())),
            ("rel", Some("self")),
            ("type", Some("application/rss+xml")),
        ],
    ));
    f
}

fn render_item(item: &RssItem, resolved: &Resolved) -> Fragments {
    let link = non_blank(item.link.as_deref());

    // Explicit guid value, else the link; no element when neither exists.
    let guid = item
        .guid
        .as_ref()
        .and_then(|g| non_blank(Some(g.value.as_str())))
        .or(link)
        .map(|value| {
            let is_permalink = item
                .guid
                .as_ref()
                .and_then(|g| g.is_permalink)
                .unwrap_or(link.is_some());
            format!(
                r#"<guid isPermaLink="{is_permalink}">{}</guid>"#,
                escape(value)
            )
        });

    let pub_date = item.pub_date.unwrap_or(resolved.item_date);

    let mut f = Fragments::new();
    f.opt(opt_element("title", item.title.as_deref()))
        .opt(opt_element("link", link))
        .opt(guid)
        .opt(opt_cdata_element("description", item.description.as_deref()))
        .opt(opt_cdata_element("content:encoded", item.content.as_deref()))
        .opt(
            item.enclosure
                .as_ref()
                .filter(|e| non_blank(Some(e.url.as_str())).is_some())
                .map(|e| {
                    let length = e.length.to_string();
                    empty_element(
                        "enclosure",
                        &[
                            ("url", Some(e.url.as_str())),
                            ("type", Some(e.mime_type.as_str())),
                            ("length", Some(length.as_str())),
                        ],
                    )
                }),
        )
        .push(element("pubDate", &pub_date.to_rfc2822()))
        .opt(opt_element("comments", item.comments.as_deref()))
        .opt(opt_element("author", item.author.as_deref()))
        .extend(render_categories(&item.categories))
        .opt(item.source.as_ref().and_then(|source| {
            non_blank(Some(source.url.as_str())).map(|url| {
                format!(
                    "<source{}>{}</source>",
                    attrs(&[("url", Some(url))]),
                    escape(source.title.trim())
                )
            })
        }));
    f
}

fn render_categories(categories: &[RssCategory]) -> impl Iterator<Item = String> + '_ {
    categories.iter().filter_map(|cat| {
        non_blank(Some(cat.value.as_str())).map(|value| {
            format!(
                "<category{}>{}</category>",
                attrs(&[("domain", cat.domain.as_deref())]),
                escape(value)
            )
        })
    })
}
