//! Atom 1.0 feed rendering.
//!
//! [`AtomFeed`] mirrors the Atom 1.0 schema, including text constructs and
//! the inline/out-of-line entry content split. It can be filled in directly,
//! or converted from the canonical [`FeedModel`] with [`AtomFeed::from_model`].

use crate::{
    config::FeedConfig,
    debug,
    error::{Required, Result},
    model::{FeedModel, Person},
    utils::{
        date::DateTimeUtc,
        xml::{
            Fragments, Layout, XML_DECLARATION, attrs, element, empty_element, escape,
            non_blank, opt_element,
        },
    },
};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

// ============================================================================
// Document
// ============================================================================

/// How a text construct's value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextType {
    #[default]
    Text,
    Html,
    /// Value is inserted verbatim and must be well-formed XHTML.
    Xhtml,
}

impl TextType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Xhtml => "xhtml",
        }
    }
}

/// A value plus the type describing how to read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextConstruct {
    pub kind: TextType,
    pub value: String,
}

impl TextConstruct {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            kind: TextType::Text,
            value: value.into(),
        }
    }

    pub fn html(value: impl Into<String>) -> Self {
        Self {
            kind: TextType::Html,
            value: value.into(),
        }
    }

    pub fn xhtml(value: impl Into<String>) -> Self {
        Self {
            kind: TextType::Xhtml,
            value: value.into(),
        }
    }

    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Entry content: inline text, or a reference to content elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Inline(TextConstruct),
    External { src: String, mime_type: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomLink {
    pub href: String,
    pub rel: Option<String>,
    pub mime_type: Option<String>,
    pub hreflang: Option<String>,
    pub title: Option<String>,
    /// Length in octets.
    pub length: Option<u64>,
}

impl AtomLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = Some(rel.into());
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomPerson {
    pub name: String,
    pub email: Option<String>,
    pub uri: Option<String>,
}

impl From<&Person> for AtomPerson {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            email: person.email.clone(),
            uri: person.link.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomCategory {
    pub term: String,
    pub scheme: Option<String>,
    pub label: Option<String>,
}

impl AtomCategory {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generator {
    pub value: String,
    pub uri: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomFeed {
    pub title: TextConstruct,
    pub subtitle: Option<TextConstruct>,
    pub rights: Option<TextConstruct>,
    pub id: String,
    /// Defaults to the render time.
    pub updated: Option<DateTimeUtc>,
    pub links: Vec<AtomLink>,
    pub authors: Vec<AtomPerson>,
    pub contributors: Vec<AtomPerson>,
    pub categories: Vec<AtomCategory>,
    pub generator: Option<Generator>,
    pub icon: Option<String>,
    pub logo: Option<String>,
    /// `xml:lang` on the root element.
    pub lang: Option<String>,
    pub entries: Vec<AtomEntry>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomEntry {
    pub title: Option<TextConstruct>,
    pub id: String,
    /// Defaults to the render time.
    pub updated: Option<DateTimeUtc>,
    pub published: Option<DateTimeUtc>,
    pub links: Vec<AtomLink>,
    pub authors: Vec<AtomPerson>,
    pub contributors: Vec<AtomPerson>,
    pub categories: Vec<AtomCategory>,
    pub content: Option<Content>,
    pub summary: Option<TextConstruct>,
    pub rights: Option<TextConstruct>,
    pub source: Option<AtomSource>,
}

/// Metadata of the feed an entry was copied from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomSource {
    pub id: Option<String>,
    pub title: Option<TextConstruct>,
    pub updated: Option<DateTimeUtc>,
    pub links: Vec<AtomLink>,
}

// ============================================================================
// Conversion from the canonical model
// ============================================================================

impl AtomFeed {
    pub fn from_model(model: &FeedModel, config: &FeedConfig) -> Self {
        let mut links = Vec::new();
        if let Some(link) = &model.link {
            links.push(AtomLink::new(link.clone()).rel("alternate"));
        }
        if let Some(href) = &model.feed_links.atom {
            links.push(
                AtomLink::new(href.clone())
                    .rel("self")
                    .mime_type("application/atom+xml"),
            );
        }

        let entries = model
            .items
            .iter()
            .map(|item| {
                let mut links = Vec::new();
                if let Some(link) = &item.link {
                    links.push(AtomLink::new(link.clone()).rel("alternate"));
                }
                if let Some(image) = &item.image {
                    links.push(AtomLink {
                        length: image.length,
                        ..AtomLink::new(image.url.clone())
                            .rel("enclosure")
                            .mime_type(image.mime_type.clone())
                    });
                }
                if let Some(comments) = &item.comments {
                    links.push(AtomLink::new(comments.clone()).rel("replies"));
                }

                AtomEntry {
                    title: item.title.clone().map(TextConstruct::plain),
                    id: item.resolved_id().unwrap_or_default().to_string(),
                    updated: item.updated.or(item.date),
                    published: item.date,
                    links,
                    authors: item.author.iter().map(AtomPerson::from).collect(),
                    contributors: item.contributors.iter().map(AtomPerson::from).collect(),
                    categories: item.categories.iter().map(AtomCategory::new).collect(),
                    content: item.content.clone().map(|c| Content::Inline(TextConstruct::html(c))),
                    summary: item.description.clone().map(TextConstruct::html),
                    rights: None,
                    source: item.source.as_ref().map(|source| AtomSource {
                        id: Some(source.url.clone()),
                        title: Some(TextConstruct::plain(source.title.clone())),
                        updated: None,
                        links: vec![AtomLink::new(source.url.clone()).rel("self")],
                    }),
                }
            })
            .collect();

        Self {
            title: TextConstruct::plain(model.title.clone()),
            subtitle: model.description.clone().map(TextConstruct::plain),
            rights: model.copyright.clone().map(TextConstruct::plain),
            id: model.id.clone(),
            updated: model.updated,
            links,
            authors: model.author.iter().map(AtomPerson::from).collect(),
            contributors: model.contributors.iter().map(AtomPerson::from).collect(),
            categories: model.categories.iter().map(AtomCategory::new).collect(),
            generator: model
                .generator
                .clone()
                .or_else(|| config.generator.clone())
                .map(|value| Generator {
                    value,
                    ..Generator::default()
                }),
            icon: model.favicon.clone(),
            logo: model.image.as_ref().map(|image| image.url.clone()),
            lang: model.language.clone(),
            entries,
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders [`AtomFeed`] documents.
#[derive(Debug, Clone, Default)]
pub struct AtomRenderer {
    layout: Layout,
}

impl AtomRenderer {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            layout: Layout::from_minify(config.minify),
        }
    }

    pub fn render(&self, feed: &AtomFeed) -> Result<String> {
        self.render_at(feed, DateTimeUtc::now())
    }

    /// Render with `now` as the current time.
    pub fn render_at(&self, feed: &AtomFeed, now: DateTimeUtc) -> Result<String> {
        let updated = feed.updated.unwrap_or(now);

        validate(feed)?;

        let mut body = Fragments::new();
        body.opt(text_construct("title", Some(&feed.title)))
            .opt(text_construct("subtitle", feed.subtitle.as_ref()))
            .opt(text_construct("rights", feed.rights.as_ref()))
            .extend(render_links(&feed.links))
            .push(element("id", &feed.id))
            .push(element("updated", &updated.to_rfc3339()))
            .opt(feed.generator.as_ref().and_then(render_generator));
        push_people(&mut body, "author", &feed.authors);
        push_people(&mut body, "contributor", &feed.contributors);
        body.extend(render_categories(&feed.categories))
            .opt(opt_element("icon", feed.icon.as_deref()))
            .opt(opt_element("logo", feed.logo.as_deref()));

        for entry in &feed.entries {
            body.block("<entry>", render_entry(entry, now), "</entry>");
        }

        let open = format!(
            "<feed{}>",
            attrs(&[("xmlns", Some(ATOM_NS)), ("xml:lang", feed.lang.as_deref())])
        );
        let mut doc = Fragments::new();
        doc.push(XML_DECLARATION).block(open, body, "</feed>");

        debug!("atom"; "rendered feed `{}` with {} entries", feed.id.trim(), feed.entries.len());
        Ok(doc.render(self.layout))
    }
}

fn validate(feed: &AtomFeed) -> Result<()> {
    let mut required = Required::new();
    required
        .text("title", Some(feed.title.value.as_str()))
        .text("id", Some(feed.id.as_str()));
    for (i, entry) in feed.entries.iter().enumerate() {
        required.text(format!("entries[{i}].id"), Some(entry.id.as_str()));
    }
    required.into_result()
}

fn render_entry(entry: &AtomEntry, now: DateTimeUtc) -> Fragments {
    let updated = entry.updated.unwrap_or(now);

    let mut f = Fragments::new();
    f.opt(text_construct("title", entry.title.as_ref()))
        .extend(render_links(&entry.links))
        .push(element("id", &entry.id))
        .push(element("updated", &updated.to_rfc3339()))
        .opt(entry.published.map(|d| element("published", &d.to_rfc3339())))
        .extend(render_categories(&entry.categories))
        .opt(entry.content.as_ref().and_then(render_content))
        .opt(text_construct("summary", entry.summary.as_ref()));
    push_people(&mut f, "author", &entry.authors);
    push_people(&mut f, "contributor", &entry.contributors);
    f.opt(text_construct("rights", entry.rights.as_ref()));

    if let Some(source) = &entry.source {
        let mut inner = Fragments::new();
        inner
            .opt(opt_element("id", source.id.as_deref()))
            .opt(text_construct("title", source.title.as_ref()))
            .opt(source.updated.map(|d| element("updated", &d.to_rfc3339())))
            .extend(render_links(&source.links));
        if !inner.is_empty() {
            f.block("<source>", inner, "</source>");
        }
    }
    f
}

/// `<tag type="...">value</tag>`; `None` when absent or blank.
fn text_construct(tag: &str, construct: Option<&TextConstruct>) -> Option<String> {
    let construct = construct.filter(|c| !c.is_blank())?;
    let value = construct.value.trim();
    let value = match construct.kind {
        TextType::Xhtml => value.into(),
        TextType::Text | TextType::Html => escape(value),
    };
    Some(format!(
        r#"<{tag} type="{}">{value}</{tag}>"#,
        construct.kind.as_str()
    ))
}

fn render_content(content: &Content) -> Option<String> {
    match content {
        Content::Inline(text) => text_construct("content", Some(text)),
        Content::External { src, mime_type } => non_blank(Some(src.as_str())).map(|src| {
            empty_element(
                "content",
                &[("src", Some(src)), ("type", Some(mime_type.as_str()))],
            )
        }),
    }
}

fn render_generator(generator: &Generator) -> Option<String> {
    non_blank(Some(generator.value.as_str())).map(|value| {
        format!(
            "<generator{}>{}</generator>",
            attrs(&[
                ("uri", generator.uri.as_deref()),
                ("version", generator.version.as_deref()),
            ]),
            escape(value)
        )
    })
}

fn render_links(links: &[AtomLink]) -> impl Iterator<Item = String> + '_ {
    links
        .iter()
        .filter(|link| non_blank(Some(link.href.as_str())).is_some())
        .map(|link| {
            let length = link.length.map(|l| l.to_string());
            empty_element(
                "link",
                &[
                    ("href", Some(link.href.as_str())),
                    ("rel", link.rel.as_deref()),
                    ("type", link.mime_type.as_deref()),
                    ("hreflang", link.hreflang.as_deref()),
                    ("title", link.title.as_deref()),
                    ("length", length.as_deref()),
                ],
            )
        })
}

fn render_categories(categories: &[AtomCategory]) -> impl Iterator<Item = String> + '_ {
    categories
        .iter()
        .filter(|cat| non_blank(Some(cat.term.as_str())).is_some())
        .map(|cat| {
            empty_element(
                "category",
                &[
                    ("term", Some(cat.term.as_str())),
                    ("scheme", cat.scheme.as_deref()),
                    ("label", cat.label.as_deref()),
                ],
            )
        })
}

/// Person constructs as multi-line blocks; nameless people are skipped.
fn push_people(f: &mut Fragments, tag: &str, people: &[AtomPerson]) {
    for person in people {
        let Some(name) = non_blank(Some(person.name.as_str())) else {
            continue;
        };
        let mut inner = Fragments::new();
        inner
            .push(element("name", name))
            .opt(opt_element("email", person.email.as_deref()))
            .opt(opt_element("uri", person.uri.as_deref()));
        f.block(format!("<{tag}>"), inner, format!("</{tag}>"));
    }
}
