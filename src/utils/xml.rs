//! XML fragment assembly.
//!
//! Feeds are built as an ordered list of optional fragments. Absent values
//! produce no fragment, blank fragments are dropped, and the rest is joined
//! with the layout's separator. Nested blocks are indented by depth, never
//! by rewriting their text, so CDATA content keeps its own line breaks.
//!
//! ```ignore
//! let mut channel = Fragments::new();
//! channel
//!     .push(element("title", "T"))
//!     .opt(opt_element("language", None));
//! let mut root = Fragments::new();
//! root.block("<channel>", channel, "</channel>");
//! assert_eq!(root.render(Layout::Compact), "<channel><title>T</title></channel>");
//! ```

use quick_xml::escape::escape as quick_escape;
use std::borrow::Cow;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// How fragments are joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// One fragment per line, two spaces per nesting level.
    #[default]
    Pretty,
    /// Everything on one line.
    Compact,
}

impl Layout {
    pub const fn from_minify(minify: bool) -> Self {
        if minify { Self::Compact } else { Self::Pretty }
    }
}

// ============================================================================
// Fragments
// ============================================================================

#[derive(Debug, Clone)]
enum Fragment {
    Line(String),
    Block {
        open: String,
        children: Fragments,
        close: String,
    },
}

/// Ordered list of optional output fragments.
#[derive(Debug, Clone, Default)]
pub struct Fragments(Vec<Fragment>);

impl Fragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment. Blank text is dropped at render time.
    pub fn push(&mut self, line: impl Into<String>) -> &mut Self {
        self.0.push(Fragment::Line(line.into()));
        self
    }

    /// Append a fragment only when present.
    pub fn opt(&mut self, line: Option<String>) -> &mut Self {
        if let Some(line) = line {
            self.push(line);
        }
        self
    }

    pub fn extend<I>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            self.push(line);
        }
        self
    }

    /// Append a nested element whose children are indented one level.
    pub fn block(
        &mut self,
        open: impl Into<String>,
        children: Fragments,
        close: impl Into<String>,
    ) -> &mut Self {
        self.0.push(Fragment::Block {
            open: open.into(),
            children,
            close: close.into(),
        });
        self
    }

    /// Number of fragments that will actually render.
    pub fn len(&self) -> usize {
        self.0
            .iter()
            .filter(|f| match f {
                Fragment::Line(line) => !line.trim().is_empty(),
                Fragment::Block { .. } => true,
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn render(&self, layout: Layout) -> String {
        let mut out = String::with_capacity(1024);
        self.write(&mut out, 0, layout);
        out
    }

    fn write(&self, out: &mut String, depth: usize, layout: Layout) {
        for fragment in &self.0 {
            match fragment {
                Fragment::Line(line) => {
                    if !line.trim().is_empty() {
                        write_line(out, depth, layout, line);
                    }
                }
                Fragment::Block {
                    open,
                    children,
                    close,
                } => {
                    write_line(out, depth, layout, open);
                    children.write(out, depth + 1, layout);
                    write_line(out, depth, layout, close);
                }
            }
        }
    }
}

fn write_line(out: &mut String, depth: usize, layout: Layout, line: &str) {
    if layout == Layout::Pretty {
        if !out.is_empty() {
            out.push('\n');
        }
        for _ in 0..depth {
            out.push_str("  ");
        }
    }
    out.push_str(line.trim());
}

// ============================================================================
// Element helpers
// ============================================================================

/// Trimmed value, or `None` when absent or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Escape text or attribute content.
pub fn escape(raw: &str) -> Cow<'_, str> {
    quick_escape(raw)
}

/// Wrap text in a CDATA section, splitting any embedded terminator.
pub fn cdata(raw: &str) -> String {
    format!("<![CDATA[{}]]>", raw.replace("]]>", "]]]]><![CDATA[>"))
}

/// `<tag>text</tag>` with the text escaped and trimmed.
pub fn element(tag: &str, text: &str) -> String {
    format!("<{tag}>{}</{tag}>", escape(text.trim()))
}

/// Like [`element`], but `None` for an absent or blank value.
pub fn opt_element(tag: &str, text: Option<&str>) -> Option<String> {
    non_blank(text).map(|text| element(tag, text))
}

/// `<tag><![CDATA[text]]></tag>`, `None` for an absent or blank value.
pub fn opt_cdata_element(tag: &str, text: Option<&str>) -> Option<String> {
    non_blank(text).map(|text| format!("<{tag}>{}</{tag}>", cdata(text)))
}

/// Render ` name="value"` pairs, skipping absent or blank values.
pub fn attrs(pairs: &[(&str, Option<&str>)]) -> String {
    pairs
        .iter()
        .filter_map(|(name, value)| non_blank(*value).map(|v| format!(" {name}=\"{}\"", escape(v))))
        .collect()
}

/// Self-closing element: `<tag a="b" />`.
pub fn empty_element(tag: &str, pairs: &[(&str, Option<&str>)]) -> String {
    format!("<{tag}{} />", attrs(pairs))
}
