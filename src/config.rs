//! Feed rendering configuration.
//!
//! Read from a `[feed]` table, so it can live in a larger site config file:
//!
//! ```toml
//! [feed]
//! format = "atom"
//! generator = "tola-ssg"
//! minify = true
//! ```
//!
//! Every field has a default; an empty file is a valid config.

use crate::{debug, feed::FeedFormat, log};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Format used when the caller does not pick one.
    pub format: FeedFormat,
    /// Generator label used when the model has none.
    pub generator: Option<String>,
    /// Appended to the home link for the RSS self link.
    pub rss_path: String,
    /// Appended to the home link for the JSON Feed `feed_url`.
    pub json_path: String,
    /// Join XML fragments without newlines or indentation.
    pub minify: bool,
    /// Indent JSON Feed output with two spaces.
    pub pretty: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            format: FeedFormat::Rss,
            generator: None,
            rss_path: "rss.xml".to_string(),
            json_path: "feed.json".to_string(),
            minify: false,
            pretty: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    feed: Option<FeedConfig>,
}

impl FeedConfig {
    /// Parse the `[feed]` table of a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Self::parse_table(content)?.unwrap_or_default())
    }

    /// Load the `[feed]` table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("IO error when reading `{}`", path.display()))?;
        let config = Self::parse_table(&content)
            .with_context(|| format!("invalid feed config in `{}`", path.display()))?;
        let Some(config) = config else {
            log!("config"; "no [feed] table in `{}`, using defaults", path.display());
            return Ok(Self::default());
        };
        debug!("config"; "loaded {} (format: {})", path.display(), config.format);
        Ok(config)
    }

    /// `None` when the document has no `[feed]` table.
    fn parse_table(content: &str) -> Result<Option<Self>> {
        let file: ConfigFile = toml::from_str(content).context("Config file parsing error")?;
        if let Some(feed) = &file.feed {
            feed.validate()?;
        }
        Ok(file.feed)
    }

    fn validate(&self) -> Result<()> {
        if self.rss_path.trim().is_empty() {
            bail!("feed.rss_path must not be empty");
        }
        if self.json_path.trim().is_empty() {
            bail!("feed.json_path must not be empty");
        }
        Ok(())
    }

    /// `link` joined with a relative feed path.
    pub(crate) fn feed_url(link: &str, path: &str) -> String {
        format!(
            "{}/{}",
            link.trim().trim_end_matches('/'),
            path.trim().trim_start_matches('/')
        )
    }
}
