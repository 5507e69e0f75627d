//! Feed rendering (RSS, Atom, JSON Feed).
//!
//! Renders a [`FeedModel`] into one of three syndication formats:
//!
//! - **RSS 2.0**: [`rss`]
//! - **Atom 1.0**: [`atom`]
//! - **JSON Feed 1.1**: [`json`]
//!
//! The renderers are independent of each other; [`Feeds`] only picks one.

use crate::{
    config::FeedConfig,
    error::{FeedError, Result},
    model::FeedModel,
    utils::date::DateTimeUtc,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub mod atom;
pub mod json;
pub mod rss;

use atom::{AtomFeed, AtomRenderer};
use json::{JsonFeed, JsonFeedRenderer};
use rss::{RssChannel, RssRenderer};

/// Feed output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// RSS 2.0 format (default).
    #[default]
    Rss,
    /// Atom 1.0 format.
    Atom,
    /// JSON Feed 1.1 format.
    Json,
}

impl FeedFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rss => "rss",
            Self::Atom => "atom",
            Self::Json => "json",
        }
    }

    /// Conventional MIME type of the rendered document.
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Rss => "application/rss+xml",
            Self::Atom => "application/atom+xml",
            Self::Json => "application/feed+json",
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFormat {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rss" => Ok(Self::Rss),
            "atom" => Ok(Self::Atom),
            "json" => Ok(Self::Json),
            _ => Err(FeedError::UnsupportedFormat(s.to_string())),
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Render `model` as `format` (`rss`, `atom` or `json`) with default settings.
pub fn render(format: &str, model: &FeedModel) -> Result<String> {
    Feeds::default().render(format.parse()?, model)
}

/// Picks a renderer by format and runs it with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Feeds {
    config: FeedConfig,
}

impl Feeds {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Render in the configured default format.
    pub fn render_default(&self, model: &FeedModel) -> Result<String> {
        self.render(self.config.format, model)
    }

    pub fn render(&self, format: FeedFormat, model: &FeedModel) -> Result<String> {
        self.render_at(format, model, DateTimeUtc::now())
    }

    /// Render with `now` standing in for the current time.
    pub fn render_at(
        &self,
        format: FeedFormat,
        model: &FeedModel,
        now: DateTimeUtc,
    ) -> Result<String> {
        let config = &self.config;
        match format {
            FeedFormat::Rss => {
                RssRenderer::new(config).render_at(&RssChannel::from_model(model, config), now)
            }
            FeedFormat::Atom => {
                AtomRenderer::new(config).render_at(&AtomFeed::from_model(model, config), now)
            }
            FeedFormat::Json => {
                JsonFeedRenderer::new(config).render(&JsonFeed::from_model(model, config))
            }
        }
    }
}
