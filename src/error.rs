//! Feed rendering error types.

use thiserror::Error;

/// Errors raised while rendering a feed.
///
/// Validation runs before any output is built, so an error always means
/// nothing was produced.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("missing required field(s): {}", fields.join(", "))]
    MissingRequiredField { fields: Vec<String> },

    #[error("unsupported feed format `{0}` (expected rss, atom or json)")]
    UnsupportedFormat(String),

    #[error("JSON Feed serialization failed")]
    Json(#[from] serde_json::Error),
}

impl FeedError {
    /// Names of the missing fields, empty for other kinds.
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::MissingRequiredField { fields } => fields,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

// ============================================================================
// Required field collection
// ============================================================================

/// Collects the names of missing required fields before rendering starts.
#[derive(Debug, Default)]
pub struct Required {
    missing: Vec<String>,
}

impl Required {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as missing when `value` is absent or blank.
    pub fn text(&mut self, name: impl Into<String>, value: Option<&str>) -> &mut Self {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.missing.push(name.into());
        }
        self
    }

    /// Record `name` as missing when `present` is false.
    pub fn check(&mut self, name: impl Into<String>, present: bool) -> &mut Self {
        if !present {
            self.missing.push(name.into());
        }
        self
    }

    pub fn into_result(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(FeedError::MissingRequiredField {
                fields: self.missing,
            })
        }
    }
}
