//! Post data structures.

use serde::Deserialize;

/// One post as returned by the Tumblr API.
///
/// Which of `summary`/`title`/`body` is populated depends on the remote
/// deployment; the fields are passed through untouched and interpreted by
/// the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    /// Post identifier assigned by Tumblr
    pub id: u64,

    /// Publication date, formatted by Tumblr (display-only)
    #[serde(default)]
    pub date: String,

    /// Pre-normalized display text, when the deployment provides it
    #[serde(default)]
    pub summary: Option<String>,

    /// Raw post title
    #[serde(default)]
    pub title: Option<String>,

    /// Raw post body
    #[serde(default)]
    pub body: Option<String>,
}

/// A post as cached in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// Display string
    pub summary: String,

    /// Post identifier, unique per post (assumed, not enforced)
    pub id: u64,

    /// Publication date string, opaque and display-only
    pub published_at: String,
}
