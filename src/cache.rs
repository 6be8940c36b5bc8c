// src/cache.rs

//! In-memory post cache.
//!
//! An ordered, append-only collection of lightweight post records, built
//! once at startup by paging through the whole blog and appended to when a
//! post is created. Never re-synced: posts deleted remotely stay visible
//! until the process restarts, and the cache is rebuilt from scratch on
//! every start.

use crate::error::Result;
use crate::models::{PostRecord, RawPost};
use crate::normalize;
use crate::services::BlogApi;

/// Process-wide post cache. Insertion order is remote pagination order,
/// then append order for new posts.
#[derive(Debug, Default)]
pub struct PostCache {
    records: Vec<PostRecord>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the cache by exhaustively paging the blog.
    ///
    /// Returns the cache and the total post count the blog reported, so the
    /// caller can seed its counter without a second metadata fetch. Runs
    /// once, before any command is served; failure here is fatal to the
    /// process.
    pub async fn build(client: &dyn BlogApi, page_size: u64) -> Result<(Self, u64)> {
        let total = client.total_posts().await?;
        let num_pages = total.div_ceil(page_size);

        let mut cache = Self::new();
        for page in 0..num_pages {
            let offset = page * page_size;
            let raw_posts = client.posts(page_size, offset).await?;
            for raw in &raw_posts {
                match record_from_raw(raw) {
                    Some(record) => cache.append(record),
                    None => log::debug!("skipping post {} with no displayable content", raw.id),
                }
            }
        }

        Ok((cache, total))
    }

    /// Add a record to the end of the cache.
    pub fn append(&mut self, record: PostRecord) {
        self.records.push(record);
    }

    /// Current count of cached records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read view over the cached records, in insertion order.
    pub fn records(&self) -> &[PostRecord] {
        &self.records
    }
}

/// Convert a raw post into a cache record.
///
/// `None` when the post has no displayable content; such posts are never
/// cached.
pub fn record_from_raw(raw: &RawPost) -> Option<PostRecord> {
    let summary = normalize::display_text(raw)?;
    Some(PostRecord {
        summary,
        id: raw.id,
        published_at: raw.date.clone(),
    })
}
