// src/commands.rs

//! Slash command handlers.
//!
//! Each handler turns one inbound invocation into reply messages. Every
//! failure is converted to user-visible chat text at this boundary; nothing
//! below it crashes a command.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use crate::cache::{self, PostCache};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Block, PostRecord, Reply, SlashCommand};
use crate::query;
use crate::services::BlogApi;

/// Shared state behind the command handlers.
///
/// The cache sits behind a single mutex: envelopes are dispatched from a
/// multi-threaded runtime, and an append must not tear a concurrent read.
pub struct Handlers {
    config: Config,
    client: Arc<dyn BlogApi>,
    cache: Mutex<PostCache>,
    total_posts: AtomicU64,
}

impl Handlers {
    /// Wire up handlers over a populated cache.
    ///
    /// `total_posts` is the count the blog reported at startup; it is
    /// tracked separately from the cache length because posts with no
    /// displayable content are never cached.
    pub fn new(config: Config, client: Arc<dyn BlogApi>, cache: PostCache, total_posts: u64) -> Self {
        Self {
            config,
            client,
            cache: Mutex::new(cache),
            total_posts: AtomicU64::new(total_posts),
        }
    }

    /// Route one slash command to its handler.
    pub async fn dispatch(&self, command: &SlashCommand) -> Vec<Reply> {
        log::info!(
            "handling {} from user {}",
            command.command,
            command.user_id
        );
        match command.command.as_str() {
            "/bnotw-add" => vec![self.add(&command.text, &command.user_id).await],
            "/bnotw-get" => vec![self.get().await],
            "/bnotw-search" => self.search(&command.text).await,
            other => vec![Reply::text(format!("unknown command: {other}"))],
        }
    }

    /// `/bnotw-add`: publish a new bnotw and append it to the cache.
    pub async fn add(&self, text: &str, user_id: &str) -> Reply {
        match self.try_add(text, user_id).await {
            Ok(reply) => reply,
            Err(AppError::Validation(hint)) => Reply::text(hint),
            Err(err) => Reply::text(format!("error posting bnotw: {err}")),
        }
    }

    async fn try_add(&self, text: &str, user_id: &str) -> Result<Reply> {
        let title = text.trim();
        if title.is_empty() {
            return Err(AppError::validation(
                "please provide a bnotw (`/bnotw-add new_bnotw`)",
            ));
        }

        let id = self.client.create_post(title).await?;

        // One fetch-after-create covers summary, id, and date together.
        let raw = self.client.post_by_id(id).await?;
        let record = cache::record_from_raw(&raw).unwrap_or_else(|| PostRecord {
            // Tumblr stores the submitted text as the post title.
            summary: title.to_string(),
            id,
            published_at: raw.date.clone(),
        });

        let url = self.config.post_url(record.id);
        let line = format!("<@{user_id}> added '<{url}|{}>'", record.summary);

        self.cache.lock().await.append(record);
        self.total_posts.fetch_add(1, Ordering::Relaxed);

        Ok(Reply::blocks(line.clone(), vec![Block::section(line)]))
    }

    /// `/bnotw-get`: a uniformly random bnotw from the cache.
    pub async fn get(&self) -> Reply {
        let cache = self.cache.lock().await;
        let mut rng = rand::thread_rng();
        match query::random_post(&cache, &mut rng) {
            Ok(record) => self.post_reply(record),
            Err(err) => Reply::text(format!("error fetching posts: {err}")),
        }
    }

    /// `/bnotw-search`: every cached bnotw matching the query, one message
    /// per match, in cache order.
    pub async fn search(&self, query_text: &str) -> Vec<Reply> {
        let cache = self.cache.lock().await;
        match query::search(&cache, query_text.trim()) {
            Ok(matches) if matches.is_empty() => vec![Reply::text("no matching bnotws")],
            Ok(matches) => matches
                .into_iter()
                .map(|record| self.post_reply(record))
                .collect(),
            Err(err @ AppError::QueryTooShort { .. }) => vec![Reply::text(err.to_string())],
            Err(err) => vec![Reply::text(format!("error fetching posts: {err}"))],
        }
    }

    /// Static usage text, sent when the bot is mentioned.
    pub fn help(&self) -> Reply {
        Reply::text(
            "hot damn!\n\
             `/bnotw-add [your text]` to add a new bnotw. make it count!\n\
             `/bnotw-get` to get a random bnotw.\n\
             `/bnotw-search [your query]` to search bnotws.",
        )
    }

    /// Total posts the blog holds, as tracked since startup.
    pub fn total_posts(&self) -> u64 {
        self.total_posts.load(Ordering::Relaxed)
    }

    // Section with the summary, context footer with permalink and date.
    fn post_reply(&self, record: &PostRecord) -> Reply {
        let line = format!("bnotw: {}", record.summary);
        let footer = format!(
            "<{}|view on {}> • {}",
            self.config.post_url(record.id),
            self.config.blog_host(),
            record.published_at
        );
        Reply::blocks(
            line.clone(),
            vec![Block::section(line), Block::context(footer)],
        )
    }
}
