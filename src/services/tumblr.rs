// src/services/tumblr.rs

//! Tumblr REST client.
//!
//! Wraps the handful of v2 API calls the bot needs. Pure request/response;
//! all state lives in the post cache.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::{Config, Credentials};
use crate::error::{AppError, Result};
use crate::models::RawPost;
use crate::services::OauthSigner;

/// Remote blog operations the cache and command handlers depend on.
#[async_trait]
pub trait BlogApi: Send + Sync {
    /// Total number of posts on the blog.
    async fn total_posts(&self) -> Result<u64>;

    /// One page of posts at the given offset.
    async fn posts(&self, limit: u64, offset: u64) -> Result<Vec<RawPost>>;

    /// Publish a new text post; returns the assigned post id.
    async fn create_post(&self, title: &str) -> Result<u64>;

    /// Fetch exactly one post by id.
    async fn post_by_id(&self, id: u64) -> Result<RawPost>;
}

// Tumblr wraps every payload in a meta/response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Meta {
    msg: String,
}

#[derive(Debug, Deserialize)]
struct BlogInfoResponse {
    blog: BlogInfo,
}

#[derive(Debug, Deserialize)]
struct BlogInfo {
    total_posts: u64,
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    posts: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: u64,
}

/// HTTP client for one Tumblr blog.
pub struct TumblrClient {
    client: Client,
    signer: OauthSigner,
    api_base: String,
    blog_name: String,
}

impl TumblrClient {
    /// Create a configured client for the blog named in `config`.
    pub fn new(config: &Config, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            signer: OauthSigner::new(credentials),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            blog_name: config.blog_name.clone(),
        })
    }

    fn blog_url(&self, endpoint: &str) -> String {
        format!(
            "{}/v2/blog/{}.tumblr.com/{}",
            self.api_base, self.blog_name, endpoint
        )
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T> {
        let auth = self.signer.authorization("GET", url, params);
        let response = self
            .client
            .get(url)
            .query(params)
            .header(AUTHORIZATION, auth)
            .send()
            .await?;
        decode(response).await
    }
}

/// Unwrap the Tumblr envelope, classifying failures.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_server_error() {
        return Err(AppError::remote_unavailable(format!("{status}: {}", api_message(&body))));
    }
    if !status.is_success() {
        return Err(AppError::remote_rejected(status.as_u16(), api_message(&body)));
    }

    let envelope: Envelope<T> = serde_json::from_str(&body)
        .map_err(|e| AppError::remote_unavailable(format!("malformed response: {e}")))?;
    envelope
        .response
        .ok_or_else(|| AppError::remote_unavailable("empty response payload"))
}

// Prefer the envelope's meta.msg; fall back to a truncated raw body.
fn api_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.meta.msg;
    }
    body.chars().take(200).collect()
}

#[async_trait]
impl BlogApi for TumblrClient {
    async fn total_posts(&self) -> Result<u64> {
        let info: BlogInfoResponse = self.get(&self.blog_url("info"), &[]).await?;
        Ok(info.blog.total_posts)
    }

    async fn posts(&self, limit: u64, offset: u64) -> Result<Vec<RawPost>> {
        let params = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let page: PostsResponse = self.get(&self.blog_url("posts"), &params).await?;
        Ok(page.posts)
    }

    async fn create_post(&self, title: &str) -> Result<u64> {
        let url = self.blog_url("post");
        let params = [
            ("type", "text".to_string()),
            ("state", "published".to_string()),
            ("title", title.to_string()),
        ];
        let auth = self.signer.authorization("POST", &url, &params);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth)
            .form(&params)
            .send()
            .await?;
        let created: CreateResponse = decode(response).await?;
        Ok(created.id)
    }

    async fn post_by_id(&self, id: u64) -> Result<RawPost> {
        let params = [("id", id.to_string())];
        let page: PostsResponse = self.get(&self.blog_url("posts"), &params).await?;
        page.posts
            .into_iter()
            .next()
            .ok_or_else(|| AppError::remote_unavailable(format!("post {id} not found")))
    }
}
