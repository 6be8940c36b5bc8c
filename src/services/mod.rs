//! Service layer for the bot.
//!
//! This module contains the outward-facing plumbing:
//! - Tumblr REST client (`TumblrClient`, behind the `BlogApi` trait)
//! - OAuth 1.0a request signing (`OauthSigner`)
//! - Slack Socket Mode gateway (`SlackGateway`)

mod oauth;
mod slack;
mod tumblr;

pub use oauth::OauthSigner;
pub use slack::SlackGateway;
pub use tumblr::{BlogApi, TumblrClient};
