// src/services/slack.rs

//! Slack Socket Mode gateway.
//!
//! Opens a WebSocket via `apps.connections.open`, acknowledges every
//! envelope, and routes slash commands and app mentions to the command
//! handlers. Slash command replies go out through the command's
//! `response_url`; mention replies through `chat.postMessage`. Slack
//! recycles socket connections periodically, so the run loop reconnects
//! after every disconnect.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::commands::Handlers;
use crate::config::{Config, Credentials};
use crate::error::{AppError, Result};
use crate::models::{Reply, SlashCommand};

/// One Socket Mode envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    envelope_id: String,
    #[serde(rename = "type")]
    envelope_type: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Acknowledgment for an envelope, sent back over the socket.
#[derive(Debug, Serialize)]
struct Ack {
    envelope_id: String,
}

/// Gateway between Slack and the command handlers.
pub struct SlackGateway {
    client: reqwest::Client,
    bot_token: String,
    app_token: String,
    api_base: String,
    reconnect_delay: Duration,
}

impl SlackGateway {
    pub fn new(config: &Config, credentials: &Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            bot_token: credentials.slack_bot_token.clone(),
            app_token: credentials.slack_app_token.clone(),
            api_base: config.slack_api_base.trim_end_matches('/').to_string(),
            reconnect_delay: Duration::from_secs(5),
        })
    }

    /// Verify the bot token before serving anything.
    pub async fn test_auth(&self) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/auth.test", self.api_base))
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(|e| AppError::slack(e.to_string()))?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::slack(e.to_string()))?;

        if json["ok"].as_bool() != Some(true) {
            let error = json["error"].as_str().unwrap_or("unknown");
            return Err(AppError::slack(format!("auth.test failed: {error}")));
        }
        if let Some(user_id) = json["user_id"].as_str() {
            log::info!("authenticated as bot user {user_id}");
        }
        Ok(())
    }

    /// Serve commands until the process is stopped.
    pub async fn run(&self, handlers: &Handlers) -> Result<()> {
        loop {
            match self.connect_and_serve(handlers).await {
                Ok(()) => log::info!("socket closed by Slack, reconnecting"),
                Err(err) => {
                    log::error!("socket mode connection failed: {err}");
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }

    async fn connect_and_serve(&self, handlers: &Handlers) -> Result<()> {
        let ws_url = self.connection_url().await?;
        log::info!("connecting to Slack socket mode");

        let (ws_stream, _) = connect_async(ws_url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        while let Some(message) = read.next().await {
            match message? {
                WsMessage::Text(text) => {
                    let envelope: Envelope = match serde_json::from_str(&text) {
                        Ok(envelope) => envelope,
                        Err(err) => {
                            log::warn!("unparseable envelope: {err}");
                            continue;
                        }
                    };

                    // Ack first; Slack redelivers unacked envelopes.
                    let ack = serde_json::to_string(&Ack {
                        envelope_id: envelope.envelope_id.clone(),
                    })?;
                    write.send(WsMessage::Text(ack)).await?;

                    self.dispatch_envelope(envelope, handlers).await;
                }
                WsMessage::Ping(data) => write.send(WsMessage::Pong(data)).await?,
                WsMessage::Close(_) => return Ok(()),
                _ => {}
            }
        }
        Ok(())
    }

    /// Ask Slack for a fresh WebSocket URL.
    async fn connection_url(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/apps.connections.open", self.api_base))
            .bearer_auth(&self.app_token)
            .send()
            .await
            .map_err(|e| AppError::slack(e.to_string()))?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::slack(e.to_string()))?;

        if json["ok"].as_bool() != Some(true) {
            let error = json["error"].as_str().unwrap_or("unknown");
            return Err(AppError::slack(format!(
                "apps.connections.open failed: {error}"
            )));
        }
        json["url"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::slack("missing url in apps.connections.open response"))
    }

    async fn dispatch_envelope(&self, envelope: Envelope, handlers: &Handlers) {
        match envelope.envelope_type.as_str() {
            "slash_commands" => {
                let Some(payload) = envelope.payload else {
                    log::warn!("slash command envelope without payload");
                    return;
                };
                let command: SlashCommand = match serde_json::from_value(payload) {
                    Ok(command) => command,
                    Err(err) => {
                        log::warn!("unparseable slash command payload: {err}");
                        return;
                    }
                };

                for reply in handlers.dispatch(&command).await {
                    if let Err(err) = self.respond(&command.response_url, &reply).await {
                        log::error!("failed to deliver reply: {err}");
                    }
                }
            }
            "events_api" => {
                if let Some(payload) = envelope.payload {
                    self.handle_event(&payload, handlers).await;
                }
            }
            "hello" => log::info!("socket mode connection established"),
            "disconnect" => log::info!("Slack requested a reconnect"),
            other => log::debug!("ignoring envelope type {other}"),
        }
    }

    /// App mentions get the static help text.
    async fn handle_event(&self, payload: &serde_json::Value, handlers: &Handlers) {
        let event = &payload["event"];
        if event["type"].as_str() != Some("app_mention") {
            return;
        }
        let Some(channel) = event["channel"].as_str() else {
            log::warn!("app_mention without channel");
            return;
        };

        if let Err(err) = self.post_message(channel, &handlers.help()).await {
            log::error!("failed to post help message: {err}");
        }
    }

    /// Deliver a slash command reply through its response URL.
    async fn respond(&self, response_url: &str, reply: &Reply) -> Result<()> {
        let response = self
            .client
            .post(response_url)
            .json(reply)
            .send()
            .await
            .map_err(|e| AppError::slack(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::slack(format!(
                "response_url returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// Post a message to a channel via chat.postMessage.
    async fn post_message(&self, channel: &str, reply: &Reply) -> Result<()> {
        let mut payload = serde_json::json!({ "channel": channel });
        if let Some(text) = &reply.text {
            payload["text"] = serde_json::json!(text);
        }
        if let Some(blocks) = &reply.blocks {
            payload["blocks"] = serde_json::json!(blocks);
        }

        let response = self
            .client
            .post(format!("{}/chat.postMessage", self.api_base))
            .bearer_auth(&self.bot_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::slack(e.to_string()))?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::slack(e.to_string()))?;

        if json["ok"].as_bool() != Some(true) {
            let error = json["error"].as_str().unwrap_or("unknown");
            return Err(AppError::slack(format!("chat.postMessage failed: {error}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_parses_slash_command_shape() {
        let text = r#"{
            "envelope_id": "abc-123",
            "type": "slash_commands",
            "payload": {
                "command": "/bnotw-add",
                "text": "a new one",
                "user_id": "U1",
                "response_url": "https://hooks.slack.com/commands/T/1/x"
            }
        }"#;
        let envelope: Envelope = serde_json::from_str(text).unwrap();
        assert_eq!(envelope.envelope_type, "slash_commands");

        let command: SlashCommand = serde_json::from_value(envelope.payload.unwrap()).unwrap();
        assert_eq!(command.command, "/bnotw-add");
        assert_eq!(command.text, "a new one");
    }

    #[test]
    fn envelope_parses_without_payload() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"envelope_id": "x", "type": "hello"}"#).unwrap();
        assert_eq!(envelope.envelope_type, "hello");
        assert!(envelope.payload.is_none());
    }

    #[test]
    fn ack_serializes_envelope_id() {
        let ack = Ack {
            envelope_id: "abc".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&ack).unwrap(),
            r#"{"envelope_id":"abc"}"#
        );
    }
}
