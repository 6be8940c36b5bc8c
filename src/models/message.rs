//! Slack Block Kit reply shapes.
//!
//! Only the two block types the bot emits: a body section and a small
//! context footer (permalink + timestamp).

use serde::{Deserialize, Serialize};

/// A Block Kit block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Section block (main content).
    Section { text: TextObject },
    /// Context block (small styled text).
    Context { elements: Vec<ContextElement> },
}

impl Block {
    /// Create a section block with mrkdwn text.
    pub fn section(text: impl Into<String>) -> Self {
        Self::Section {
            text: TextObject::mrkdwn(text),
        }
    }

    /// Create a context block with one mrkdwn element.
    pub fn context(text: impl Into<String>) -> Self {
        Self::Context {
            elements: vec![ContextElement::Mrkdwn { text: text.into() }],
        }
    }
}

/// Slack text object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub text_type: String,
    pub text: String,
}

impl TextObject {
    /// Create a mrkdwn text object.
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            text_type: "mrkdwn".to_string(),
            text: text.into(),
        }
    }
}

/// Context block element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextElement {
    Mrkdwn { text: String },
}

/// One reply message, delivered by the Slack layer.
///
/// `text` doubles as the notification fallback when blocks are present.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Reply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
}

impl Reply {
    /// Plain text reply, visible to the whole channel.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response_type: Some("in_channel".to_string()),
            text: Some(text.into()),
            blocks: None,
        }
    }

    /// Block reply with a notification fallback, visible to the whole channel.
    pub fn blocks(fallback: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            response_type: Some("in_channel".to_string()),
            text: Some(fallback.into()),
            blocks: Some(blocks),
        }
    }
}
