//! Inbound slash command payload.

use serde::Deserialize;

/// The fields of a Socket Mode slash command the bot cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
    /// The command itself, e.g. `/bnotw-add`
    pub command: String,

    /// Free text after the command
    #[serde(default)]
    pub text: String,

    /// User who invoked the command
    pub user_id: String,

    /// Channel the command was invoked in
    #[serde(default)]
    pub channel_id: String,

    /// URL for delayed responses
    #[serde(default)]
    pub response_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_payload() {
        let cmd: SlashCommand = serde_json::from_str(
            r#"{"command": "/bnotw-get", "user_id": "U123", "extra": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(cmd.command, "/bnotw-get");
        assert_eq!(cmd.text, "");
        assert_eq!(cmd.user_id, "U123");
        assert_eq!(cmd.response_url, "");
    }
}
