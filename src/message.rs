//! Raw Discord message records.
//!
//! These mirror the subset of the Discord REST message object that the
//! rendering core consumes. The HTTP layer deserializes API responses
//! straight into these types; everything here is plain data.

use serde::{Deserialize, Serialize};

/// A message author or mentioned user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// Avatar image hash; `a_`-prefixed hashes are animated
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// A guild role, as far as mention resolution cares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: String,
    pub name: String,
}

/// A guild channel or DM channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: String,
    /// Raw channel type code (0 = text, 1 = DM, 2 = voice, 3 = group DM,
    /// 11/12 = thread, 15 = forum, ...)
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub name: Option<String>,
    /// DM / group DM participants
    #[serde(default)]
    pub recipients: Vec<UserRecord>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Guild metadata used to build mention lookup tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    #[serde(default)]
    pub channels: Vec<ChannelRecord>,
}

/// A rich-content block attached to a message. Each text field is
/// independently run through the content transformer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedRecord {
    /// Embed type tag; only "rich" embeds are rendered
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Accent color as a packed 0xRRGGBB integer
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub fields: Vec<EmbedFieldRecord>,
    #[serde(default)]
    pub footer: Option<EmbedFooterRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedFieldRecord {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedFooterRecord {
    pub text: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// A file attached to a message. Only presence matters to this core (the
/// reply preview shows an attachment marker); the rendering layer does the
/// rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub id: String,
    pub filename: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub url: String,
    #[serde(default)]
    pub size: u64,
}

/// Voice call data carried by call system messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(default)]
    pub participants: Vec<String>,
    /// Present once the call has ended
    #[serde(default)]
    pub ended_timestamp: Option<String>,
}

/// Premium role subscription data carried by purchase system messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleSubscriptionRecord {
    pub tier_name: String,
    #[serde(default)]
    pub total_months_subscribed: u32,
    #[serde(default)]
    pub is_renewal: bool,
}

/// A thread hanging off a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One message as returned by the channel history endpoint.
///
/// The type code is kept as a raw `u8` rather than an enum so that codes
/// Discord adds later survive deserialization and reach the classifier,
/// which reports them as unknown instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    /// Raw message type code; see [`crate::system::MessageKind`]
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub author: Option<UserRecord>,
    #[serde(default)]
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub edited_timestamp: Option<String>,
    #[serde(default)]
    pub mentions: Vec<UserRecord>,
    /// Role ids mentioned in the content; resolved against guild roles
    #[serde(default)]
    pub mention_roles: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
    #[serde(default)]
    pub embeds: Vec<EmbedRecord>,
    /// The message this one replies to, if any
    #[serde(default)]
    pub referenced_message: Option<Box<MessageRecord>>,
    #[serde(default)]
    pub thread: Option<ThreadRecord>,
    #[serde(default)]
    pub call: Option<CallRecord>,
    #[serde(default)]
    pub role_subscription_data: Option<RoleSubscriptionRecord>,
}

impl MessageRecord {
    /// Author username, or a placeholder for authorless records.
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.username.as_str())
            .unwrap_or("Unknown User")
    }

    /// Whether the message was edited after posting.
    pub fn edited(&self) -> bool {
        self.edited_timestamp.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_message() {
        let json = r#"{
            "id": "1001",
            "type": 0,
            "author": { "id": "42", "username": "alice" },
            "content": "hello",
            "timestamp": "2024-03-01T12:00:00.000000+00:00"
        }"#;

        let message: MessageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, "1001");
        assert_eq!(message.kind, 0);
        assert_eq!(message.author_name(), "alice");
        assert!(!message.edited());
        assert!(message.mentions.is_empty());
        assert!(message.embeds.is_empty());
    }

    #[test]
    fn test_deserialize_unknown_type_code_survives() {
        let json = r#"{
            "id": "1002",
            "type": 250,
            "timestamp": "2024-03-01T12:00:00.000000+00:00"
        }"#;

        let message: MessageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(message.kind, 250);
        assert_eq!(message.author_name(), "Unknown User");
    }

    #[test]
    fn test_deserialize_reply_and_embed() {
        let json = r#"{
            "id": "1003",
            "type": 19,
            "author": { "id": "42", "username": "alice" },
            "content": "replying",
            "timestamp": "2024-03-01T12:00:00.000000+00:00",
            "edited_timestamp": "2024-03-01T12:05:00.000000+00:00",
            "referenced_message": {
                "id": "1000",
                "type": 0,
                "author": { "id": "7", "username": "bob", "bot": true },
                "content": "original",
                "timestamp": "2024-03-01T11:00:00.000000+00:00"
            },
            "embeds": [{
                "type": "rich",
                "description": "embedded text",
                "color": 5793266,
                "fields": [{ "name": "k", "value": "v", "inline": true }]
            }]
        }"#;

        let message: MessageRecord = serde_json::from_str(json).unwrap();
        assert!(message.edited());
        let reply = message.referenced_message.as_ref().unwrap();
        assert_eq!(reply.author_name(), "bob");
        assert_eq!(message.embeds[0].fields.len(), 1);
        assert_eq!(message.embeds[0].color, Some(5793266));
    }
}
