//! Mention resolution tables.
//!
//! Built fresh for each render pass from the message batch and guild
//! metadata, then treated as read-only by every transform call. Lifetime is
//! one pass; nothing here persists.

use std::collections::HashMap;

use crate::message::{ChannelRecord, GuildRecord, MessageRecord};

/// Display category of a mentioned channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Voice,
    Forum,
    Thread,
    /// Announcement channels, categories and anything newer all render with
    /// the plain channel marker
    Generic,
}

impl ChannelKind {
    /// Map a raw Discord channel type code to a display kind.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ChannelKind::Text,
            2 => ChannelKind::Voice,
            11 | 12 => ChannelKind::Thread,
            15 => ChannelKind::Forum,
            _ => ChannelKind::Generic,
        }
    }

    /// The `type` attribute a channel mention element carries.
    pub fn mention_type(self) -> &'static str {
        match self {
            ChannelKind::Text | ChannelKind::Generic => "channel",
            ChannelKind::Voice => "voice",
            ChannelKind::Forum => "forum",
            ChannelKind::Thread => "thread",
        }
    }
}

/// What a channel mention resolves to.
#[derive(Debug, Clone)]
pub struct ChannelLabel {
    pub name: String,
    pub kind: ChannelKind,
}

impl ChannelLabel {
    fn of(channel: &ChannelRecord) -> Self {
        Self {
            // Channels without a name (DMs) fall back to their id
            name: channel
                .name
                .clone()
                .unwrap_or_else(|| channel.id.clone()),
            kind: ChannelKind::from_code(channel.kind),
        }
    }
}

/// The three lookup tables a transform call resolves mention tokens against,
/// keyed by snowflake string.
#[derive(Debug, Clone, Default)]
pub struct MentionContext {
    /// user id -> display name
    pub users: HashMap<String, String>,
    /// role id -> role name
    pub roles: HashMap<String, String>,
    /// channel id -> name and kind
    pub channels: HashMap<String, ChannelLabel>,
}

/// Batch-wide tables built once per render pass. Per-message contexts are
/// derived from these.
#[derive(Debug, Clone, Default)]
pub struct BatchTables {
    /// Every author and mentioned user seen in the batch
    pub users: HashMap<String, String>,
    pub roles: HashMap<String, String>,
    pub channels: HashMap<String, ChannelLabel>,
}

impl BatchTables {
    pub fn build(messages: &[MessageRecord], guild: &GuildRecord) -> Self {
        let mut users = HashMap::new();
        for message in messages {
            if let Some(author) = &message.author {
                users.insert(author.id.clone(), author.username.clone());
            }
            for user in &message.mentions {
                users.insert(user.id.clone(), user.username.clone());
            }
        }

        let roles = guild
            .roles
            .iter()
            .map(|role| (role.id.clone(), role.name.clone()))
            .collect();

        let channels = guild
            .channels
            .iter()
            .map(|channel| (channel.id.clone(), ChannelLabel::of(channel)))
            .collect();

        Self { users, roles, channels }
    }

    /// Context for transforming a message's own content: its mentioned users,
    /// its mentioned roles resolved against the guild, and every guild
    /// channel (channel mentions are not listed per message).
    pub fn message_context(&self, message: &MessageRecord) -> MentionContext {
        let users = message
            .mentions
            .iter()
            .map(|user| (user.id.clone(), user.username.clone()))
            .collect();

        MentionContext {
            users,
            roles: self.roles_for(&message.mention_roles),
            channels: self.channels.clone(),
        }
    }

    /// Context for a reply preview: the replied-to message's author plus its
    /// own mention lists.
    pub fn reply_context(&self, reply: &MessageRecord) -> MentionContext {
        let mut users: HashMap<String, String> = reply
            .mentions
            .iter()
            .map(|user| (user.id.clone(), user.username.clone()))
            .collect();
        if let Some(author) = &reply.author {
            users.insert(author.id.clone(), author.username.clone());
        }

        MentionContext {
            users,
            roles: self.roles_for(&reply.mention_roles),
            channels: self.channels.clone(),
        }
    }

    fn roles_for(&self, role_ids: &[String]) -> HashMap<String, String> {
        role_ids
            .iter()
            .filter_map(|id| {
                self.roles
                    .get(id)
                    .map(|name| (id.clone(), name.clone()))
            })
            .collect()
    }
}
