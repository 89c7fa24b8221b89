//! Batch rendering orchestration.
//!
//! Turns raw message records into per-message view models: classify each
//! record first, then either render the system narrative (itself passed back
//! through the content transformer), a placeholder for codes this viewer
//! cannot show, or the normal author/content/reply/embed view.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cdn;
use crate::context::BatchTables;
use crate::display;
use crate::markup::transform;
use crate::message::{GuildRecord, MessageRecord, UserRecord};
use crate::system::{classify, Classification, SystemNotice};

/// Placeholder body for recognized-but-unrendered type codes.
pub const UNSUPPORTED_TEXT: &str = "Message type not yet supported.";
/// Placeholder body for type codes outside the known set.
pub const UNKNOWN_TEXT: &str = "Unknown message type.";

/// Presentation options owned by the embedding layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub light_theme: bool,
    /// 24-hour clock for message timestamps
    pub twenty_four: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { light_theme: false, twenty_four: true }
    }
}

impl RenderOptions {
    /// Author name color; the viewer does not track per-role colors.
    pub fn role_color(&self) -> &'static str {
        if self.light_theme { "#000000" } else { "#ffffff" }
    }
}

/// One rendered message.
#[derive(Debug, Clone)]
pub enum MessageView {
    Normal(Box<NormalView>),
    /// System narrative, already transformed into markup
    System(SystemNotice),
    /// Fixed placeholder text plus the offending code for diagnostics
    Placeholder { text: &'static str, code: u8 },
}

/// An authored message ready for the chat skin.
#[derive(Debug, Clone)]
pub struct NormalView {
    pub author: String,
    pub avatar_url: Option<String>,
    pub bot: bool,
    pub edited: bool,
    /// Mentions the logged-in user, or pings everyone
    pub highlight: bool,
    pub timestamp: String,
    /// Transformed content markup
    pub content: String,
    pub reply: Option<ReplyView>,
    pub embeds: Vec<EmbedView>,
    pub thread_name: Option<String>,
    /// Author name color for the active theme
    pub role_color: &'static str,
}

/// Truncated preview of the message a reply points at.
#[derive(Debug, Clone)]
pub struct ReplyView {
    pub author: String,
    pub avatar_url: Option<String>,
    pub bot: bool,
    pub edited: bool,
    pub has_attachment: bool,
    /// The reply pings the author of the replied-to message
    pub mentions_author: bool,
    /// First line of the referenced content, transformed
    pub content: String,
}

/// A rich embed with its text fields transformed.
#[derive(Debug, Clone)]
pub struct EmbedView {
    pub color: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<EmbedFieldView>,
    pub footer_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmbedFieldView {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

fn avatar_of(user: &UserRecord) -> Option<String> {
    user.avatar.as_deref().map(|hash| cdn::avatar_url(&user.id, hash))
}

/// Whether the message should be highlighted for the logged-in user: an
/// `@everyone`/`@here` token anywhere, or a direct mention.
pub fn is_highlighted(message: &MessageRecord, logged_in: Option<&str>) -> bool {
    if message.content.contains("@everyone") || message.content.contains("@here") {
        return true;
    }
    match logged_in {
        Some(id) => message.mentions.iter().any(|user| user.id == id),
        None => false,
    }
}

/// Render a whole history batch. One independent pass per message; the
/// lookup tables are built once up front.
pub fn render_messages(
    messages: &[MessageRecord],
    guild: &GuildRecord,
    logged_in: Option<&str>,
    options: &RenderOptions,
) -> Vec<MessageView> {
    let tables = BatchTables::build(messages, guild);
    messages
        .iter()
        .map(|message| render_message(message, guild, &tables, logged_in, options))
        .collect()
}

fn render_message(
    message: &MessageRecord,
    guild: &GuildRecord,
    tables: &BatchTables,
    logged_in: Option<&str>,
    options: &RenderOptions,
) -> MessageView {
    match classify(message, guild.name.as_deref()) {
        Classification::Rendered(notice) => {
            // Narratives carry markup of their own (italics, bold); run them
            // through the transformer like any other content
            let narrative = transform(&notice.narrative, &Default::default(), false, false);
            MessageView::System(SystemNotice { narrative, ..notice })
        }
        Classification::Unsupported(code) => {
            debug!(code, "rendering unsupported-type placeholder");
            MessageView::Placeholder { text: UNSUPPORTED_TEXT, code }
        }
        Classification::Unknown(code) => {
            debug!(code, "rendering unknown-type placeholder");
            MessageView::Placeholder { text: UNKNOWN_TEXT, code }
        }
        Classification::Suppressed => MessageView::Normal(Box::new(render_normal(
            message, tables, logged_in, options,
        ))),
    }
}

fn render_normal(
    message: &MessageRecord,
    tables: &BatchTables,
    logged_in: Option<&str>,
    options: &RenderOptions,
) -> NormalView {
    let context = tables.message_context(message);

    let reply = message.referenced_message.as_deref().map(|referenced| {
        let reply_context = tables.reply_context(referenced);
        ReplyView {
            author: referenced.author_name().to_string(),
            avatar_url: referenced.author.as_ref().and_then(avatar_of),
            bot: referenced.author.as_ref().is_some_and(|a| a.bot),
            edited: referenced.edited(),
            has_attachment: !referenced.attachments.is_empty(),
            mentions_author: message.author.as_ref().is_some_and(|author| {
                referenced.mentions.iter().any(|user| user.id == author.id)
            }),
            content: transform(&referenced.content, &reply_context, false, true),
        }
    });

    let embeds = message
        .embeds
        .iter()
        .filter(|embed| embed.kind.as_deref() == Some("rich"))
        .map(|embed| EmbedView {
            color: embed.color.map(display::embed_color_hex),
            title: embed.title.clone(),
            description: embed
                .description
                .as_deref()
                .map(|text| transform(text, &context, true, false)),
            fields: embed
                .fields
                .iter()
                .map(|field| EmbedFieldView {
                    name: field.name.clone(),
                    value: transform(&field.value, &context, true, false),
                    inline: field.inline,
                })
                .collect(),
            footer_text: embed.footer.as_ref().map(|footer| footer.text.clone()),
        })
        .collect();

    NormalView {
        author: message.author_name().to_string(),
        avatar_url: message.author.as_ref().and_then(avatar_of),
        bot: message.author.as_ref().is_some_and(|a| a.bot),
        edited: message.edited(),
        highlight: is_highlighted(message, logged_in),
        timestamp: message.timestamp.clone(),
        content: transform(&message.content, &context, false, false),
        reply,
        embeds,
        thread_name: message.thread.as_ref().and_then(|t| t.name.clone()),
        role_color: options.role_color(),
    }
}
