//! Content transformer: raw Discord message text to display markup.
//!
//! Two stages in fixed order: token substitution (mentions, slash commands,
//! custom emoji, navigational tokens), then Markdown-style substitution.
//! Total over arbitrary input; tokens nothing matches stay literal text.

mod helpers;
mod markdown;
mod mentions;

use crate::context::MentionContext;

/// Transform one message body (or embed field) into display markup.
///
/// `in_embed` switches emoji and code elements to their embed sizing.
/// `only_first_line` truncates to the first line after token substitution,
/// for reply previews. The output is terminal markup; running `transform`
/// over its own output is not supported.
pub fn transform(
    content: &str,
    mentions: &MentionContext,
    in_embed: bool,
    only_first_line: bool,
) -> String {
    let only_emoji = helpers::is_only_custom_emojis(content);
    let substituted = mentions::substitute_tokens(content, mentions, in_embed, only_emoji);

    let substituted = if only_first_line {
        helpers::first_line(&substituted).to_string()
    } else {
        substituted
    };

    markdown::substitute_markdown(&substituted, in_embed)
}
