//! Stage A of the content transformer: token substitution.
//!
//! Each pass scans the whole working string and rewrites every
//! non-overlapping match of one token kind before the next pass runs. The
//! order is fixed; later passes rely on earlier ones having already turned
//! their tokens into markup that no longer matches.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::cdn;
use crate::context::MentionContext;

static NAV_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<id:(\w+)>").expect("nav token pattern is valid"));
static USER_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@!?(\d+)>").expect("user mention pattern is valid"));
static ROLE_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@&(\d+)>").expect("role mention pattern is valid"));
static CHANNEL_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<#(\d+)>").expect("channel mention pattern is valid"));
static SLASH_COMMAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</(\w+):(\d+)>").expect("slash command pattern is valid"));
static CUSTOM_EMOJI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(a?):(\w+):(\d+)>").expect("custom emoji pattern is valid"));

fn mention_element(mention_type: &str, id: &str, label: &str) -> String {
    format!("<discord-mention type='{mention_type}' id='{id}'>{label}</discord-mention>")
}

/// Run every token pass over `content` in order.
pub(crate) fn substitute_tokens(
    content: &str,
    mentions: &MentionContext,
    in_embed: bool,
    only_emoji: bool,
) -> String {
    // Navigational tokens have fixed labels; anything unrecognized stays put
    let content = NAV_TOKEN.replace_all(content, |caps: &Captures| match &caps[1] {
        "home" => "<discord-mention type='server-guide'>Server Guide</discord-mention>".to_string(),
        "customize" | "browse" => {
            "<discord-mention type='channels-and-roles'>Channels & Roles</discord-mention>"
                .to_string()
        }
        _ => caps[0].to_string(),
    });

    // Unresolved user/role/channel mentions keep the marker and show the raw
    // id as the label
    let content = USER_MENTION.replace_all(&content, |caps: &Captures| {
        let id = &caps[1];
        let label = mentions.users.get(id).map(String::as_str).unwrap_or(id);
        mention_element("user", id, label)
    });

    let content = ROLE_MENTION.replace_all(&content, |caps: &Captures| {
        let id = &caps[1];
        let label = mentions.roles.get(id).map(String::as_str).unwrap_or(id);
        mention_element("role", id, label)
    });

    let content = CHANNEL_MENTION.replace_all(&content, |caps: &Captures| {
        let id = &caps[1];
        match mentions.channels.get(id) {
            Some(channel) => mention_element(channel.kind.mention_type(), id, &channel.name),
            None => mention_element("channel", id, id),
        }
    });

    let content = SLASH_COMMAND.replace_all(&content, |caps: &Captures| {
        mention_element("slash", &caps[2], &caps[1])
    });

    let content = CUSTOM_EMOJI.replace_all(&content, |caps: &Captures| {
        let animated = !caps[1].is_empty();
        let embed_attr = if in_embed { " embedEmoji" } else { "" };
        let jumbo_attr = if only_emoji { " jumbo" } else { "" };
        format!(
            "<discord-custom-emoji name='{}'{embed_attr}{jumbo_attr} url='{}'></discord-custom-emoji>",
            &caps[2],
            cdn::emoji_url(&caps[3], animated),
        )
    });

    content.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ChannelKind, ChannelLabel};

    fn context() -> MentionContext {
        let mut ctx = MentionContext::default();
        ctx.users.insert("111".into(), "alice".into());
        ctx.roles.insert("222".into(), "mods".into());
        ctx.channels.insert(
            "333".into(),
            ChannelLabel { name: "general".into(), kind: ChannelKind::Text },
        );
        ctx.channels.insert(
            "334".into(),
            ChannelLabel { name: "standup".into(), kind: ChannelKind::Voice },
        );
        ctx
    }

    fn substitute(content: &str) -> String {
        substitute_tokens(content, &context(), false, false)
    }

    #[test]
    fn test_user_mention_resolved() {
        assert_eq!(
            substitute("hi <@111>!"),
            "hi <discord-mention type='user' id='111'>alice</discord-mention>!"
        );
        // The <@!id> nickname form resolves identically
        assert_eq!(
            substitute("<@!111>"),
            "<discord-mention type='user' id='111'>alice</discord-mention>"
        );
    }

    #[test]
    fn test_user_mention_fallback_keeps_marker_with_id_label() {
        assert_eq!(
            substitute("<@999>"),
            "<discord-mention type='user' id='999'>999</discord-mention>"
        );
    }

    #[test]
    fn test_role_mention() {
        assert_eq!(
            substitute("<@&222>"),
            "<discord-mention type='role' id='222'>mods</discord-mention>"
        );
        assert_eq!(
            substitute("<@&998>"),
            "<discord-mention type='role' id='998'>998</discord-mention>"
        );
    }

    #[test]
    fn test_channel_mention_kinds() {
        assert_eq!(
            substitute("<#333>"),
            "<discord-mention type='channel' id='333'>general</discord-mention>"
        );
        assert_eq!(
            substitute("<#334>"),
            "<discord-mention type='voice' id='334'>standup</discord-mention>"
        );
        assert_eq!(
            substitute("<#997>"),
            "<discord-mention type='channel' id='997'>997</discord-mention>"
        );
    }

    #[test]
    fn test_slash_command_reference() {
        assert_eq!(
            substitute("</ban:444>"),
            "<discord-mention type='slash' id='444'>ban</discord-mention>"
        );
    }

    #[test]
    fn test_custom_emoji() {
        assert_eq!(
            substitute("<:blob:555>"),
            "<discord-custom-emoji name='blob' \
             url='https://cdn.discordapp.com/emojis/555.png'></discord-custom-emoji>"
        );
        assert_eq!(
            substitute("<a:party:556>"),
            "<discord-custom-emoji name='party' \
             url='https://cdn.discordapp.com/emojis/556.gif'></discord-custom-emoji>"
        );
    }

    #[test]
    fn test_emoji_flags() {
        let in_embed = substitute_tokens("<:blob:555>", &context(), true, false);
        assert!(in_embed.contains("embedEmoji"));

        let jumbo = substitute_tokens("<:blob:555>", &context(), false, true);
        assert!(jumbo.contains(" jumbo "));
        assert!(!jumbo.contains("embedEmoji"));
    }

    #[test]
    fn test_nav_tokens() {
        assert_eq!(
            substitute("<id:home>"),
            "<discord-mention type='server-guide'>Server Guide</discord-mention>"
        );
        assert_eq!(
            substitute("<id:browse>"),
            "<discord-mention type='channels-and-roles'>Channels & Roles</discord-mention>"
        );
        assert_eq!(
            substitute("<id:customize>"),
            "<discord-mention type='channels-and-roles'>Channels & Roles</discord-mention>"
        );
        // Unrecognized destinations pass through untouched
        assert_eq!(substitute("<id:linked-roles>"), "<id:linked-roles>");
    }

    #[test]
    fn test_malformed_tokens_pass_through() {
        assert_eq!(substitute("<@ 111>"), "<@ 111>");
        assert_eq!(substitute("<@abc>"), "<@abc>");
        assert_eq!(substitute("<#>"), "<#>");
        assert_eq!(substitute("<@111"), "<@111");
        assert_eq!(substitute("<:noid:>"), "<:noid:>");
    }

    #[test]
    fn test_each_token_replaced_exactly_once() {
        let out = substitute("<@111> and <@111>");
        assert_eq!(out.matches("alice").count(), 2);
        assert!(!out.contains("<@111>"));
    }
}
