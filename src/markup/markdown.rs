//! Stage B of the content transformer: Markdown-style substitution.
//!
//! Runs strictly after token substitution. The pass order is load-bearing:
//! later patterns assume earlier passes already rewrote their subjects into
//! markup the later patterns no longer match (e.g. link passes run before
//! the bare-URL pass, which in turn skips URLs that ended up adjacent to
//! emitted attribute quotes).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BLOCK_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\n)> \s*(.*)").expect("block quote pattern is valid"));
static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(#{1,3})\s*(.+)$").expect("header pattern is valid"));
static ANGLE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(https?://\S+)>").expect("angle link pattern is valid"));
static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]*?)\]\((.*?)\)").expect("markdown link pattern is valid"));
static BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:https?|ftp)://(?:www\.)?[^\s()<>]+(?:\([^\s()<>]*\)|[^\s()<>])*)\b")
        .expect("bare url pattern is valid")
});
static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(\w*)\n(.*?)```").expect("code block pattern is valid")
});
static CODE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("code span pattern is valid"));
static STRIKETHROUGH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~~([^~]+)~~").expect("strikethrough pattern is valid"));
static SUBSCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\n)-#\s*(.*)").expect("subscript pattern is valid"));
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern is valid"));
static UNDERLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__([^_]+)__").expect("underline pattern is valid"));
static ITALIC_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("italic pattern is valid"));
static ITALIC_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([^_]+)_").expect("italic pattern is valid"));
static SPOILER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|\|([^|]+)\|\|").expect("spoiler pattern is valid"));

/// Trim every line of a code block body and drop surrounding blank lines.
fn trim_code_body(body: &str) -> String {
    body.split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Linkify the first bare URL, unless a non-whitespace character sits
/// directly against either end of the match. The adjacency check runs for
/// one match per call only; URLs already wrapped by the earlier link passes
/// sit against an attribute quote and are skipped by the same check.
fn linkify_first_bare_url(content: String) -> String {
    let Some(found) = BARE_URL.find(&content) else {
        return content;
    };

    let before = content[..found.start()].chars().next_back();
    let after = content[found.end()..].chars().next();
    let adjacent = before.is_some_and(|c| !c.is_whitespace())
        || after.is_some_and(|c| !c.is_whitespace());
    if adjacent {
        return content;
    }

    let url = found.as_str();
    let mut out = String::with_capacity(content.len() + 64);
    out.push_str(&content[..found.start()]);
    out.push_str(&format!(
        "<discord-link href='{url}' target='_blank'>{url}</discord-link>"
    ));
    out.push_str(&content[found.end()..]);
    out
}

/// Run every Markdown pass over `content` in order.
pub(crate) fn substitute_markdown(content: &str, in_embed: bool) -> String {
    // Quote lines are rewritten one source line at a time, not merged
    let content = BLOCK_QUOTE.replace_all(content, |caps: &Captures| {
        format!("<discord-quote>{}</discord-quote>", &caps[1])
    });

    let content = HEADER.replace_all(&content, |caps: &Captures| {
        format!(
            "<discord-header level='{}'>{}</discord-header>",
            caps[1].len(),
            &caps[2]
        )
    });

    // <url> form: link without a preview
    let content = ANGLE_LINK.replace_all(&content, |caps: &Captures| {
        let url = &caps[1];
        format!(
            "<discord-link href='{url}' rel='noreferrer noopener' target='_blank'>{url}</discord-link>"
        )
    });

    let content = MARKDOWN_LINK.replace_all(&content, |caps: &Captures| {
        format!(
            "<discord-link href='{}' target='_blank'>{}</discord-link>",
            &caps[2],
            &caps[1]
        )
    });

    let content = linkify_first_bare_url(content.into_owned());

    let embed_attr = if in_embed { " embed" } else { "" };

    let content = CODE_BLOCK.replace_all(&content, |caps: &Captures| {
        format!(
            "<discord-code multiline{embed_attr}>{}</discord-code>",
            trim_code_body(&caps[2])
        )
    });

    let content = CODE_SPAN.replace_all(&content, |caps: &Captures| {
        format!("<discord-code{embed_attr}>{}</discord-code>", &caps[1])
    });

    let content = STRIKETHROUGH.replace_all(&content, |caps: &Captures| {
        format!("<span style='text-decoration: line-through;'>{}</span>", &caps[1])
    });

    let content = SUBSCRIPT.replace_all(&content, |caps: &Captures| {
        format!("<discord-subscript>{}</discord-subscript>", &caps[1])
    });

    // Break markers go in before bold/italic so spans that used to cross
    // lines still match afterwards
    let content = content.replace('\n', "<br />");

    let content = BOLD.replace_all(&content, |caps: &Captures| {
        format!("<discord-bold>{}</discord-bold>", &caps[1])
    });

    let content = UNDERLINE.replace_all(&content, |caps: &Captures| {
        format!("<discord-underlined>{}</discord-underlined>", &caps[1])
    });

    let content = ITALIC_STAR.replace_all(&content, |caps: &Captures| {
        format!("<discord-italic>{}</discord-italic>", &caps[1])
    });

    let content = ITALIC_UNDERSCORE.replace_all(&content, |caps: &Captures| {
        format!("<discord-italic>{}</discord-italic>", &caps[1])
    });

    let content = SPOILER.replace_all(&content, |caps: &Captures| {
        format!("<discord-spoiler>{}</discord-spoiler>", &caps[1])
    });

    content.into_owned()
}
