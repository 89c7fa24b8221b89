//! Helper predicates for the content transformer.

use once_cell::sync::Lazy;
use regex::Regex;

static CUSTOM_EMOJI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<a?:\w+:\d+>").expect("emoji pattern is valid"));

/// Whether stripping every custom emoji token from the content leaves only
/// whitespace. Such messages render their emoji at jumbo size.
///
/// Computed once against the raw content, before any substitution runs.
pub(crate) fn is_only_custom_emojis(content: &str) -> bool {
    CUSTOM_EMOJI.replace_all(content, "").trim().is_empty()
}

/// First line of the content, split on the literal newline. Used for
/// truncated reply previews.
pub(crate) fn first_line(content: &str) -> &str {
    content.split('\n').next().unwrap_or_default()
}
