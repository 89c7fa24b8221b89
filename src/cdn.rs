//! Discord CDN URL builders.

const CDN_BASE: &str = "https://cdn.discordapp.com";

/// Image extension for an asset hash; `a_`-prefixed hashes are animated.
fn hash_extension(hash: &str) -> &'static str {
    if hash.starts_with("a_") { "gif" } else { "png" }
}

/// Avatar image for a user.
pub fn avatar_url(user_id: &str, avatar_hash: &str) -> String {
    format!(
        "{CDN_BASE}/avatars/{user_id}/{avatar_hash}.{}",
        hash_extension(avatar_hash)
    )
}

/// One of the six stock avatars, picked from the id's timestamp bits.
pub fn default_avatar_url(id: &str) -> String {
    let index = id.parse::<u64>().map(|id| (id >> 22) % 6).unwrap_or(0);
    format!("{CDN_BASE}/embed/avatars/{index}.png")
}

/// Guild icon image.
pub fn guild_icon_url(guild_id: &str, icon_hash: &str) -> String {
    format!(
        "{CDN_BASE}/icons/{guild_id}/{icon_hash}.{}",
        hash_extension(icon_hash)
    )
}

/// Group DM icon image.
pub fn channel_icon_url(channel_id: &str, icon_hash: &str) -> String {
    format!(
        "{CDN_BASE}/channel-icons/{channel_id}/{icon_hash}.{}",
        hash_extension(icon_hash)
    )
}

/// Custom emoji image; animated emoji get the gif variant.
pub fn emoji_url(emoji_id: &str, animated: bool) -> String {
    let extension = if animated { "gif" } else { "png" };
    format!("{CDN_BASE}/emojis/{emoji_id}.{extension}")
}
