//! System message classification.
//!
//! Discord encodes joins, boosts, pins, calls and the rest as typed message
//! records with no author-written content. This module maps each type code
//! to a narrative sentence (or decides nothing should render). The narrative
//! strings carry inline markup and are fed back through the content
//! transformer by the render layer.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::message::MessageRecord;

/// Known message type codes, matching the Discord API numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    Default = 0,
    RecipientAdd = 1,
    RecipientRemove = 2,
    Call = 3,
    ChannelNameChange = 4,
    ChannelIconChange = 5,
    ChannelPinnedMessage = 6,
    UserJoin = 7,
    GuildBoost = 8,
    GuildBoostTier1 = 9,
    GuildBoostTier2 = 10,
    GuildBoostTier3 = 11,
    ChannelFollowAdd = 12,
    GuildDiscoveryDisqualified = 14,
    GuildDiscoveryRequalified = 15,
    GuildDiscoveryGracePeriodInitialWarning = 16,
    GuildDiscoveryGracePeriodFinalWarning = 17,
    ThreadCreated = 18,
    Reply = 19,
    ChatInputCommand = 20,
    ThreadStarterMessage = 21,
    GuildInviteReminder = 22,
    ContextMenuCommand = 23,
    AutoModerationAction = 24,
    RoleSubscriptionPurchase = 25,
    InteractionPremiumUpsell = 26,
    StageStart = 27,
    StageEnd = 28,
    StageSpeaker = 29,
    StageRaiseHand = 30,
    StageTopic = 31,
    GuildApplicationPremiumSubscription = 32,
    GuildIncidentAlertModeEnabled = 36,
    GuildIncidentAlertModeDisabled = 37,
    GuildIncidentReportRaid = 38,
    GuildIncidentReportFalseAlarm = 39,
}

impl MessageKind {
    pub fn from_code(code: u8) -> Option<Self> {
        use MessageKind::*;
        Some(match code {
            0 => Default,
            1 => RecipientAdd,
            2 => RecipientRemove,
            3 => Call,
            4 => ChannelNameChange,
            5 => ChannelIconChange,
            6 => ChannelPinnedMessage,
            7 => UserJoin,
            8 => GuildBoost,
            9 => GuildBoostTier1,
            10 => GuildBoostTier2,
            11 => GuildBoostTier3,
            12 => ChannelFollowAdd,
            14 => GuildDiscoveryDisqualified,
            15 => GuildDiscoveryRequalified,
            16 => GuildDiscoveryGracePeriodInitialWarning,
            17 => GuildDiscoveryGracePeriodFinalWarning,
            18 => ThreadCreated,
            19 => Reply,
            20 => ChatInputCommand,
            21 => ThreadStarterMessage,
            22 => GuildInviteReminder,
            23 => ContextMenuCommand,
            24 => AutoModerationAction,
            25 => RoleSubscriptionPurchase,
            26 => InteractionPremiumUpsell,
            27 => StageStart,
            28 => StageEnd,
            29 => StageSpeaker,
            30 => StageRaiseHand,
            31 => StageTopic,
            32 => GuildApplicationPremiumSubscription,
            36 => GuildIncidentAlertModeEnabled,
            37 => GuildIncidentAlertModeDisabled,
            38 => GuildIncidentReportRaid,
            39 => GuildIncidentReportFalseAlarm,
            _ => return None,
        })
    }
}

/// Icon category for a rendered system message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemKind {
    Thread,
    Join,
    Alert,
    Error,
    Boost,
    Call,
    Edit,
    Leave,
    MissedCall,
    Pin,
    Upgrade,
}

impl SystemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SystemKind::Thread => "thread",
            SystemKind::Join => "join",
            SystemKind::Alert => "alert",
            SystemKind::Error => "error",
            SystemKind::Boost => "boost",
            SystemKind::Call => "call",
            SystemKind::Edit => "edit",
            SystemKind::Leave => "leave",
            SystemKind::MissedCall => "missed-call",
            SystemKind::Pin => "pin",
            SystemKind::Upgrade => "upgrade",
        }
    }
}

/// A system event ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNotice {
    /// Narrative sentence with inline markup; run it through the transformer
    pub narrative: String,
    pub kind: SystemKind,
    /// Whether the rendered row shows the channel name
    pub channel_name: bool,
}

/// Outcome of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Ordinary authored content; render the message body instead
    Suppressed,
    Rendered(SystemNotice),
    /// Recognized type this viewer does not render yet
    Unsupported(u8),
    /// Type code outside the known set
    Unknown(u8),
}

fn notice(kind: SystemKind, narrative: String) -> Classification {
    Classification::Rendered(SystemNotice { narrative, kind, channel_name: false })
}

fn channel_notice(kind: SystemKind, narrative: String) -> Classification {
    Classification::Rendered(SystemNotice { narrative, kind, channel_name: true })
}

/// Classify one message record against the system-message table.
///
/// Never fails: unrecognized codes come back as `Unknown`, and missing
/// fields fall back to placeholders inside the narrative.
pub fn classify(message: &MessageRecord, guild_name: Option<&str>) -> Classification {
    use MessageKind::*;

    let Some(kind) = MessageKind::from_code(message.kind) else {
        debug!(code = message.kind, "unknown message type code");
        return Classification::Unknown(message.kind);
    };

    let actor = format!("<i>{}</i>", message.author_name());
    let guild = guild_name.unwrap_or("unknown server");

    match kind {
        Default | Reply | ChatInputCommand | ThreadStarterMessage | ContextMenuCommand => {
            Classification::Suppressed
        }

        RecipientAdd => notice(
            SystemKind::Join,
            format!("{actor} added <i>{}</i> to the group.", first_mention(message)),
        ),
        RecipientRemove => notice(
            SystemKind::Leave,
            format!("{actor} removed <i>{}</i> from the group.", first_mention(message)),
        ),

        Call => match message.call.as_ref().and_then(|c| c.ended_timestamp.as_deref()) {
            Some(ended) => notice(
                SystemKind::MissedCall,
                format!(
                    "{actor} started a call that lasted {}.",
                    elapsed_label(&message.timestamp, ended)
                ),
            ),
            None => notice(SystemKind::Call, format!("{actor} started a call.")),
        },

        ChannelNameChange => channel_notice(
            SystemKind::Edit,
            format!("{actor} changed the channel name: {}.", message.content),
        ),
        ChannelIconChange => notice(SystemKind::Edit, format!("{actor} changed the group icon.")),
        ChannelPinnedMessage => notice(
            SystemKind::Pin,
            format!(
                "{actor} pinned <i>a message</i> to this channel. See all <i>pinned messages</i>."
            ),
        ),

        UserJoin => notice(SystemKind::Join, welcome_narrative(&actor, &message.timestamp)),

        GuildBoost => notice(SystemKind::Boost, format!("{actor} just boosted the server!")),
        GuildBoostTier1 => notice(SystemKind::Boost, boost_tier(&actor, guild, 1)),
        GuildBoostTier2 => notice(SystemKind::Boost, boost_tier(&actor, guild, 2)),
        GuildBoostTier3 => notice(SystemKind::Boost, boost_tier(&actor, guild, 3)),

        ChannelFollowAdd => notice(
            SystemKind::Edit,
            format!(
                "{actor} has added <i>{}</i> to the channel. \
                 Its most important updates will show up here.",
                message.content
            ),
        ),

        GuildDiscoveryDisqualified => notice(
            SystemKind::Error,
            "This server has been removed from Server Discovery because it no longer \
             passes all the requirements. Check Server settings for more details."
                .to_string(),
        ),
        GuildDiscoveryRequalified => notice(
            SystemKind::Boost,
            "This server has been requalified for Server Discovery. \
             Check Server settings for more details."
                .to_string(),
        ),
        GuildDiscoveryGracePeriodInitialWarning => notice(
            SystemKind::Alert,
            "This server has failed Discovery activity requirements for 1 week. \
             If this server fails for 4 weeks in a row, it will be automatically \
             removed from Discovery."
                .to_string(),
        ),
        GuildDiscoveryGracePeriodFinalWarning => notice(
            SystemKind::Alert,
            "This server has failed Discovery activity requirements for 3 weeks in a row. \
             If this server fails for 1 more week, it will be removed from Discovery"
                .to_string(),
        ),

        ThreadCreated => channel_notice(
            SystemKind::Thread,
            format!(
                "{actor} started a thread: {}. See all <i>threads</i>.",
                message
                    .thread
                    .as_ref()
                    .and_then(|t| t.name.as_deref())
                    .unwrap_or_default()
            ),
        ),

        RoleSubscriptionPurchase => notice(SystemKind::Join, role_subscription(message, guild)),

        StageStart => notice(SystemKind::Call, format!("{actor} started {}.", message.content)),
        StageEnd => notice(
            SystemKind::MissedCall,
            format!("{actor} ended {}.", message.content),
        ),
        StageSpeaker => notice(SystemKind::Call, format!("{actor} is now a speaker.")),
        StageRaiseHand => notice(SystemKind::Call, format!("{actor} requested to speak.")),
        StageTopic => notice(
            SystemKind::Edit,
            format!("{actor} changed the Stage topic: {}.", message.content),
        ),

        GuildApplicationPremiumSubscription => notice(
            SystemKind::Upgrade,
            format!("{actor} upgraded {guild} to premium for this server! \u{1F389}"),
        ),

        GuildInviteReminder
        | AutoModerationAction
        | InteractionPremiumUpsell
        | GuildIncidentAlertModeEnabled
        | GuildIncidentAlertModeDisabled
        | GuildIncidentReportRaid
        | GuildIncidentReportFalseAlarm => {
            debug!(code = message.kind, "message type not rendered yet");
            Classification::Unsupported(message.kind)
        }
    }
}

fn first_mention(message: &MessageRecord) -> &str {
    message
        .mentions
        .first()
        .map(|user| user.username.as_str())
        .unwrap_or("Unknown User")
}

fn boost_tier(actor: &str, guild: &str, level: u8) -> String {
    format!("{actor} just boosted the server! {guild} has achieved **Level {level}**!")
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

fn pluralize(amount: i64, unit: &str) -> String {
    if amount == 1 {
        format!("{amount} {unit}")
    } else {
        format!("{amount} {unit}s")
    }
}

/// Render the time between two timestamps using the single largest non-zero
/// unit of days, hours or minutes, falling back to seconds. Unparseable
/// timestamps degrade to a zero-second duration.
fn elapsed_label(start: &str, end: &str) -> String {
    let seconds = match (parse_timestamp(start), parse_timestamp(end)) {
        (Some(start), Some(end)) => (end - start).num_seconds(),
        _ => 0,
    };

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        pluralize(days, "day")
    } else if hours > 0 {
        pluralize(hours, "hour")
    } else if minutes > 0 {
        pluralize(minutes, "minute")
    } else {
        pluralize(seconds, "second")
    }
}

/// Pick one of the 13 welcome lines from the join timestamp. The choice is
/// reproducible: the same timestamp always lands on the same line. The
/// default arm covers timestamps that fail to parse.
fn welcome_narrative(actor: &str, timestamp: &str) -> String {
    let index = parse_timestamp(timestamp).map(|t| t.timestamp_millis() % 13);

    match index {
        Some(0) => format!("{actor} joined the party."),
        Some(1) => format!("{actor} is here."),
        Some(2) => format!("Welcome, {actor}. We hope you brought pizza."),
        Some(3) => format!("A wild {actor} appeared."),
        Some(4) => format!("{actor} just landed."),
        Some(5) => format!("{actor} just slid into the server."),
        Some(6) => format!("{actor} just showed up!"),
        Some(7) => format!("Welcome {actor}. Say hi!"),
        Some(8) => format!("{actor} hopped into the server."),
        Some(9) => format!("Everyone welcome {actor}!"),
        Some(10) => format!("Glad you're here, {actor}."),
        Some(11) => format!("Good to see you, {actor}."),
        Some(12) => format!("Yay you made it, {actor}!"),
        _ => format!("Hi {actor}!"),
    }
}

fn role_subscription(message: &MessageRecord, guild: &str) -> String {
    let actor = format!("<i>{}</i>", message.author_name());
    let Some(data) = message.role_subscription_data.as_ref() else {
        // Defensive: the API always sends this for type 25
        return format!("{actor} joined a server subscription.");
    };

    if data.is_renewal {
        let months = data.total_months_subscribed;
        format!(
            "{actor} renewed {} and has been subscriber of {guild} for {}.",
            data.tier_name,
            pluralize(i64::from(months), "month"),
        )
    } else {
        let months = data.total_months_subscribed.max(1);
        format!(
            "{actor} joined {} and has been subscriber of {guild} for {}.",
            data.tier_name,
            pluralize(i64::from(months), "month"),
        )
    }
}
