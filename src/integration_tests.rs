//! Integration tests for the rendering core.
//!
//! These exercise the full path a history batch takes: JSON records in,
//! classified and transformed view models out.

use crate::message::{GuildRecord, MessageRecord};
use crate::render::{render_messages, MessageView, RenderOptions, UNKNOWN_TEXT};

fn fixture_guild() -> GuildRecord {
    serde_json::from_str(
        r#"{
            "id": "600",
            "name": "Rust Hideout",
            "roles": [{ "id": "70", "name": "contributors" }],
            "channels": [
                { "id": "80", "type": 0, "name": "general" },
                { "id": "81", "type": 2, "name": "standup" }
            ]
        }"#,
    )
    .unwrap()
}

fn fixture_batch() -> Vec<MessageRecord> {
    serde_json::from_str(
        r#"[
            {
                "id": "1",
                "type": 0,
                "author": { "id": "10", "username": "alice" },
                "content": "welcome to <#80>, ping <@11> and <@&70>",
                "timestamp": "2024-03-01T12:00:00.000+00:00",
                "mentions": [{ "id": "11", "username": "bob" }],
                "mention_roles": ["70"]
            },
            {
                "id": "2",
                "type": 7,
                "author": { "id": "11", "username": "bob" },
                "content": "",
                "timestamp": "2024-03-01T12:00:13.000+00:00"
            },
            {
                "id": "3",
                "type": 19,
                "author": { "id": "11", "username": "bob" },
                "content": "agreed **fully**",
                "timestamp": "2024-03-01T12:01:00.000+00:00",
                "referenced_message": {
                    "id": "1",
                    "type": 0,
                    "author": { "id": "10", "username": "alice" },
                    "content": "first\nsecond",
                    "timestamp": "2024-03-01T12:00:00.000+00:00"
                }
            },
            {
                "id": "4",
                "type": 99,
                "content": "",
                "timestamp": "2024-03-01T12:02:00.000+00:00"
            }
        ]"#,
    )
    .unwrap()
}

#[test]
fn test_batch_renders_every_message_kind() {
    let views = render_messages(
        &fixture_batch(),
        &fixture_guild(),
        Some("11"),
        &RenderOptions::default(),
    );
    assert_eq!(views.len(), 4);

    // Authored message: mentions resolved against the batch tables
    let MessageView::Normal(normal) = &views[0] else {
        panic!("expected a normal view");
    };
    assert_eq!(
        normal.content,
        "welcome to <discord-mention type='channel' id='80'>general</discord-mention>, \
         ping <discord-mention type='user' id='11'>bob</discord-mention> \
         and <discord-mention type='role' id='70'>contributors</discord-mention>"
    );
    assert!(normal.highlight, "logged-in user 11 is mentioned");

    // System join message: one of the fixed welcome lines, actor in italics
    let MessageView::System(notice) = &views[1] else {
        panic!("expected a system view");
    };
    assert!(notice.narrative.contains("<i>bob</i>"));

    // Reply: body transformed, preview truncated to the first line
    let MessageView::Normal(reply) = &views[2] else {
        panic!("expected a normal view");
    };
    assert_eq!(reply.content, "agreed <discord-bold>fully</discord-bold>");
    let preview = reply.reply.as_ref().unwrap();
    assert_eq!(preview.author, "alice");
    assert_eq!(preview.content, "first");

    // Unknown type code: placeholder with the code preserved
    assert!(matches!(
        views[3],
        MessageView::Placeholder { text: UNKNOWN_TEXT, code: 99 }
    ));
}

#[test]
fn test_renders_are_independent_and_repeatable() {
    let batch = fixture_batch();
    let guild = fixture_guild();
    let options = RenderOptions::default();

    let first = render_messages(&batch, &guild, Some("11"), &options);
    let second = render_messages(&batch, &guild, Some("11"), &options);

    for (a, b) in first.iter().zip(&second) {
        match (a, b) {
            (MessageView::Normal(a), MessageView::Normal(b)) => assert_eq!(a.content, b.content),
            (MessageView::System(a), MessageView::System(b)) => {
                assert_eq!(a.narrative, b.narrative)
            }
            (
                MessageView::Placeholder { code: a, .. },
                MessageView::Placeholder { code: b, .. },
            ) => assert_eq!(a, b),
            _ => panic!("render passes disagreed on message kind"),
        }
    }
}

#[test]
fn test_welcome_line_is_stable_for_congruent_timestamps() {
    let guild = fixture_guild();
    let mut batch = fixture_batch();
    // Shift the join message by exactly 13 seconds; same welcome line
    let original = match render_messages(&batch, &guild, None, &RenderOptions::default())
        .swap_remove(1)
    {
        MessageView::System(notice) => notice.narrative,
        _ => panic!("expected a system view"),
    };

    batch[1].timestamp = "2024-03-01T12:00:26.000+00:00".into();
    let shifted = match render_messages(&batch, &guild, None, &RenderOptions::default())
        .swap_remove(1)
    {
        MessageView::System(notice) => notice.narrative,
        _ => panic!("expected a system view"),
    };

    assert_eq!(original, shifted);
}
