// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end continuity: extract -> recover -> compose over a stored session.

use tripmate_context::{compose, extract, recover_context};
use tripmate_core::{Role, Turn};

fn turn(i: usize, role: Role, content: &str) -> Turn {
    Turn {
        id: format!("turn-{i}"),
        session_id: "sess-queenstown".to_string(),
        role,
        content: content.to_string(),
        timestamp: format!("2026-01-01T00:00:0{i}.000Z"),
    }
}

const FIRST_REPLY: &str = "I've created an amazing trip plan for Queenstown!\n\n```json\n{\"from\": \"Auckland\", \"to\": \"Queenstown\", \"duration\": \"3 days\"}\n```";

#[test]
fn more_hotels_keeps_origin_and_destination() {
    let turns = vec![
        turn(0, Role::User, "Plan a 3 day trip to Queenstown"),
        turn(1, Role::Assistant, FIRST_REPLY),
        turn(2, Role::User, "show me more hotels"),
    ];

    let ctx = recover_context(&turns, true);
    assert_eq!(ctx.origin.as_deref(), Some("Auckland"));
    assert_eq!(ctx.destination.as_deref(), Some("Queenstown"));
    assert!(ctx.is_follow_up);

    let prompt = compose("BASE", &ctx, &turns[..2], "show me more hotels");
    assert!(prompt.contains("\"from\": \"Auckland\""));
    assert!(prompt.contains("\"to\": \"Queenstown\""));
    assert!(prompt.contains("User's current request: show me more hotels"));
}

#[test]
fn destination_switch_is_followed() {
    let turns = vec![
        turn(0, Role::User, "Plan a trip to Queenstown"),
        turn(1, Role::Assistant, FIRST_REPLY),
        turn(2, Role::User, "Switch the trip to Wanaka"),
        turn(
            3,
            Role::Assistant,
            "Sweet as!\n```json\n{\"from\": \"Auckland\", \"to\": \"Wanaka\", \"duration\": \"3 days\"}\n```",
        ),
        turn(4, Role::User, "more places please"),
    ];

    let ctx = recover_context(&turns, true);
    assert_eq!(ctx.destination.as_deref(), Some("Wanaka"));

    let prompt = compose("BASE", &ctx, &turns[..4], "more places please");
    assert!(prompt.contains("CURRENT NZ TRIP DESTINATION: Wanaka"));
}

#[test]
fn extracted_reply_matches_payload_keys() {
    let payload = extract(FIRST_REPLY).expect("payload");
    assert_eq!(payload.origin(), Some("Auckland"));
    assert_eq!(payload.destination(), Some("Queenstown"));
    assert_eq!(payload.duration(), Some("3 days"));
    assert_eq!(payload.as_map().len(), 3);
}
