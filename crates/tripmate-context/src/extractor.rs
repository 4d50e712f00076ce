// SPDX-FileCopyrightText: 2026 TripMate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response extractor: pulls the structured trip payload out of a free-form
//! assistant reply.
//!
//! Replies usually look like a friendly sentence followed by a fenced
//! ```` ```json ```` block, but models also emit bare fences or inline objects.
//! Normalization picks the first matching branch, in this fixed order:
//!
//! 1. fenced json block (text between ```` ```json ```` and the next fence)
//! 2. generic fence at the start (first line and trailing fence dropped)
//! 3. brace span (first `{` through last `}`)
//!
//! The normalized text is then parsed as a JSON object. Extraction never
//! fails: anything unusable is `None`.

use serde_json::{Map, Value};
use tracing::{debug, warn};
use tripmate_core::TripPayload;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Extract the trip payload carried by `reply`, if any.
pub fn extract(reply: &str) -> Option<TripPayload> {
    let candidate = normalize(reply.trim());
    if !candidate.starts_with('{') {
        debug!(len = reply.len(), "reply carries no trip payload");
        return None;
    }

    match serde_json::from_str::<Map<String, Value>>(candidate) {
        Ok(map) => {
            debug!(keys = map.len(), "extracted trip payload");
            Some(TripPayload::new(map))
        }
        Err(e) => {
            warn!(
                error = %e,
                len = candidate.len(),
                "failed to parse trip payload"
            );
            None
        }
    }
}

/// Reduce a trimmed reply to the text that should hold the JSON object.
fn normalize(text: &str) -> &str {
    if let Some(start) = text.find(JSON_FENCE) {
        let body = &text[start + JSON_FENCE.len()..];
        // An unterminated block is left alone and fails the object check.
        return match body.find(FENCE) {
            Some(end) => body[..end].trim(),
            None => text,
        };
    }

    if text.starts_with(FENCE) {
        let body = text.split_once('\n').map_or(text, |(_, rest)| rest);
        let body = body.rfind(FENCE).map_or(body, |end| &body[..end]);
        return body.trim();
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && end > start
    {
        return &text[start..=end];
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn map_of(payload: Option<TripPayload>) -> Value {
        Value::Object(payload.expect("payload").into_map())
    }

    #[test]
    fn fenced_json_ignores_surrounding_prose() {
        let reply = "Sweet as! Here's your trip.\n\n```json\n{\"from\": \"Auckland\", \"to\": \"Queenstown\", \"duration\": \"3 days\"}\n```\n\nEnjoy! {not json}";
        assert_eq!(
            map_of(extract(reply)),
            json!({"from": "Auckland", "to": "Queenstown", "duration": "3 days"})
        );
    }

    #[test]
    fn fenced_json_wins_over_earlier_braces() {
        let reply = "Options {a} and {b}.\n```json\n{\"to\": \"Nelson\"}\n```";
        assert_eq!(map_of(extract(reply)), json!({"to": "Nelson"}));
    }

    #[test]
    fn unterminated_json_fence_yields_none() {
        let reply = "Here you go\n```json\n{\"to\": \"Nelson\"}";
        assert!(extract(reply).is_none());
    }

    #[test]
    fn generic_fence_is_unwrapped() {
        let reply = "```\n{\"to\": \"Rotorua\", \"routes\": []}\n```";
        assert_eq!(map_of(extract(reply)), json!({"to": "Rotorua", "routes": []}));
    }

    #[test]
    fn generic_fence_with_language_tag() {
        let reply = "```javascript\n{\"to\": \"Napier\"}\n```";
        assert_eq!(map_of(extract(reply)), json!({"to": "Napier"}));
    }

    #[test]
    fn bare_object_in_prose() {
        let reply = "Plan: {\"to\": \"Taupo\", \"extra\": {\"nested\": true}} cheers";
        assert_eq!(
            map_of(extract(reply)),
            json!({"to": "Taupo", "extra": {"nested": true}})
        );
    }

    #[test]
    fn whole_reply_is_an_object() {
        let reply = "  {\"from\": \"Wellington\"}  ";
        assert_eq!(map_of(extract(reply)), json!({"from": "Wellington"}));
    }

    #[test]
    fn no_braces_yields_none() {
        assert!(extract("Kia ora! How can I help you plan your trip?").is_none());
        assert!(extract("").is_none());
    }

    #[test]
    fn malformed_braces_yield_none() {
        assert!(extract("} backwards {").is_none());
        assert!(extract("{\"to\": \"Wanaka\"").is_none());
        assert!(extract("{not: json}").is_none());
        assert!(extract("```json\n{\"to\": }\n```").is_none());
    }

    #[test]
    fn non_object_json_yields_none() {
        assert!(extract("```json\n[1, 2, 3]\n```").is_none());
    }

    #[test]
    fn payload_round_trips_to_equal_map() {
        let reply = "```json\n{\"to\": \"Dunedin\", \"hotels\": [{\"name\": \"Larnach Lodge\", \"rating\": 4.6}]}\n```";
        let payload = extract(reply).unwrap();
        let text = serde_json::to_string(&payload).unwrap();
        let back: TripPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(back, payload);
    }

    proptest! {
        #[test]
        fn extract_never_panics(reply in ".*") {
            let _ = extract(&reply);
        }

        #[test]
        fn brace_heavy_input_never_panics(reply in "[{}`json\\n a\":,]*") {
            let _ = extract(&reply);
        }

        #[test]
        fn fenced_objects_are_recovered(
            to in "[A-Za-z ]{1,20}",
            days in 1u32..30,
            prose in "[A-Za-z !.,]{0,40}",
        ) {
            let expected = json!({"to": to, "duration": format!("{days} days")});
            let reply = format!("{prose}\n```json\n{expected}\n```\n{prose}");
            prop_assert_eq!(map_of(extract(&reply)), expected);
        }
    }
}
