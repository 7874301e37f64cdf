mod conversation;
mod domain;
mod message;
mod request;
mod text_utils;

pub use conversation::{Conversation, CreateConversationRequest};
pub use domain::{Domain, IconKey};
pub use message::*;
pub use request::{LengthHint, StreamRequest};
pub use text_utils::{parse_image_markup, IMAGE_PLACEHOLDER};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Helper to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and naive ISO 8601 (assumed UTC, which is what the
/// backend writes for columns without a zone). Anything else is unknown.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Helper to deserialize a timestamp that may be missing, null or malformed.
///
/// Malformed values become `None` instead of failing the whole record.
pub(crate) fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(text)) => parse_timestamp(&text),
        _ => None,
    })
}

/// Helper to deserialize nullable strings, treating blank values as absent
pub(crate) fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|opt| opt.filter(|text| !text.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
        #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "deserialize_optional_text")]
        note: Option<String>,
    }

    #[test]
    fn test_id_accepts_integer_and_string() {
        let probe: Probe = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        assert_eq!(probe.id, "12");
        let probe: Probe = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(probe.id, "abc");
    }

    #[test]
    fn test_timestamp_rfc3339_and_naive() {
        let probe: Probe =
            serde_json::from_str(r#"{"id": 1, "at": "2024-03-05T10:20:30+02:00"}"#).unwrap();
        let at = probe.at.unwrap();
        assert_eq!(at.hour(), 8);

        let probe: Probe =
            serde_json::from_str(r#"{"id": 1, "at": "2024-03-05T10:20:30.123456"}"#).unwrap();
        let at = probe.at.unwrap();
        assert_eq!((at.month(), at.day(), at.hour()), (3, 5, 10));
    }

    #[test]
    fn test_malformed_timestamp_is_unknown() {
        let probe: Probe = serde_json::from_str(r#"{"id": 1, "at": "yesterday-ish"}"#).unwrap();
        assert!(probe.at.is_none());
        let probe: Probe = serde_json::from_str(r#"{"id": 1, "at": 17}"#).unwrap();
        assert!(probe.at.is_none());
        let probe: Probe = serde_json::from_str(r#"{"id": 1, "at": null}"#).unwrap();
        assert!(probe.at.is_none());
    }

    #[test]
    fn test_blank_text_is_absent() {
        let probe: Probe = serde_json::from_str(r#"{"id": 1, "note": "   "}"#).unwrap();
        assert!(probe.note.is_none());
        let probe: Probe = serde_json::from_str(r#"{"id": 1, "note": "hi"}"#).unwrap();
        assert_eq!(probe.note.as_deref(), Some("hi"));
    }
}
