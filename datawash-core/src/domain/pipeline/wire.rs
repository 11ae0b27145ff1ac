// datawash-core/src/domain/pipeline/wire.rs

//! Lenient readers for fields of pipeline documents.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::params::Params;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// RFC 3339 first, then ISO-8601 without an offset (read as UTC), then a
/// bare date at midnight UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn timestamp_from<E: serde::de::Error>(text: &str) -> Result<DateTime<Utc>, E> {
    parse_timestamp(text).ok_or_else(|| E::custom(format!("invalid timestamp '{text}'")))
}

/// `null` is read as "now", like a missing `ts`.
pub fn timestamp_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => timestamp_from(&text),
        None => Ok(Utc::now()),
    }
}

pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|text| timestamp_from(&text))
        .transpose()
}

/// `null` params are an empty object.
pub fn params_or_empty<'de, D>(deserializer: D) -> Result<Params, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Params::new()),
        other => Err(serde::de::Error::custom(format!(
            "params must be an object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_forms() {
        let expected = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .map(|ts| ts + chrono::Duration::microseconds(123_456));
        assert_eq!(parse_timestamp("2024-05-01T12:00:00.123456"), expected);
        assert_eq!(parse_timestamp("2024-05-01T12:00:00.123456Z"), expected);
        assert_eq!(parse_timestamp("2024-05-01T14:00:00.123456+02:00"), expected);
        assert_eq!(parse_timestamp("2024-05-01 12:00:00.123456"), expected);
        assert_eq!(
            parse_timestamp("2024-05-01"),
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).single()
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
