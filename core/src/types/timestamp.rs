//! Lenient decoding for audit timestamps.
//!
//! The backend writes RFC 3339 with an offset, but rows stored without one
//! come back as `2024-03-01T12:00:00`. Offset-less values are read as UTC.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub(crate) fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = raw.parse::<DateTime<FixedOffset>>() {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}")))
}

pub(crate) mod option {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw:?}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "deserialize")]
        at: DateTime<Utc>,
        #[serde(default, deserialize_with = "option::deserialize")]
        until: Option<DateTime<Utc>>,
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn offset_and_naive_forms_agree() {
        for raw in [
            "2024-03-01T12:00:00Z",
            "2024-03-01T14:00:00+02:00",
            "2024-03-01T12:00:00",
            "2024-03-01 12:00:00",
        ] {
            assert_eq!(parse(raw), Some(noon()), "{raw}");
        }
        assert_eq!(
            parse("2024-03-01T12:00:00.1234567"),
            Some(noon() + chrono::Duration::nanoseconds(123_456_700))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse("yesterday"), None);
        let err = serde_json::from_str::<Stamped>(r#"{"at":"yesterday"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn optional_field_handles_null_and_absence() {
        let s: Stamped = serde_json::from_str(r#"{"at":"2024-03-01T12:00:00","until":null}"#).unwrap();
        assert_eq!(s.at, noon());
        assert!(s.until.is_none());
        let s: Stamped = serde_json::from_str(r#"{"at":"2024-03-01T12:00:00"}"#).unwrap();
        assert!(s.until.is_none());
        let s: Stamped =
            serde_json::from_str(r#"{"at":"2024-03-01T12:00:00Z","until":"2024-03-01T12:00:00"}"#).unwrap();
        assert_eq!(s.until, Some(noon()));
    }
}
