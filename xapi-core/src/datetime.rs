//! Timestamps as carried on the wire.

use chrono::{NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// The compact form the server emits.
const WIRE_FORMAT: &str = "%Y%m%dT%H:%M:%SZ";

/// A point in time, second precision, always UTC.
///
/// The server emits the basic ISO 8601 form without date separators
/// (`20250824T09:30:00Z`); some releases emit the extended RFC 3339 form
/// instead. Decoding accepts both, encoding always uses the compact form.
/// The default value, which is also what an omitted field decodes to, is the
/// Unix epoch.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DateTime(chrono::DateTime<Utc>);

impl DateTime {
    /// The Unix epoch, the protocol's "no timestamp" value.
    pub const EPOCH: DateTime = DateTime(chrono::DateTime::UNIX_EPOCH);

    /// The wrapped `chrono` value.
    pub fn as_chrono(&self) -> chrono::DateTime<Utc> {
        self.0
    }

    fn parse(text: &str) -> Option<chrono::DateTime<Utc>> {
        NaiveDateTime::parse_from_str(text, WIRE_FORMAT)
            .map(|naive| naive.and_utc())
            .or_else(|_| {
                chrono::DateTime::parse_from_rfc3339(text).map(|dt| dt.with_timezone(&Utc))
            })
            .ok()
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(inner: chrono::DateTime<Utc>) -> Self {
        Self(inner)
    }
}

impl From<DateTime> for chrono::DateTime<Utc> {
    fn from(dt: DateTime) -> Self {
        dt.0
    }
}

impl core::fmt::Display for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0.format(WIRE_FORMAT))
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = DateTime;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("an ISO 8601 timestamp string")
            }

            fn visit_str<E>(self, text: &str) -> Result<DateTime, E>
            where
                E: de::Error,
            {
                DateTime::parse(text)
                    .map(DateTime)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(text), &self))
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_round_trips() {
        let json = serde_json::json!("20250824T09:30:00Z");
        let dt: DateTime = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(dt.to_string(), "20250824T09:30:00Z");
        assert_eq!(serde_json::to_value(dt).unwrap(), json);
    }

    #[test]
    fn rfc3339_form_is_accepted() {
        let dt: DateTime =
            serde_json::from_value(serde_json::json!("2025-08-24T09:30:00Z")).unwrap();
        assert_eq!(dt.to_string(), "20250824T09:30:00Z");

        // Offsets are normalized to UTC.
        let dt: DateTime =
            serde_json::from_value(serde_json::json!("2025-08-24T11:30:00+02:00")).unwrap();
        assert_eq!(dt.to_string(), "20250824T09:30:00Z");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(serde_json::from_value::<DateTime>(serde_json::json!("yesterday")).is_err());
        assert!(serde_json::from_value::<DateTime>(serde_json::json!(1724490600)).is_err());
    }

    #[test]
    fn default_is_the_epoch() {
        assert_eq!(DateTime::default().to_string(), "19700101T00:00:00Z");
        assert_eq!(DateTime::default(), DateTime::EPOCH);
    }
}
