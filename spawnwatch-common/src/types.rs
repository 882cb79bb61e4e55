use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One spawn as returned by the spawn-cache service.
///
/// Only the category and expiration are interpreted; every other field the
/// provider sends is kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Category identifier, e.g. "Pidgey". Compared case-insensitively.
    #[serde(rename = "pokemon_id")]
    pub category: String,
    /// Absolute despawn time
    #[serde(rename = "expireAt", with = "expire_at")]
    pub expire_at: DateTime<Utc>,
    /// Human readable remaining time ("2m 5s"), recomputed locally
    #[serde(rename = "timeLeft", default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    pub fn new(category: impl Into<String>, expire_at: DateTime<Utc>) -> Self {
        Self {
            category: category.into(),
            expire_at,
            time_left: None,
            extra: Map::new(),
        }
    }
}

/// Connectivity as seen by the most recent fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unknown => "unknown",
            Status::Online => "online",
            Status::Offline => "offline",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `expireAt` arrives either as epoch milliseconds or as an RFC 3339 string.
mod expire_at {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Float(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => from_millis(ms),
            Raw::Float(ms) => from_millis(ms.round() as i64),
            Raw::Text(text) => {
                if let Ok(parsed) = DateTime::parse_from_rfc3339(&text) {
                    return Ok(parsed.with_timezone(&Utc));
                }
                match text.trim().parse::<i64>() {
                    Ok(ms) => from_millis(ms),
                    Err(_) => Err(de::Error::custom(format!("invalid expireAt timestamp: {}", text))),
                }
            }
        }
    }

    fn from_millis<E: de::Error>(ms: i64) -> Result<DateTime<Utc>, E> {
        Utc.timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| E::custom(format!("expireAt out of range: {}", ms)))
    }
}
