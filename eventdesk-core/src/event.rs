//! Event records and the form input they are built from.
//!
//! `Event` is the unit that gets persisted. `EventInput` is the same record
//! before it has an id, with the values a form may leave blank kept as
//! `Option`s so validation can report them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{Field, REQUIRED_MESSAGE, ValidationErrors, validate_sub_events};

/// The kind of event. Serialized as its display name ("Sports", "Music", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Sports,
    Music,
    General,
    Children,
    School,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::Sports,
        EventType::Music,
        EventType::General,
        EventType::Children,
        EventType::School,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Sports => "Sports",
            EventType::Music => "Music",
            EventType::General => "General",
            EventType::Children => "Children",
            EventType::School => "School",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    /// Case-insensitive, so "music" and "MUSIC" both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<_> = EventType::ALL.iter().map(|t| t.as_str()).collect();
                format!("Unknown event type '{}'. Expected one of: {}", s, names.join(", "))
            })
    }
}

/// A stored event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, with = "iso_date")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "iso_date")]
    pub end_date: Option<DateTime<Utc>>,
    pub description: String,
    pub handled_by: String,
    pub organisation: String,
    #[serde(deserialize_with = "sub_events::deserialize")]
    pub sub_events: u8,
}

impl Event {
    /// Snapshot of this record as form input, e.g. to pre-fill an edit.
    pub fn to_input(&self) -> EventInput {
        EventInput {
            name: self.name.clone(),
            event_type: Some(self.event_type),
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description.clone(),
            handled_by: self.handled_by.clone(),
            organisation: self.organisation.clone(),
            sub_events: Some(i64::from(self.sub_events)),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Candidate values for an event, as collected from the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventInput {
    pub name: String,
    pub event_type: Option<EventType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub description: String,
    pub handled_by: String,
    pub organisation: String,
    pub sub_events: Option<i64>,
}

impl EventInput {
    /// Turn the input into a record with the given id.
    ///
    /// Only guards what the record's types cannot hold (a missing type, or a
    /// sub-event count outside `u8`), reporting it with the validation rules'
    /// own messages. Run the full rules first for a complete error map.
    pub fn into_event(self, id: String) -> Result<Event, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.event_type.is_none() {
            errors.insert(Field::Type, REQUIRED_MESSAGE);
        }
        let sub_events = match self.sub_events.map(u8::try_from) {
            Some(Ok(n)) => Some(n),
            Some(Err(_)) => {
                let message = validate_sub_events(self.sub_events).unwrap_or(REQUIRED_MESSAGE);
                errors.insert(Field::SubEvents, message);
                None
            }
            None => {
                errors.insert(Field::SubEvents, REQUIRED_MESSAGE);
                None
            }
        };

        match (self.event_type, sub_events) {
            (Some(event_type), Some(sub_events)) => Ok(Event {
                id,
                name: self.name,
                event_type,
                start_date: self.start_date,
                end_date: self.end_date,
                description: self.description,
                handled_by: self.handled_by,
                organisation: self.organisation,
                sub_events,
            }),
            _ => Err(errors),
        }
    }
}

/// Dates are written the way JavaScript's `toISOString` writes them
/// (`2025-03-20T00:00:00.000Z`) and read back from any RFC 3339 string.
/// `null`, a missing key and an empty string all read as `None`.
mod iso_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| D::Error::custom(format!("invalid date '{}': {}", s, e))),
        }
    }
}

/// Older files store the raw form value, so accept `2` as well as `"2"`.
mod sub_events {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u8, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => n,
            NumberOrText::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| D::Error::custom(format!("invalid sub-event count '{}'", s)))?,
        };
        u8::try_from(n).map_err(|_| D::Error::custom(format!("sub-event count {} out of range", n)))
    }
}
