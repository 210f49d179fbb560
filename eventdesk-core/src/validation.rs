//! Validation rules for event input.
//!
//! Every check is a pure function. "Today" is passed in rather than read from
//! the clock so callers decide which calendar day counts as the present.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::event::{Event, EventInput};

pub const REQUIRED_MESSAGE: &str = "This field is required";

pub const TEXT_MIN_LEN: usize = 3;
pub const TEXT_MAX_LEN: usize = 50;

pub const SUB_EVENTS_MIN: i64 = 0;
pub const SUB_EVENTS_MAX: i64 = 5;

/// A field of an event record, named after its JSON key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Type,
    StartDate,
    EndDate,
    Description,
    HandledBy,
    Organisation,
    SubEvents,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Type => "type",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
            Field::Description => "description",
            Field::HandledBy => "handledBy",
            Field::Organisation => "organisation",
            Field::SubEvents => "subEvents",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field error messages. Empty means the input is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. A field keeps its first message.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Check that both dates are present, the start is not before `today`
/// (compared by calendar day), and the end is not before the start.
pub fn validate_date_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    today: NaiveDate,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match start {
        None => errors.insert(Field::StartDate, "Start date is required"),
        Some(s) if s.date_naive() < today => {
            errors.insert(Field::StartDate, "Start date cannot be in the past")
        }
        Some(_) => {}
    }

    match (start, end) {
        (_, None) => errors.insert(Field::EndDate, "End date is required"),
        (Some(s), Some(e)) if e < s => {
            errors.insert(Field::EndDate, "End date cannot be before the start date")
        }
        _ => {}
    }

    errors
}

/// Rules shared by `name`, `handledBy` and `organisation`.
/// Returns the first rule the value breaks.
pub fn validate_text_field(value: &str) -> Option<&'static str> {
    let len = value.chars().count();

    if value.trim().is_empty() {
        Some(REQUIRED_MESSAGE)
    } else if len < TEXT_MIN_LEN {
        Some("Minimum length is 3")
    } else if len > TEXT_MAX_LEN {
        Some("Maximum length is 50")
    } else if !value.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        Some("Name should not contain numbers or special characters")
    } else {
        None
    }
}

pub fn validate_sub_events(value: Option<i64>) -> Option<&'static str> {
    match value {
        None => Some(REQUIRED_MESSAGE),
        Some(n) if n < SUB_EVENTS_MIN => Some("Minimum value is 0"),
        Some(n) if n > SUB_EVENTS_MAX => Some("Maximum value is 5"),
        Some(_) => None,
    }
}

pub fn validate_required(value: &str) -> Option<&'static str> {
    value.trim().is_empty().then_some(REQUIRED_MESSAGE)
}

/// Run every rule against a candidate event.
pub fn validate_input(input: &EventInput, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let checks = [
        (Field::Name, validate_text_field(&input.name)),
        (Field::Type, input.event_type.is_none().then_some(REQUIRED_MESSAGE)),
        (Field::Description, validate_required(&input.description)),
        (Field::HandledBy, validate_text_field(&input.handled_by)),
        (Field::Organisation, validate_text_field(&input.organisation)),
        (Field::SubEvents, validate_sub_events(input.sub_events)),
    ];
    for (field, message) in checks {
        if let Some(message) = message {
            errors.insert(field, message);
        }
    }

    errors.merge(validate_date_range(input.start_date, input.end_date, today));
    errors
}

/// Run every rule against an existing record, e.g. before an update.
pub fn validate_event(event: &Event, today: NaiveDate) -> ValidationErrors {
    validate_input(&event.to_input(), today)
}
