pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod new;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;
use eventdesk_core::event::{Event, EventInput, EventType};
use eventdesk_core::storage::KeyValueStorage;
use eventdesk_core::store::EventStore;
use eventdesk_core::validation::{
    Field, ValidationErrors, validate_date_range, validate_input, validate_required,
    validate_sub_events, validate_text_field,
};
use owo_colors::OwoColorize;

use crate::render::{Render, format_date};
use crate::utils::dates::parse_date;
use crate::utils::prompt::{prompt_text, prompt_with_retry, select_event_type};

/// Event fields that can be given as flags instead of answered at a prompt.
#[derive(Args, Debug, Default, Clone)]
pub struct EventFields {
    /// Event name (letters and spaces, 3-50 characters)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Sports, Music, General, Children or School
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub event_type: Option<String>,

    /// Start date (YYYY-MM-DD, or e.g. "tomorrow")
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD, or e.g. "next friday")
    #[arg(short, long)]
    pub end: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Person handling the event
    #[arg(long)]
    pub handled_by: Option<String>,

    /// Organising body
    #[arg(short, long)]
    pub organisation: Option<String>,

    /// Number of sub-events (0-5)
    #[arg(long, allow_negative_numbers = true)]
    pub sub_events: Option<i64>,
}

impl EventFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.event_type.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.description.is_none()
            && self.handled_by.is_none()
            && self.organisation.is_none()
            && self.sub_events.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.name.is_some()
            && self.event_type.is_some()
            && self.start.is_some()
            && self.end.is_some()
            && self.description.is_some()
            && self.handled_by.is_some()
            && self.organisation.is_some()
            && self.sub_events.is_some()
    }

    /// Overlay the given flags onto `input`. Unparseable types or dates fail.
    pub fn apply_to(&self, input: &mut EventInput) -> Result<()> {
        if let Some(name) = &self.name {
            input.name = name.clone();
        }
        if let Some(t) = &self.event_type {
            input.event_type = Some(t.parse::<EventType>().map_err(|e| anyhow::anyhow!(e))?);
        }
        if let Some(s) = &self.start {
            input.start_date = Some(parse_date(s).map_err(|e| anyhow::anyhow!(e))?);
        }
        if let Some(e) = &self.end {
            input.end_date = Some(parse_date(e).map_err(|e| anyhow::anyhow!(e))?);
        }
        if let Some(description) = &self.description {
            input.description = description.clone();
        }
        if let Some(handled_by) = &self.handled_by {
            input.handled_by = handled_by.clone();
        }
        if let Some(organisation) = &self.organisation {
            input.organisation = organisation.clone();
        }
        if let Some(n) = self.sub_events {
            input.sub_events = Some(n);
        }
        Ok(())
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Ask for every field not given as a flag, offering the current value.
pub fn prompt_missing(input: &mut EventInput, given: &EventFields, today: NaiveDate) -> Result<()> {
    if given.name.is_none() {
        input.name = prompt_text("  Name", non_empty(&input.name), validate_text_field)?;
    }
    if given.event_type.is_none() {
        input.event_type = Some(select_event_type(input.event_type)?);
    }
    if given.start.is_none() {
        input.start_date = Some(prompt_with_retry(
            "  Start date",
            input.start_date.map(|d| format_date(Some(d))),
            |s| {
                let start = parse_date(s)?;
                match validate_date_range(Some(start), Some(start), today).get(Field::StartDate) {
                    Some(msg) => Err(msg.to_string()),
                    None => Ok(start),
                }
            },
        )?);
    }
    if given.end.is_none() {
        let start = input.start_date;
        input.end_date = Some(prompt_with_retry(
            "  End date",
            input.end_date.map(|d| format_date(Some(d))),
            |s| {
                let end = parse_date(s)?;
                match validate_date_range(start, Some(end), today).get(Field::EndDate) {
                    Some(msg) => Err(msg.to_string()),
                    None => Ok(end),
                }
            },
        )?);
    }
    if given.description.is_none() {
        input.description =
            prompt_text("  Description", non_empty(&input.description), validate_required)?;
    }
    if given.handled_by.is_none() {
        input.handled_by =
            prompt_text("  Handled by", non_empty(&input.handled_by), validate_text_field)?;
    }
    if given.organisation.is_none() {
        input.organisation =
            prompt_text("  Organisation", non_empty(&input.organisation), validate_text_field)?;
    }
    if given.sub_events.is_none() {
        input.sub_events = Some(prompt_with_retry(
            "  Sub-events (0-5)",
            input.sub_events.map(|n| n.to_string()),
            |s| {
                let n = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| "Enter a whole number".to_string())?;
                match validate_sub_events(Some(n)) {
                    Some(msg) => Err(msg.to_string()),
                    None => Ok(n),
                }
            },
        )?);
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Run the validation rules over `input`, then build the record under `id`.
pub fn checked_event(
    input: EventInput,
    id: String,
    today: NaiveDate,
) -> Result<Event, ValidationErrors> {
    let errors = validate_input(&input, today);
    if !errors.is_empty() {
        return Err(errors);
    }
    input.into_event(id)
}

/// Print field errors and turn them into the command's error.
pub fn validation_failure(errors: &ValidationErrors) -> anyhow::Error {
    eprintln!("{}", errors.render());
    anyhow::anyhow!(
        "Event not saved: {} invalid {}",
        errors.len(),
        if errors.len() == 1 { "field" } else { "fields" }
    )
}

/// Tell the user the change went through, and warn if it could not be saved.
pub fn report_saved<S: KeyValueStorage>(store: &mut EventStore<S>, message: &str) {
    println!("{}", message.green());

    if let Some(e) = store.take_persist_error() {
        eprintln!(
            "{}",
            format!("  Warning: {e}. The change is not on disk.").yellow()
        );
    }
}

/// Find the event an id argument refers to: an exact id, or a prefix
/// (such as the short id `list` prints) that matches exactly one event.
pub fn resolve_id<S: KeyValueStorage>(store: &EventStore<S>, id: &str) -> Result<String> {
    if store.get(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<&str> = store
        .events()
        .iter()
        .map(|e| e.id.as_str())
        .filter(|candidate| !id.is_empty() && candidate.starts_with(id))
        .collect();

    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => anyhow::bail!("Event '{}' not found", id),
        _ => anyhow::bail!("'{}' matches {} events, use more of the id", id, matches.len()),
    }
}
