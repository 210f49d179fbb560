//! TUI rendering traits for eventdesk types.
//!
//! Extension traits that add colored terminal rendering to eventdesk-core
//! types using owo_colors.

use chrono::{DateTime, Utc};
use eventdesk_core::event::{Event, EventType};
use eventdesk_core::validation::ValidationErrors;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventType {
    fn render(&self) -> String {
        let tag = format!("[{}]", self);
        match self {
            EventType::Sports => tag.green().to_string(),
            EventType::Music => tag.magenta().to_string(),
            EventType::General => tag.blue().to_string(),
            EventType::Children => tag.yellow().to_string(),
            EventType::School => tag.cyan().to_string(),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.name.bold(),
            self.event_type.render(),
            render_date_range(self.start_date, self.end_date).dimmed()
        )
    }
}

impl Render for ValidationErrors {
    fn render(&self) -> String {
        self.iter()
            .map(|(field, msg)| format!("  {} {}", format!("{}:", field).dimmed(), msg.red()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Full multi-line view of an event, used by `list`.
pub fn render_event_details(event: &Event) -> Vec<String> {
    vec![
        event.render(),
        format!("   {} {}", "id:".dimmed(), event.id.dimmed()),
        format!("   {}", event.description),
        format!(
            "   {} {}, {}",
            "Handled by".dimmed(),
            event.handled_by,
            event.organisation
        ),
        format!("   {} {}", "Sub-events:".dimmed(), event.sub_events),
    ]
}

pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn render_date_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let start = format_date(start);
    let end = format_date(end);

    if start == end {
        start
    } else {
        format!("{} → {}", start, end)
    }
}
