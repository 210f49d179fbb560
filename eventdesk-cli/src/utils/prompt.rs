//! Interactive prompts that re-ask until the answer passes a check.

use anyhow::Result;
use dialoguer::{Input, Select};
use eventdesk_core::event::EventType;
use owo_colors::OwoColorize;

/// Prompt the user with retry on parse or validation errors.
pub fn prompt_with_retry<T, F>(prompt: &str, default: Option<String>, parse: F) -> Result<T>
where
    F: Fn(&str) -> Result<T, String>,
{
    loop {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if let Some(default) = &default {
            input = input.default(default.clone());
        }

        let answer = input.interact_text()?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => eprintln!("  {}", e.red()),
        }
    }
}

/// Prompt for a text field, checking it with one of the validation rules.
pub fn prompt_text(
    prompt: &str,
    default: Option<&str>,
    check: fn(&str) -> Option<&'static str>,
) -> Result<String> {
    prompt_with_retry(prompt, default.map(str::to_string), |s| trimmed_answer(s, check))
}

/// Trim the answer, then check exactly what will be stored.
fn trimmed_answer(answer: &str, check: fn(&str) -> Option<&'static str>) -> Result<String, String> {
    let answer = answer.trim();
    match check(answer) {
        Some(msg) => Err(msg.to_string()),
        None => Ok(answer.to_string()),
    }
}

pub fn select_event_type(default: Option<EventType>) -> Result<EventType> {
    let items: Vec<&str> = EventType::ALL.iter().map(|t| t.as_str()).collect();
    let default_index = default
        .and_then(|d| EventType::ALL.iter().position(|t| *t == d))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("  Event type")
        .items(&items)
        .default(default_index)
        .interact()?;

    EventType::ALL
        .get(selection)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("No event type at position {}", selection))
}
