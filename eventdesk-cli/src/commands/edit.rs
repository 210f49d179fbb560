use anyhow::Result;
use eventdesk_core::EventDeskError;
use eventdesk_core::storage::KeyValueStorage;
use eventdesk_core::store::EventStore;
use owo_colors::OwoColorize;

use super::{
    EventFields, checked_event, prompt_missing, report_saved, resolve_id, today, validation_failure,
};
use crate::render::Render;

/// Edit an event. With no field flags every field is prompted for,
/// pre-filled with its current value.
pub fn run<S: KeyValueStorage>(store: &mut EventStore<S>, id: &str, fields: EventFields) -> Result<()> {
    let today = today();

    let id = resolve_id(store, id)?;
    let Some(current) = store.get(&id).cloned() else {
        anyhow::bail!("Event '{}' not found", id);
    };

    let mut input = current.to_input();
    fields.apply_to(&mut input)?;

    if fields.is_empty() {
        println!("{} {}", "Edit Event".bold(), current.render());
        prompt_missing(&mut input, &fields, today)?;
        println!();
    }

    let edited =
        checked_event(input, current.id.clone(), today).map_err(|errors| validation_failure(&errors))?;

    match store.update(edited, today) {
        Ok(Some(event)) => {
            report_saved(store, "Event updated successfully!");
            println!("  {}", event.render());
            Ok(())
        }
        Ok(None) => anyhow::bail!("Event '{}' not found", id),
        Err(EventDeskError::Validation(errors)) => Err(validation_failure(&errors)),
        Err(e) => Err(e.into()),
    }
}
