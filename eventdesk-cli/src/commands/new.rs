use anyhow::Result;
use eventdesk_core::EventDeskError;
use eventdesk_core::event::EventInput;
use eventdesk_core::storage::KeyValueStorage;
use eventdesk_core::store::EventStore;
use owo_colors::OwoColorize;

use super::{EventFields, prompt_missing, report_saved, today, validation_failure};
use crate::render::Render;

pub fn run<S: KeyValueStorage>(store: &mut EventStore<S>, fields: EventFields) -> Result<()> {
    let today = today();
    let interactive = !fields.is_complete();

    let mut input = EventInput::default();
    fields.apply_to(&mut input)?;

    if interactive {
        println!("{}", "Add Event".bold());
        prompt_missing(&mut input, &fields, today)?;
        println!();
    }

    match store.add(input, today) {
        Ok(event) => {
            report_saved(store, "Event added successfully!");
            println!("  {}", event.render());
            Ok(())
        }
        Err(EventDeskError::Validation(errors)) => Err(validation_failure(&errors)),
        Err(e) => Err(e.into()),
    }
}
