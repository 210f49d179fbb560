use anyhow::Result;
use dialoguer::Confirm;
use eventdesk_core::storage::KeyValueStorage;
use eventdesk_core::store::EventStore;
use owo_colors::OwoColorize;

use super::{report_saved, resolve_id};

pub fn run<S: KeyValueStorage>(store: &mut EventStore<S>, id: &str, force: bool) -> Result<()> {
    let id = resolve_id(store, id)?;
    let Some(event) = store.get(&id) else {
        anyhow::bail!("Event '{}' not found", id);
    };

    // Confirm unless --force
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Do you want to delete '{}'?", event.name))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Nothing deleted".dimmed());
            return Ok(());
        }
    }

    store.delete(&id);
    report_saved(store, "Event deleted successfully!");

    Ok(())
}
