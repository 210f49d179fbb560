use anyhow::Result;
use eventdesk_core::storage::KeyValueStorage;
use eventdesk_core::store::EventStore;
use owo_colors::OwoColorize;

use crate::render::{Render, render_event_details};

pub fn run<S: KeyValueStorage>(store: &EventStore<S>, verbose: bool) -> Result<()> {
    if store.is_empty() {
        println!("{}", "No events yet".dimmed());
        return Ok(());
    }

    for (i, event) in store.events().iter().enumerate() {
        if verbose {
            if i > 0 {
                println!();
            }
            for line in render_event_details(event) {
                println!("{}", line);
            }
        } else {
            println!("{} {}", short_id(&event.id).dimmed(), event.render());
        }
    }

    Ok(())
}

/// First block of a UUID, enough to tell events apart in a listing.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_takes_first_uuid_block() {
        assert_eq!(short_id("1b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed"), "1b9d6bcd");
        assert_eq!(short_id("plain"), "plain");
    }
}
