use anyhow::Result;
use eventdesk_core::desk::EventDesk;
use eventdesk_core::desk_config::DeskConfig;
use owo_colors::OwoColorize;

pub fn run(desk: &EventDesk) -> Result<()> {
    let config_path = DeskConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", desk.display_path().display());
    println!("  Events:  {}", desk.events_file().display());

    Ok(())
}
