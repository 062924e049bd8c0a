//! Config command handlers.

use anyhow::Result;
use liadmin_core::config::{Config, paths};

pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let path = paths::config_path();
    Config::init(&path)?;
    println!("Created {}", path.display());
    Ok(())
}

pub fn set_url(url: &str) -> Result<()> {
    Config::save_base_url(url)?;
    println!("Base URL set to {url}");
    Ok(())
}
