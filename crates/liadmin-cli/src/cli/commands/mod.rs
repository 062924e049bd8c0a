//! Command handlers.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod images;
pub mod payments;
pub mod users;

use std::future::Future;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use liadmin_core::api::ApiResult;
use liadmin_core::fetch::{FetchController, FetchState, Phase};

/// Builds an empty table with the shared preset and header row.
pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(headers.to_vec());
    table
}

/// Drives a one-shot fetch through its full lifecycle.
///
/// Every page command funnels its call through here so the
/// Idle→Loading→Success|Error transitions are the same everywhere; an
/// error resolves to the view-local message the backend supplied.
pub async fn fetch_once<T, Fut>(fetch: Fut) -> Result<T>
where
    Fut: Future<Output = ApiResult<T>>,
{
    let mut controller = FetchController::<T, ()>::new();
    let ticket = controller.start(()).context("fetch already started")?;
    controller.on_resolve(ticket, fetch.await);

    match controller.into_state() {
        FetchState {
            phase: Phase::Success,
            payload: Some(data),
            ..
        } => Ok(data),
        FetchState {
            error: Some(message),
            ..
        } => Err(anyhow::anyhow!(message)),
        _ => Err(anyhow::anyhow!("fetch finished in an unexpected state")),
    }
}

/// Asks the user to confirm a destructive action.
///
/// Returns true when confirmed. Anything but `y`/`yes` declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("flush prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Reads one line from stdin after printing a prompt.
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush().context("flush prompt")?;

    let mut value = String::new();
    io::stdin()
        .lock()
        .read_line(&mut value)
        .context("read input")?;

    Ok(value.trim().to_string())
}
