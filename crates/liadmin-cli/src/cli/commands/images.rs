//! Image command handlers.
//!
//! The listing commands page through the backend 10 rows at a time and
//! optionally keep refreshing (`--watch`) until Ctrl-C, bumping the
//! cache-bust counter appended to image URLs on every refresh, as the
//! web console does.

use anyhow::{Context, Result};
use liadmin_core::api::types::{
    OriginalImage, OriginalImagePage, RegeneratedImage, RegeneratedImagePage, total_pages,
};
use liadmin_core::api::{ApiClient, ApiResult};
use liadmin_core::config::Config;
use liadmin_core::fetch::{FetchController, Phase, RefreshTicker, bust_url};
use liadmin_core::table::apply_search;

use super::{confirm, fetch_once, table};

pub async fn original(
    client: &ApiClient,
    config: &Config,
    page: u64,
    search: Option<&str>,
    watch: bool,
) -> Result<()> {
    run_listing(
        client,
        config,
        page,
        search,
        watch,
        async |page| client.original_images(page).await,
        render_original_page,
    )
    .await
}

pub async fn regenerated(
    client: &ApiClient,
    config: &Config,
    page: u64,
    search: Option<&str>,
    watch: bool,
) -> Result<()> {
    run_listing(
        client,
        config,
        page,
        search,
        watch,
        async |page| client.regenerated_images(page).await,
        render_regenerated_page,
    )
    .await
}

/// Shared listing loop for both image kinds.
///
/// One fetch when not watching; with `--watch`, the controller is
/// restarted every tick and the ticker's counter busts the image URLs.
/// The ticker is cancelled on Ctrl-C and on drop, so no interval
/// survives this function.
async fn run_listing<P, F, R>(
    client: &ApiClient,
    config: &Config,
    page: u64,
    search: Option<&str>,
    watch: bool,
    fetch: F,
    render: R,
) -> Result<()>
where
    F: AsyncFn(u64) -> ApiResult<P>,
    R: Fn(&P, Option<&str>, u64),
{
    let mut controller = FetchController::<P, (u64, u64)>::new();

    let ticket = controller
        .start((page, 0))
        .context("fetch already started")?;
    controller.on_resolve(ticket, fetch(page).await);

    match controller.state() {
        state if state.phase == Phase::Success => {
            let payload = state.payload.as_ref().context("missing payload")?;
            render(payload, search, 0);
        }
        state => {
            let message = state.error.clone().unwrap_or_default();
            anyhow::bail!(message);
        }
    }

    if !watch {
        return Ok(());
    }

    let mut ticker = RefreshTicker::new(config.refresh_interval());
    let cancel = ticker.cancel_token();
    ctrlc::set_handler(move || cancel.cancel()).context("set Ctrl+C handler")?;
    println!("Watching (Ctrl-C to stop)…");

    while let Some(count) = ticker.tick().await {
        if let Some(ticket) = controller.start((page, count)) {
            controller.on_resolve(ticket, fetch(page).await);
        }

        let state = controller.state();
        match state.phase {
            Phase::Success => {
                let stamp = chrono::Local::now().format("%H:%M:%S");
                println!("\nRefreshed at {stamp}");
                if let Some(payload) = state.payload.as_ref() {
                    render(payload, search, count);
                }
            }
            _ => {
                // Inline, dismissed by the next successful refresh
                let message = state.error.clone().unwrap_or_default();
                eprintln!("Refresh failed: {message}");
                // A 401 cleared the store; stop instead of hammering it
                if !client.store().get().is_authenticated() {
                    break;
                }
            }
        }
    }

    println!("Stopped watching.");
    Ok(())
}

fn render_original_page(page: &OriginalImagePage, search: Option<&str>, count: u64) {
    let mut images = page.results.images.clone();
    apply_search(&mut images, search.unwrap_or(""));

    let mut out = table(&["ID", "User", "Name", "Prompt", "Created", "URL"]);
    for image in &images {
        out.add_row(vec![
            format!("#{}", image.original_image_id),
            image.user.clone(),
            image.original_image_name.clone(),
            truncate(&image.prompt, 40),
            image.created.clone(),
            image_link(&image.original_image, count),
        ]);
    }
    println!("{out}");
    print_page_line(images.len(), page.count);
}

fn render_regenerated_page(page: &RegeneratedImagePage, search: Option<&str>, count: u64) {
    let mut images = page.results.images.clone();
    apply_search(&mut images, search.unwrap_or(""));

    let mut out = table(&["ID", "Original", "User", "Created", "Regenerated at", "URL"]);
    for image in &images {
        out.add_row(vec![
            format!("#{}", image.regenerated_image_id),
            format!("#{}", image.original_image_id),
            image.user.clone(),
            image.created.clone(),
            image.regenerated_at.clone(),
            image_link(&image.regenerated_image, count),
        ]);
    }
    println!("{out}");
    print_page_line(images.len(), page.count);
}

fn print_page_line(shown: usize, count: u64) {
    println!("{shown} image(s) shown, {count} total, {} page(s)", total_pages(count));
}

/// Image URL with the cache-bust counter applied after the first refresh.
fn image_link(url: &str, count: u64) -> String {
    if url.is_empty() {
        return String::new();
    }
    if count == 0 {
        return url.to_string();
    }
    bust_url(url, count)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}…")
    }
}

/// Fetches the original/regenerated pair concurrently, like the web
/// console's side-by-side view.
pub async fn show(
    client: &ApiClient,
    original_id: u64,
    regenerated_id: u64,
    open_urls: bool,
) -> Result<()> {
    let (original, regenerated) = tokio::join!(
        client.one_original(original_id),
        client.one_regenerated(regenerated_id),
    );
    let original = original.map_err(anyhow::Error::new).context("fetch original image")?;
    let regenerated = regenerated
        .map_err(anyhow::Error::new)
        .context("fetch regenerated image")?;

    print_original(&original);
    println!();
    print_regenerated(&regenerated);

    if open_urls {
        if !original.original_image.is_empty() {
            open::that(&original.original_image).context("open original image URL")?;
        }
        open::that(&regenerated.regenerated_image).context("open regenerated image URL")?;
    }
    Ok(())
}

fn print_original(image: &OriginalImage) {
    println!("Original image #{}", image.original_image_id);
    println!("  Name: {}", image.original_image_name);
    println!("  User: {}", image.user);
    println!("  Created: {}", image.created);
    if image.original_image.is_empty() {
        // Prompt-only entries have no hosted file
        println!("  Prompt: {}", image.prompt);
    } else {
        println!("  URL: {}", image.original_image);
        if !image.prompt.is_empty() {
            println!("  Prompt: {}", image.prompt);
        }
    }
    if let Some(tag) = &image.tag {
        println!("  Tag: {tag}");
    }
    if let Some(description) = &image.description {
        println!("  Description: {description}");
    }
    if let Some(public) = image.public {
        println!("  Public: {}", if public { "Yes" } else { "No" });
    }
    if let Some(at) = &image.regenerated_at {
        println!("  Regenerated at: {at}");
    }
    if let Some(at) = &image.next_regeneration_at {
        println!("  Next regeneration: {at}");
    }
}

fn print_regenerated(image: &RegeneratedImage) {
    println!("Regenerated image #{}", image.regenerated_image_id);
    println!("  From original: #{}", image.original_image_id);
    println!("  User: {}", image.user);
    println!("  Created: {}", image.created);
    println!("  Regenerated at: {}", image.regenerated_at);
    println!("  URL: {}", image.regenerated_image);
}

pub async fn delete(client: &ApiClient, ids: &[u64], yes: bool) -> Result<()> {
    let listed = ids
        .iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ");
    if !yes && !confirm(&format!("Are you sure you want to delete image(s) {listed}?"))? {
        println!("Aborted.");
        return Ok(());
    }

    fetch_once(client.delete_images(ids)).await.context("delete images")?;
    println!("Image deleted successfully");
    Ok(())
}
