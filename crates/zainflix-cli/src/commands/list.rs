use clap::ValueEnum;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use dialoguer::Confirm;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use zainflix_catalog::{CatalogClient, RequestGeneration};
use zainflix_models::WatchListEntry;
use zainflix_store::{sort_entries, Page, SortOrder, StoreChange, StoreWatcher, ToggleOutcome};

use crate::commands::{require_page, AppContext};
use crate::output::{Output, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Alphabetical,
    Rating,
    Year,
    Recent,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Alphabetical => SortOrder::Alphabetical,
            SortArg::Rating => SortOrder::Rating,
            SortArg::Year => SortOrder::Year,
            SortArg::Recent => SortOrder::Recent,
        }
    }
}

/// Refreshes stored entries against the catalog. Every entry that resolves
/// gets its movie fields replaced wholesale by the detail response while the
/// added stamps are kept; entries that fail to resolve keep their stored
/// snapshot.
async fn refresh_entries(
    catalog: &CatalogClient,
    entries: Vec<WatchListEntry>,
    progress: bool,
) -> Vec<WatchListEntry> {
    let bar = if progress && !entries.is_empty() {
        let bar = ProgressBar::new(entries.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{spinner} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        bar.set_message("Refreshing list details");
        Some(bar)
    } else {
        None
    };

    let futures = entries.into_iter().map(|entry| {
        let bar = bar.clone();
        async move {
            let refreshed = match catalog.movie_details(entry.movie.id).await {
                Ok(details) => WatchListEntry {
                    movie: details,
                    added_at: entry.added_at,
                    added_from: entry.added_from.clone(),
                },
                Err(e) => {
                    warn!("Keeping stored snapshot for {}: {}", entry.movie.id, e);
                    entry
                }
            };
            if let Some(bar) = &bar {
                bar.inc(1);
            }
            refreshed
        }
    });
    let refreshed = join_all(futures).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    refreshed
}

fn render_entries(entries: &[WatchListEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Year", "Score", "Added", "From"]);
    for entry in entries {
        let year = entry
            .movie
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(entry.movie.id),
            Cell::new(entry.movie.display_title()),
            Cell::new(year),
            Cell::new(format!("{:.1}", entry.movie.score())),
            Cell::new(entry.added_at.format("%Y-%m-%d").to_string()),
            Cell::new(&entry.added_from),
        ]);
    }
    table.to_string()
}

async fn load_sorted(
    ctx: &AppContext,
    catalog: Option<&CatalogClient>,
    order: SortOrder,
    progress: bool,
) -> Vec<WatchListEntry> {
    let entries = ctx.lists.list();
    let mut entries = match catalog {
        Some(catalog) => refresh_entries(catalog, entries, progress).await,
        None => entries,
    };
    sort_entries(&mut entries, order);
    entries
}

fn show_once(ctx: &AppContext, output: &Output, entries: &[WatchListEntry]) -> Result<()> {
    if output.format() != OutputFormat::Human {
        output.json(&serde_json::to_value(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        output.info("Your list is empty. Add something with `zainflix list add <movie-id>`.");
        return Ok(());
    }
    let scope = ctx.lists.scope_key().unwrap_or_default();
    output.println(format!("My List ({} items, scope {})", entries.len(), scope));
    output.println(render_entries(entries));
    Ok(())
}

/// Whether a finished refresh may still be rendered. A change observed while
/// its fetch was in flight begins a new generation, staling the ticket; the
/// caller refetches instead of rendering.
fn refresh_still_current(
    generation: &RequestGeneration,
    ticket: zainflix_catalog::Ticket,
    changed_during_fetch: bool,
) -> bool {
    if changed_during_fetch {
        generation.begin();
    }
    generation.is_current(ticket)
}

pub async fn run_show(ctx: &AppContext, output: &Output, sort: SortArg, watch: bool) -> Result<()> {
    if !require_page(&ctx.session, Page::MyList, output) {
        return Ok(());
    }
    let order = SortOrder::from(sort);

    // Without a configured catalog we still render the stored snapshots
    let catalog = match ctx.catalog() {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            debug!("Rendering stored entries only: {}", e);
            output.info("Catalog not configured; showing stored details.");
            None
        }
    };

    let entries = load_sorted(ctx, catalog.as_ref(), order, !watch).await;
    show_once(ctx, output, &entries)?;

    if !watch {
        return Ok(());
    }

    // Watch mode: poll the store for changes made by another process and
    // re-render. Each refresh takes a ticket; a change observed while the
    // detail fetch was in flight supersedes the ticket, so a refresh never
    // renders state older than what the watcher has already seen.
    let mut watcher = StoreWatcher::new(std::sync::Arc::clone(&ctx.store));
    watcher.poll(); // baseline
    let generation = RequestGeneration::new();
    let mut notices = ctx.notifications();
    let mut interval =
        tokio::time::interval(Duration::from_secs(ctx.config.ui.poll_interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    output.info("Watching for changes; press Ctrl-C to stop.");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                output.info("Stopped watching.");
                return Ok(());
            }
            _ = interval.tick() => {
                notices.sweep(Instant::now());
                if watcher.poll() != StoreChange::Changed {
                    continue;
                }
                loop {
                    let ticket = generation.begin();
                    let entries = load_sorted(ctx, catalog.as_ref(), order, false).await;
                    let changed_during_fetch = watcher.poll() == StoreChange::Changed;
                    if !refresh_still_current(&generation, ticket, changed_during_fetch) {
                        debug!("Dropping stale list refresh");
                        continue;
                    }
                    notices.info("Stored state changed in another window; refreshed.");
                    show_once(ctx, output, &entries)?;
                    notices.flush(output);
                    break;
                }
            }
        }
    }
}

pub async fn run_add(ctx: &AppContext, output: &Output, movie_id: u64) -> Result<()> {
    if !require_page(&ctx.session, Page::MyList, output) {
        return Ok(());
    }
    let mut notices = ctx.notifications();

    if ctx.lists.is_present(movie_id) {
        notices.info("Already in your list.");
        notices.flush(output);
        return Ok(());
    }

    let catalog = ctx.catalog()?;
    let movie = match catalog.movie_details(movie_id).await {
        Ok(movie) => movie,
        Err(e) => {
            notices.error(format!("Could not load movie {}: {}", movie_id, e));
            notices.flush(output);
            return Ok(());
        }
    };

    let title = movie.display_title().to_string();
    if ctx.lists.add(movie, "cli") {
        notices.success(format!("{} added to My List.", title));
    } else {
        notices.error("Error updating My List.");
    }
    notices.flush(output);
    Ok(())
}

pub fn run_remove(ctx: &AppContext, output: &Output, movie_id: u64) -> Result<()> {
    if !require_page(&ctx.session, Page::MyList, output) {
        return Ok(());
    }
    let mut notices = ctx.notifications();

    let title = ctx
        .lists
        .list()
        .iter()
        .find(|e| e.movie.id == movie_id)
        .map(|e| e.movie.display_title().to_string());

    match title {
        Some(title) if ctx.lists.remove(movie_id) => {
            notices.success(format!("{} removed from My List.", title));
        }
        Some(_) => {
            notices.error("Error updating My List.");
        }
        None => {
            notices.info(format!("Movie {} is not in your list.", movie_id));
        }
    }
    notices.flush(output);
    Ok(())
}

pub async fn run_toggle(ctx: &AppContext, output: &Output, movie_id: u64) -> Result<()> {
    if !require_page(&ctx.session, Page::MyList, output) {
        return Ok(());
    }
    let mut notices = ctx.notifications();

    // The stored entry already has the movie when it is present; a fetch is
    // only needed for the add half of the toggle
    let movie = match ctx
        .lists
        .list()
        .into_iter()
        .find(|e| e.movie.id == movie_id)
    {
        Some(entry) => entry.movie,
        None => {
            let catalog = ctx.catalog()?;
            match catalog.movie_details(movie_id).await {
                Ok(movie) => movie,
                Err(e) => {
                    notices.error(format!("Could not load movie {}: {}", movie_id, e));
                    notices.flush(output);
                    return Ok(());
                }
            }
        }
    };

    let title = movie.display_title().to_string();
    match ctx.lists.toggle(movie, "cli") {
        ToggleOutcome::Added => notices.success(format!("{} added to My List.", title)),
        ToggleOutcome::Removed => notices.success(format!("{} removed from My List.", title)),
        ToggleOutcome::Error => notices.error("Error updating My List."),
    };
    notices.flush(output);
    Ok(())
}

pub fn run_clear(ctx: &AppContext, output: &Output, yes: bool) -> Result<()> {
    if !require_page(&ctx.session, Page::MyList, output) {
        return Ok(());
    }
    let mut notices = ctx.notifications();

    let count = ctx.lists.list().len();
    if count == 0 {
        notices.info("Your list is already empty.");
        notices.flush(output);
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Clear all {} items from your list?", count))
            .default(false)
            .interact()?;
        if !confirmed {
            output.info("Aborted.");
            return Ok(());
        }
    }

    if ctx.lists.clear() {
        notices.success(format!("Cleared {} items from My List.", count));
    } else {
        notices.error("Error updating My List.");
    }
    notices.flush(output);
    Ok(())
}

/// Prints the active list as a portable JSON document on stdout.
pub fn run_export(ctx: &AppContext, output: &Output) -> Result<()> {
    if !require_page(&ctx.session, Page::MyList, output) {
        return Ok(());
    }
    let Some(export) = ctx.lists.export() else {
        output.error("Not signed in.");
        return Ok(());
    };
    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}
