use color_eyre::Result;
use rand::seq::SliceRandom;
use serde_json::Value;
use zainflix_catalog::{select_best_video, CatalogClient};
use zainflix_models::{Movie, Video, WatchListEntry};
use zainflix_store::Page;

use crate::commands::{require_page, AppContext};
use crate::output::{Output, OutputFormat};

/// The payload handed to the player page: the movie document with the chosen
/// video's fields merged over it, so the player sees one flat object with
/// `key` and `site` alongside the title and artwork.
fn player_payload(movie: &Movie, video: &Video) -> Result<Value> {
    let mut payload = serde_json::to_value(movie)?;
    let video_fields = serde_json::to_value(video)?;
    if let (Value::Object(payload), Value::Object(video_fields)) = (&mut payload, video_fields) {
        for (key, value) in video_fields {
            payload.insert(key, value);
        }
    }
    Ok(payload)
}

fn player_url(page_url: &str, payload: &Value) -> String {
    format!("{}?data={}", page_url, urlencoding::encode(&payload.to_string()))
}

/// Random pick for shuffle play; None when the list is empty.
fn pick_random(entries: &[WatchListEntry]) -> Option<&WatchListEntry> {
    entries.choose(&mut rand::thread_rng())
}

/// Fetches the title's videos, picks the best one, and prints the player
/// URL. No video at all is an expected outcome, not an error.
async fn play_resolved(
    ctx: &AppContext,
    output: &Output,
    catalog: &CatalogClient,
    movie: Movie,
) -> Result<()> {
    let videos = catalog.videos(movie.id).await;
    let mut notices = ctx.notifications();
    let Some(video) = select_best_video(&videos) else {
        notices.info(format!(
            "No video available for {}.",
            movie.display_title()
        ));
        notices.flush(output);
        return Ok(());
    };

    let payload = player_payload(&movie, video)?;
    let url = player_url(&ctx.config.player.page_url, &payload);

    if output.format() != OutputFormat::Human {
        output.json(&serde_json::json!({
            "movie": movie.display_title(),
            "video": video,
            "url": url,
        }));
        return Ok(());
    }

    notices.success(format!(
        "Playing {} ({} {} on {})",
        movie.display_title(),
        video.kind.as_deref().unwrap_or("video"),
        video.key.as_deref().unwrap_or(""),
        video.site.as_deref().unwrap_or("unknown site"),
    ));
    notices.flush(output);
    output.println(url);
    Ok(())
}

/// Resolves the best available video for one title by id.
pub async fn run_play(ctx: &AppContext, output: &Output, movie_id: u64) -> Result<()> {
    if !require_page(&ctx.session, Page::Home, output) {
        return Ok(());
    }
    let catalog = ctx.catalog()?;

    let movie = match catalog.movie_details(movie_id).await {
        Ok(movie) => movie,
        Err(e) => {
            output.error(format!("Could not load movie {}: {}", movie_id, e));
            return Ok(());
        }
    };
    play_resolved(ctx, output, &catalog, movie).await
}

/// Shuffle play: a random title from the active list. The stored record is
/// played as-is; only its videos are fetched.
pub async fn run_shuffle(ctx: &AppContext, output: &Output) -> Result<()> {
    if !require_page(&ctx.session, Page::MyList, output) {
        return Ok(());
    }

    let entries = ctx.lists.list();
    let Some(entry) = pick_random(&entries) else {
        let mut notices = ctx.notifications();
        notices.info("No items in your list to shuffle.");
        notices.flush(output);
        return Ok(());
    };

    let catalog = ctx.catalog()?;
    play_resolved(ctx, output, &catalog, entry.movie.clone()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: u64) -> WatchListEntry {
        WatchListEntry {
            movie: Movie::new(id),
            added_at: Utc::now(),
            added_from: "test".to_string(),
        }
    }

    #[test]
    fn test_payload_merges_video_over_movie() {
        let mut movie = Movie::new(603);
        movie.title = Some("The Matrix".to_string());
        movie.name = Some("overridden by nothing".to_string());
        let video = Video::new("Trailer", "YouTube", "abc123");

        let payload = player_payload(&movie, &video).unwrap();
        assert_eq!(payload["id"], 603);
        assert_eq!(payload["title"], "The Matrix");
        assert_eq!(payload["key"], "abc123");
        assert_eq!(payload["site"], "YouTube");
        assert_eq!(payload["type"], "Trailer");
    }

    #[test]
    fn test_player_url_percent_encodes_payload() {
        let payload = serde_json::json!({"id": 1, "title": "A & B"});
        let url = player_url("video-player.html", &payload);
        assert!(url.starts_with("video-player.html?data=%7B"));
        assert!(!url.contains('{'));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_shuffle_pick_from_empty_list_is_none() {
        // The command turns this into the "No items in your list to shuffle"
        // notice without touching the catalog
        assert!(pick_random(&[]).is_none());
    }

    #[test]
    fn test_shuffle_pick_is_a_list_member() {
        let entries = vec![entry(1), entry(2), entry(3)];
        let picked = pick_random(&entries).unwrap();
        assert!(entries.iter().any(|e| e.movie.id == picked.movie.id));

        let single = vec![entry(42)];
        assert_eq!(pick_random(&single).unwrap().movie.id, 42);
    }
}
