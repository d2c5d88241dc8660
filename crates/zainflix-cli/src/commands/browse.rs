use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use tracing::warn;
use zainflix_models::Movie;
use zainflix_store::Page;

use crate::commands::{require_page, AppContext};
use crate::output::{Output, OutputFormat};

/// The catalog rows of the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Trending,
    Movies,
    Tv,
    NowPlaying,
    Genre(u32),
}

impl Section {
    fn label(&self) -> String {
        match self {
            Section::Trending => "Trending this week".to_string(),
            Section::Movies => "Popular movies".to_string(),
            Section::Tv => "Popular shows".to_string(),
            Section::NowPlaying => "Now playing".to_string(),
            Section::Genre(id) => format!("Genre {}", id),
        }
    }
}

pub async fn run_browse(ctx: &AppContext, output: &Output, section: Section) -> Result<()> {
    if !require_page(&ctx.session, Page::Home, output) {
        return Ok(());
    }
    let catalog = ctx.catalog()?;

    let fetched = match section {
        Section::Trending => catalog.trending().await,
        Section::Movies => catalog.popular_movies().await,
        Section::Tv => catalog.popular_tv().await,
        Section::NowPlaying => catalog.now_playing().await,
        Section::Genre(id) => catalog.discover_by_genre(id).await,
    };

    // A failed row degrades to an empty one instead of aborting the command
    let movies = match fetched {
        Ok(movies) => movies,
        Err(e) => {
            warn!("Catalog fetch failed: {}", e);
            output.warn(format!("Catalog unavailable: {}", e));
            Vec::new()
        }
    };

    if output.format() != OutputFormat::Human {
        output.json(&serde_json::to_value(&movies)?);
        return Ok(());
    }

    output.println(section.label());
    if movies.is_empty() {
        output.info("Nothing to show.");
        return Ok(());
    }
    output.println(render_movies(&movies, ctx));
    Ok(())
}

pub async fn run_details(ctx: &AppContext, output: &Output, movie_id: u64) -> Result<()> {
    if !require_page(&ctx.session, Page::Home, output) {
        return Ok(());
    }
    let catalog = ctx.catalog()?;

    let movie = match catalog.movie_details(movie_id).await {
        Ok(movie) => movie,
        Err(e) => {
            output.error(format!("Could not load details for {}: {}", movie_id, e));
            return Ok(());
        }
    };

    if output.format() != OutputFormat::Human {
        output.json(&serde_json::to_value(&movie)?);
        return Ok(());
    }

    output.println(format!("{} (id {})", movie.display_title(), movie.id));
    if let Some(year) = movie.release_year() {
        output.println(format!("Year:    {}", year));
    }
    output.println(format!("Score:   {:.1}", movie.score()));
    if let Some(runtime) = movie.runtime {
        output.println(format!("Runtime: {} min", runtime));
    }
    if let Some(genres) = &movie.genres {
        let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
        output.println(format!("Genres:  {}", names.join(", ")));
    }
    if let Some(overview) = &movie.overview {
        output.println("");
        output.println(overview);
    }
    if ctx.lists.is_present(movie.id) {
        output.println("");
        output.info("This title is in your list.");
    }
    Ok(())
}

/// Shared catalog table: a membership marker, id, title, year, and score.
pub fn render_movies(movies: &[Movie], ctx: &AppContext) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "ID", "Title", "Year", "Score"]);
    for movie in movies {
        let in_list = if ctx.lists.is_present(movie.id) { "✓" } else { "" };
        let year = movie
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(in_list),
            Cell::new(movie.id),
            Cell::new(movie.display_title()),
            Cell::new(year),
            Cell::new(format!("{:.1}", movie.score())),
        ]);
    }
    table.to_string()
}
