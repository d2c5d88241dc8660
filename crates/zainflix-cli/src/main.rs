use clap::{ArgAction, Parser, Subcommand};
use commands::{auth, browse, list, play, profile, AppContext};

mod commands;
mod logging;
mod notify;
mod output;

#[derive(Parser)]
#[command(name = "zainflix")]
#[command(about = "ZainFlix - Browse the catalog and keep per-profile watch lists")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with an email address
    #[command(long_about = "Sign in to ZainFlix. This is a demo account system: any email and password pair is accepted, and the email identifies whose profiles and watch lists are used.")]
    Login {
        /// Email address to sign in with
        #[arg(long)]
        email: String,

        /// Keep the session across restarts
        #[arg(long, action = ArgAction::SetTrue)]
        remember: bool,
    },
    /// Sign out of the current session
    #[command(long_about = "Sign out. The session, selected profile, and remember flag are cleared; watch lists are kept and reappear on the next sign-in with the same email.")]
    Logout,
    /// Show the current session and profile
    Whoami,
    /// Manage viewing profiles
    #[command(long_about = "Manage the viewing profiles of the signed-in account: the built-in set plus your own custom profiles. Deleting a profile hides it for your account without destroying anything.")]
    Profile {
        #[command(subcommand)]
        cmd: ProfileCommands,
    },
    /// Browse a catalog section
    #[command(long_about = "Browse the catalog rows of the home page: trending titles, popular movies and shows, what's now playing, or a genre. Requires a signed-in session with a selected profile.")]
    Browse {
        #[command(subcommand)]
        cmd: BrowseCommands,
    },
    /// Show full details for one title
    Details {
        /// Catalog id of the title
        movie_id: u64,
    },
    /// Manage the active profile's watch list
    #[command(long_about = "Manage My List for the active profile. Lists are scoped per email and profile, so switching profiles switches lists.")]
    List {
        #[command(subcommand)]
        cmd: ListCommands,
    },
    /// Resolve the best video for a title and print its player URL
    #[command(long_about = "Pick the best available video for a title (trailers beat teasers beat clips beat featurettes, YouTube beats Vimeo) and print the player page URL carrying the merged movie and video payload.")]
    Play {
        /// Catalog id of the title
        movie_id: u64,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// List the profiles available to this account
    List,
    /// Create or update a custom profile
    Create {
        /// Profile name
        name: String,

        /// Theme color as #rrggbb
        #[arg(long, default_value = "#f000ff")]
        color: String,

        /// Icon name
        #[arg(long, default_value = "person")]
        icon: String,
    },
    /// Hide a profile from this account
    Delete {
        /// Profile name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Make a profile the active one
    Switch {
        /// Profile name
        name: String,
    },
}

#[derive(Subcommand)]
enum BrowseCommands {
    /// Trending titles this week
    Trending,
    /// Popular movies
    Movies,
    /// Popular shows
    Tv,
    /// Now playing in theaters
    NowPlaying,
    /// Discover movies by genre id
    Genre {
        /// Catalog genre id
        genre_id: u32,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// Show the active profile's list
    Show {
        /// Sort order
        #[arg(long, default_value = "recent", value_enum)]
        sort: list::SortArg,

        /// Keep running and re-render when the session changes elsewhere
        #[arg(long, action = ArgAction::SetTrue)]
        watch: bool,
    },
    /// Add a title to the list
    Add {
        /// Catalog id of the title
        movie_id: u64,
    },
    /// Remove a title from the list
    Remove {
        /// Catalog id of the title
        movie_id: u64,
    },
    /// Add the title if absent, remove it if present
    Toggle {
        /// Catalog id of the title
        movie_id: u64,
    },
    /// Play a random title from the list
    #[command(long_about = "Pick a random title from the active profile's list, resolve its best available video, and print the player URL. Reports an info notice when the list is empty or no video qualifies.")]
    Shuffle,
    /// Remove every title from the list
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Print the list as a portable JSON document
    Export,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let ctx = AppContext::init()?;

    match cli.command {
        Commands::Login { email, remember } => auth::run_login(&ctx, &output, &email, remember),
        Commands::Logout => auth::run_logout(&ctx, &output),
        Commands::Whoami => auth::run_whoami(&ctx, &output),
        Commands::Profile { cmd } => match cmd {
            ProfileCommands::List => profile::run_list(&ctx, &output),
            ProfileCommands::Create { name, color, icon } => {
                profile::run_create(&ctx, &output, &name, &color, &icon)
            }
            ProfileCommands::Delete { name, yes } => {
                profile::run_delete(&ctx, &output, &name, yes)
            }
            ProfileCommands::Switch { name } => profile::run_switch(&ctx, &output, &name),
        },
        Commands::Browse { cmd } => {
            let section = match cmd {
                BrowseCommands::Trending => browse::Section::Trending,
                BrowseCommands::Movies => browse::Section::Movies,
                BrowseCommands::Tv => browse::Section::Tv,
                BrowseCommands::NowPlaying => browse::Section::NowPlaying,
                BrowseCommands::Genre { genre_id } => browse::Section::Genre(genre_id),
            };
            browse::run_browse(&ctx, &output, section).await
        }
        Commands::Details { movie_id } => browse::run_details(&ctx, &output, movie_id).await,
        Commands::List { cmd } => match cmd {
            ListCommands::Show { sort, watch } => list::run_show(&ctx, &output, sort, watch).await,
            ListCommands::Add { movie_id } => list::run_add(&ctx, &output, movie_id).await,
            ListCommands::Remove { movie_id } => list::run_remove(&ctx, &output, movie_id),
            ListCommands::Toggle { movie_id } => list::run_toggle(&ctx, &output, movie_id).await,
            ListCommands::Shuffle => play::run_shuffle(&ctx, &output).await,
            ListCommands::Clear { yes } => list::run_clear(&ctx, &output, yes),
            ListCommands::Export => list::run_export(&ctx, &output),
        },
        Commands::Play { movie_id } => play::run_play(&ctx, &output, movie_id).await,
    }
}
