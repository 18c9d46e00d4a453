mod display;
mod interactive;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::DataIndex;
use metadata_client::client::{DEFAULT_API_BASE, DEFAULT_IMAGE_BASE};
use metadata_client::source::DEFAULT_SITE_BASE;
use metadata_client::{
    CachedMetadata, MetadataSource, OfflineMetadata, TmdbClient, TmdbConfig,
    DEFAULT_CACHE_CAPACITY,
};
use server::{RecommendationOrchestrator, Session};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use display::{print_favorites, print_notice, print_recommendations};

/// movie-recs - content-based movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommends similar movies from a precomputed similarity matrix", long_about = None)]
struct Cli {
    /// Directory holding movies.csv and similarity.bin / similarity.csv
    #[arg(short, long, global = true, default_value = "data", env = "MOVIE_RECS_DATA_DIR")]
    data_dir: PathBuf,

    /// TMDB API key used for posters, cast and trailers
    #[arg(long, global = true, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Never contact TMDB; show placeholder metadata
    #[arg(long, global = true)]
    offline: bool,

    /// Metadata records kept in memory (0 disables caching)
    #[arg(long, global = true, default_value_t = DEFAULT_CACHE_CAPACITY)]
    cache_capacity: usize,

    /// Per-request TMDB timeout in seconds
    #[arg(long, global = true, default_value = "6")]
    timeout_secs: u64,

    /// TMDB REST endpoint (for mirrors and proxies)
    #[arg(long, global = true, default_value = DEFAULT_API_BASE, env = "TMDB_API_BASE")]
    tmdb_api_base: String,

    /// Prefix joined to TMDB poster paths
    #[arg(long, global = true, default_value = DEFAULT_IMAGE_BASE, env = "TMDB_IMAGE_BASE")]
    tmdb_image_base: String,

    /// Movie page prefix used for fallback links
    #[arg(long, global = true, default_value = DEFAULT_SITE_BASE, env = "TMDB_SITE_BASE")]
    tmdb_site_base: String,

    /// Favorites file used by save/load
    #[arg(long, global = true, default_value = "favorites.json", env = "MOVIE_RECS_FAVORITES")]
    favorites: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Recommend {
        /// Exact catalog title (case-sensitive)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        top_n: usize,

        /// Show cast, director and language on every card
        #[arg(long)]
        full: bool,
    },

    /// Recommend movies similar to a randomly chosen title
    Surprise {
        #[arg(long, default_value = "5")]
        top_n: usize,
    },

    /// Search for catalog titles
    Search {
        /// Case-insensitive substring to look for
        #[arg(long)]
        title: String,
    },

    /// Inspect the saved favorites file
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Start an interactive session
    Interactive {
        #[arg(long, default_value = "5")]
        top_n: usize,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List saved favorites
    Show,
    /// Print favorites as shareable text
    Share,
    /// Export favorites as CSV
    Export {
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Favorites commands only touch the favorites file
    if let Commands::Favorites { action } = &cli.command {
        handle_favorites(&cli.favorites, action);
        return Ok(());
    }

    println!("Loading artifacts from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir)
            .context("Failed to load movie catalog and similarity matrix")?,
    );
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        data_index.len(),
        start.elapsed()
    );

    let metadata = build_metadata_source(&cli);
    let orchestrator = RecommendationOrchestrator::new(data_index.clone(), metadata);

    match cli.command {
        Commands::Recommend { title, top_n, full } => {
            handle_recommend(&orchestrator, &title, top_n, full).await
        }
        Commands::Surprise { top_n } => handle_surprise(&orchestrator, top_n).await,
        Commands::Search { title } => handle_search(&data_index, &title),
        Commands::Interactive { top_n } => {
            interactive::run(orchestrator, Session::new(cli.favorites), top_n).await
        }
        Commands::Favorites { .. } => {}
    }

    Ok(())
}

/// TMDB behind a bounded cache, or placeholders when offline or unconfigured
fn build_metadata_source(cli: &Cli) -> Arc<dyn MetadataSource> {
    let api_key = cli
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty());

    let Some(api_key) = api_key.filter(|_| !cli.offline) else {
        info!("No TMDB API key in use; showing placeholder metadata");
        return Arc::new(OfflineMetadata);
    };

    match TmdbClient::new(tmdb_config(cli, api_key)) {
        Ok(client) => Arc::new(CachedMetadata::new(client, cli.cache_capacity)),
        Err(e) => {
            warn!("TMDB client unavailable, continuing offline: {}", e);
            Arc::new(OfflineMetadata)
        }
    }
}

fn tmdb_config(cli: &Cli, api_key: &str) -> TmdbConfig {
    TmdbConfig::new(api_key)
        .with_api_base(cli.tmdb_api_base.trim_end_matches('/'))
        .with_image_base(cli.tmdb_image_base.trim_end_matches('/'))
        .with_site_base(cli.tmdb_site_base.trim_end_matches('/'))
        .with_timeout(Duration::from_secs(cli.timeout_secs))
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    title: &str,
    top_n: usize,
    full: bool,
) {
    let recommendations = orchestrator.get_recommendations(title, top_n).await;
    if recommendations.is_empty() {
        println!(
            "{}",
            format!("No recommendations found for '{}'.", title).yellow()
        );
        return;
    }
    print_recommendations(title, &recommendations, full);
}

/// Handle the 'surprise' command
async fn handle_surprise(orchestrator: &RecommendationOrchestrator, top_n: usize) {
    match orchestrator.surprise(top_n).await {
        Some((title, recommendations)) => {
            println!("{} {}", "Surprise pick:".bold(), title);
            print_recommendations(&title, &recommendations, false);
        }
        None => println!("{}", "The catalog is empty.".yellow()),
    }
}

/// Handle the 'search' command
fn handle_search(data_index: &DataIndex, query: &str) {
    let catalog = data_index.catalog();
    let matches = catalog.search(query);

    println!(
        "{}",
        format!("Search results for '{}' ({} found):", query, matches.len())
            .bold()
            .blue()
    );
    for entry in matches.iter().take(20).filter_map(|&pos| catalog.get(pos)) {
        println!("{}: {}", entry.id.to_string().green(), entry.title);
    }
}

/// Handle the 'favorites' command
fn handle_favorites(path: &std::path::Path, action: &FavoritesAction) {
    let mut session = Session::new(path);
    if !session.load_favorites() {
        if let Some(notice) = session.take_notice() {
            print_notice(&notice);
        }
        return;
    }
    session.take_notice();

    match action {
        FavoritesAction::Show => print_favorites(session.favorites()),
        FavoritesAction::Share => println!("{}", session.favorites().share_text()),
        FavoritesAction::Export { output } => {
            session.export_favorites_csv(output);
            if let Some(notice) = session.take_notice() {
                print_notice(&notice);
            }
        }
    }
}
