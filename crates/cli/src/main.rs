use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Artifacts, MovieId, UserId};
use rand::Rng;
use server::{PosterGrid, RecommendationService, normalize_title};
use sources::{PredictedRatingsSource, SimilarMoviesSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tmdb_client::{DEFAULT_API_URL, PosterImage, TmdbClient, TmdbConfig};
use tracing::info;

/// Characters per grid column
const COLUMN_WIDTH: usize = 36;

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Movie recommendations by similar title or by user", long_about = None)]
struct Cli {
    /// Directory holding model.json, data.json and predictions.csv
    #[arg(short, long, default_value = "artifacts")]
    artifacts_dir: PathBuf,

    /// TMDb API key, needed for title search and posters
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    tmdb_api_key: Option<String>,

    /// TMDb API base URL
    #[arg(long, env = "TMDB_API_URL", default_value = DEFAULT_API_URL)]
    tmdb_api_url: String,

    /// Per-request timeout for TMDb calls
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    Similar {
        /// Movie title; a trailing " (1995)" style suffix is ignored
        #[arg(long)]
        title: String,

        /// Number of movies to recommend
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(6..=20))]
        count: u64,
    },

    /// Recommend movies from a user's predicted ratings
    User {
        /// User ID to get recommendations for
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        user_id: UserId,

        /// Number of movies to recommend
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(6..=20))]
        count: u64,
    },

    /// List catalog titles
    Titles {
        /// Only titles containing this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of titles to print
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Run benchmark of local lookups (no network)
    Benchmark {
        /// Number of requests per lookup kind
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading artifacts from {}...", cli.artifacts_dir.display());
    let start = Instant::now();
    let artifacts = Arc::new(
        Artifacts::load_from_dir(&cli.artifacts_dir)
            .context("Failed to load recommendation artifacts")?,
    );
    println!("{} Loaded artifacts in {:?}", "✓".green(), start.elapsed());

    match &cli.command {
        Commands::Similar { title, count } => {
            let service = build_service(&cli, artifacts)?;
            handle_similar(&service, title, *count as usize).await
        }
        Commands::User { user_id, count } => {
            let service = build_service(&cli, artifacts)?;
            handle_user(&service, *user_id, *count as usize).await
        }
        Commands::Titles { filter, limit } => {
            handle_titles(&artifacts, filter.as_deref(), *limit);
            Ok(())
        }
        Commands::Benchmark { requests } => handle_benchmark(artifacts, *requests),
    }
}

fn build_service(cli: &Cli, artifacts: Arc<Artifacts>) -> Result<RecommendationService> {
    let api_key = cli
        .tmdb_api_key
        .clone()
        .ok_or_else(|| anyhow!("A TMDb API key is required (--tmdb-api-key or TMDB_API_KEY)"))?;

    let config = TmdbConfig::new(api_key)
        .with_api_url(cli.tmdb_api_url.clone())
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let client = TmdbClient::new(config).context("Failed to build TMDb client")?;

    info!("Using TMDb API at {}", cli.tmdb_api_url);
    Ok(RecommendationService::with_tmdb(artifacts, client))
}

/// Handle the 'similar' command
async fn handle_similar(service: &RecommendationService, title: &str, count: usize) -> Result<()> {
    let title = normalize_title(title);
    let recommendations = service.recommend_by_title(title, count).await;

    if recommendations.is_empty() {
        if let Some(message) = recommendations.message() {
            println!("{}", message.yellow());
        }
        println!("No similar movies found for Movie \"{}\".", title);
        return Ok(());
    }

    let grid = service.poster_grid(&recommendations.items).await;
    println!("\n{}\n", "OUR RECOMMENDED MOVIES".bold().blue());
    print_grid(&grid);
    Ok(())
}

/// Handle the 'user' command
async fn handle_user(service: &RecommendationService, user_id: UserId, count: usize) -> Result<()> {
    let recommendations = service.recommend_by_user(user_id, count);

    if recommendations.is_empty() {
        if let Some(message) = recommendations.message() {
            println!("{}", message.yellow());
        }
        println!("No similar movies found for the given User ID");
        return Ok(());
    }

    let movie_ids: Vec<MovieId> = recommendations.items.iter().map(|m| m.movie_id).collect();
    let grid = service.poster_grid(&movie_ids).await;

    println!("\n{}\n", format!("RECOMMENDED MOVIES FOR USER {}", user_id).bold().blue());
    print_grid(&grid);
    for (rank, movie) in recommendations.items.iter().enumerate() {
        println!(
            "{}. {} - Predicted: {:.2}",
            (rank + 1).to_string().green(),
            service.artifacts().catalog().title_of(movie.movie_id),
            movie.score
        );
    }
    Ok(())
}

/// Handle the 'titles' command
fn handle_titles(artifacts: &Artifacts, filter: Option<&str>, limit: Option<usize>) {
    let filter = filter.map(str::to_lowercase);
    let titles: Vec<(MovieId, &str)> = artifacts
        .catalog()
        .all_titles()
        .into_iter()
        .filter(|(_, title)| match &filter {
            Some(needle) => title.to_lowercase().contains(needle),
            None => true,
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    println!("{}", format!("{} titles:", titles.len()).bold().blue());
    for (movie_id, title) in titles {
        println!("{:>8}  {}", movie_id.to_string().cyan(), title);
    }
}

/// Handle the 'benchmark' command
fn handle_benchmark(artifacts: Arc<Artifacts>, requests: usize) -> Result<()> {
    let similar = SimilarMoviesSource::new(artifacts.clone());
    let predicted = PredictedRatingsSource::new(artifacts.clone());

    let user_ids = artifacts.predictions().user_ids();
    let movie_count = artifacts.catalog().counts().0;
    if user_ids.is_empty() || movie_count == 0 {
        return Err(anyhow!("Artifacts have no predictions or no indexed movies"));
    }

    let mut rng = rand::rng();

    let mut user_timings = Vec::with_capacity(requests);
    for _ in 0..requests {
        let user_id = user_ids[rng.random_range(0..user_ids.len())];
        let start = Instant::now();
        predicted.top_for_user(user_id, 20);
        user_timings.push(start.elapsed());
    }

    let mut knn_timings = Vec::with_capacity(requests);
    for _ in 0..requests {
        let movie_id = artifacts
            .catalog()
            .movie_at(rng.random_range(0..movie_count))
            .context("Catalog index out of range")?;
        let start = Instant::now();
        similar.similar_to(movie_id, 20)?;
        knn_timings.push(start.elapsed());
    }

    print_latencies("By-user lookups", user_timings);
    print_latencies("Similar-movie queries", knn_timings);
    Ok(())
}

fn print_latencies(label: &str, mut timings: Vec<Duration>) {
    if timings.is_empty() {
        println!("{}: no requests", label);
        return;
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / timings.len() as u32;
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f32 / total_time.as_secs_f32();

    println!("{}", format!("{}:", label).bold().blue());
    println!("  Total time: {:?}", total_time);
    println!("  Average latency: {:?}", avg_latency);
    println!("  P50 latency: {:?}", percentile(0.50));
    println!("  P95 latency: {:?}", percentile(0.95));
    println!("  P99 latency: {:?}", percentile(0.99));
    println!("  Throughput: {:.2} requests/second", throughput);
}

/// Print tiles row by row: titles side by side, then each poster URL
fn print_grid(grid: &PosterGrid) {
    let mut rank = 1;
    for row in grid.rows() {
        let header: String = row
            .iter()
            .enumerate()
            .map(|(i, tile)| {
                let label = format!("{}. {}", rank + i, fit_column(&tile.title));
                format!("{:<width$}", label, width = COLUMN_WIDTH)
            })
            .collect();
        println!("{}", header.trim_end().bold());

        for (i, tile) in row.iter().enumerate() {
            let marker = match tile.poster {
                PosterImage::Found(_) => "✓".green(),
                PosterImage::Fallback => "-".yellow(),
                PosterImage::Error => "✗".red(),
            };
            println!("   {} {}. {}", marker, rank + i, tile.poster.url());
        }
        println!();
        rank += row.len();
    }
}

/// Shortens a title so a numbered label fits its column
fn fit_column(title: &str) -> String {
    let max = COLUMN_WIDTH - 6;
    if title.chars().count() <= max {
        return title.to_string();
    }
    let mut short: String = title.chars().take(max - 1).collect();
    short.push('…');
    short
}
