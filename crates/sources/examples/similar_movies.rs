//! Example: Query both sources offline
//!
//! Run with: cargo run --package sources --example similar_movies -- artifacts 862 1
//!
//! Arguments: artifacts directory, movie id, user id. No network access is
//! needed because the movie is given by id instead of by title.

use data_loader::Artifacts;
use sources::{PredictedRatingsSource, SimilarMoviesSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let mut args = std::env::args().skip(1);
    let dir = PathBuf::from(args.next().unwrap_or_else(|| "artifacts".to_string()));
    let movie_id: u32 = args.next().as_deref().unwrap_or("862").parse()?;
    let user_id: u32 = args.next().as_deref().unwrap_or("1").parse()?;

    let start = Instant::now();
    let artifacts = Arc::new(Artifacts::load_from_dir(&dir)?);
    println!("Loaded artifacts in {:?}\n", start.elapsed());

    let catalog = artifacts.catalog();
    let similar = SimilarMoviesSource::new(artifacts.clone());
    let start = Instant::now();
    let neighbors = similar.similar_to(movie_id, 10)?;
    println!(
        "Movies similar to {} ({}) in {:?}:",
        catalog.title_of(movie_id),
        movie_id,
        start.elapsed()
    );
    for (i, movie) in neighbors.iter().enumerate() {
        println!(
            "  {}. {} (distance: {:.3})",
            i + 1,
            catalog.title_of(movie.movie_id),
            movie.distance
        );
    }

    let predicted = PredictedRatingsSource::new(artifacts.clone());
    let top = predicted.top_for_user(user_id, 10);
    println!("\nTop predictions for user {}:", user_id);
    if top.is_empty() {
        println!("  (no predictions)");
    }
    for (i, movie) in top.iter().enumerate() {
        println!(
            "  {}. {} (score: {:.3})",
            i + 1,
            catalog.title_of(movie.movie_id),
            movie.score
        );
    }

    Ok(())
}
