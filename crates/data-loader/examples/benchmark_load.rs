use data_loader::Artifacts;
use std::path::Path;
use std::time::Instant;

fn main() {
    let dir = Path::new("artifacts");

    println!("Loading recommendation artifacts...\n");

    let start = Instant::now();
    let artifacts = Artifacts::load_from_dir(dir)
        .expect("Failed to load artifacts");
    let elapsed = start.elapsed();

    let (indexed, titled) = artifacts.catalog().counts();
    let (users, predictions) = artifacts.predictions().counts();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Indexed movies: {}", indexed);
    println!("Titled movies: {}", titled);
    println!("Feature dimensions: {}", artifacts.similarity().dim());
    println!("Users with predictions: {}", users);
    println!("Predictions: {}", predictions);
    println!("\nPerformance: {:.0} predictions/second",
             predictions as f64 / elapsed.as_secs_f64());
}
