//! SPEAC GA CLI - Compose a piece from a beat corpus and JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use speac_ga::{
    compose::Composer,
    corpus::{GenePoolSource, JsonCorpus},
    evolution::SearchEngine,
    schema::ComposerConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 3 {
        eprintln!("Usage: {} <config.json> <corpus-dir> [output.json]", args[0]);
        eprintln!();
        eprintln!("Compose a piece by genetic search over a SPEAC beat corpus.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to composer configuration file");
        eprintln!("  corpus-dir   Directory of <bucket>.json beat lists");
        eprintln!("  output.json  Where to write the score (default: composition.json)");
        eprintln!();
        eprintln!("Example configuration is printed with the --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let corpus_dir = PathBuf::from(&args[2]);
    let output_path = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("composition.json"));

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: ComposerConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    let corpus = JsonCorpus::new(&corpus_dir);
    let buckets = corpus.buckets().unwrap_or_else(|e| {
        eprintln!("Error reading corpus: {}", e);
        std::process::exit(1);
    });

    println!("SPEAC GA Composer");
    println!("=================");
    println!("Corpus: {} ({} buckets)", corpus.root().display(), buckets.len());
    println!(
        "Bucket: {}",
        config.piece.bucket.as_deref().unwrap_or("all")
    );
    println!(
        "Crossover: {}, mutation: {}, min fitness: {}",
        config.search.crossover_rate, config.search.mutation_rate, config.search.min_fitness
    );
    println!("Beats: {}", config.piece.beats);
    println!();

    let engine = SearchEngine::from_source(
        &corpus,
        config.piece.bucket.as_deref(),
        config.search.clone(),
    )
    .unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    println!("Gene pool: {} beats", engine.pool().len());

    let mut composer = Composer::new(engine, config.piece.clone());

    println!("Composing...");
    let start = Instant::now();
    let (score, stats) = composer.compose_random();
    let elapsed = start.elapsed();

    let json = serde_json::to_string_pretty(&score).unwrap_or_else(|e| {
        eprintln!("Error serializing score: {}", e);
        std::process::exit(1);
    });
    fs::write(&output_path, json).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {}", output_path.display(), e);
        std::process::exit(1);
    });

    println!();
    println!("Measures: {}", score.measures.len());
    println!("Notes: {}", score.note_count());
    println!(
        "Matched beats: {}, closest-available beats: {}",
        stats.matched, stats.fallbacks
    );
    println!("Time: {:.2}s", elapsed.as_secs_f32());
    println!("Written to {}", output_path.display());
}

fn print_example_config() {
    let config = ComposerConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
