use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

mod config;

use graphite::lexicon::zeta;
use graphite::output::terminal;
use graphite::pipeline::scan;
use graphite::profile::engine;
use graphite::profile::fingerprint::FingerprintVector;
use graphite::status;
use graphite::store::{self, ProfileStore, SqliteStore};
use graphite::verify::impostors::{self, Vocabulary};
use graphite::window::delta;
use graphite::window::segment::tokenize;

/// Graphite: forensic authorship fingerprinting and drift analysis.
///
/// Tracks per-author stylistic profiles over time, flags writing that
/// deviates from them, and verifies authorship claims against impostor
/// pools.
#[derive(Parser)]
#[command(name = "graphite", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the snapshot database
    Init,

    /// Record a fingerprint snapshot for an author
    Record {
        /// Author identifier (e.g. ada.lovelace)
        author: String,

        /// Path to a JSON file mapping signal names to weights
        vector: PathBuf,

        /// Snapshot timestamp as RFC 3339 (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Check an author's newest snapshot against their historical profile
    Drift {
        author: String,

        /// Drift threshold (default: GRAPHITE_DRIFT_THRESHOLD or 0.1)
        #[arg(long)]
        threshold: Option<f64>,

        /// Decay factor for the composite profile (default: GRAPHITE_DECAY or 0.5)
        #[arg(long)]
        decay: Option<f64>,
    },

    /// Scan every tracked author for recent drift
    Scan {
        /// Drift threshold (default: GRAPHITE_DRIFT_THRESHOLD or 0.1)
        #[arg(long)]
        threshold: Option<f64>,

        /// Number of authors to check in parallel (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,
    },

    /// Rolling-window comparison of a document against candidate authors
    Delta {
        /// The document to analyze
        target: PathBuf,

        /// Candidate reference text as name=path (repeatable)
        #[arg(long = "candidate", value_name = "NAME=PATH", required = true)]
        candidates: Vec<String>,

        /// Window size in tokens
        #[arg(long, default_value = "500")]
        window_size: usize,

        /// Step between window starts in tokens
        #[arg(long, default_value = "250")]
        step: usize,
    },

    /// Verify an authorship claim with the impostors bootstrap
    Verify {
        /// The document whose authorship is in question
        target: PathBuf,

        /// A writing sample from the claimed author
        suspect: PathBuf,

        /// Impostor writing sample (repeatable; at least one required)
        #[arg(long = "impostor", value_name = "PATH", required = true)]
        impostors: Vec<PathBuf>,

        /// Bootstrap iterations
        #[arg(long, default_value = "100")]
        iterations: u32,

        /// Vocabulary subset size per iteration
        #[arg(long, default_value = "40")]
        subset_size: usize,

        /// RNG seed for reproducible runs (default: random, printed)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Contrast two authors' vocabularies (zeta scores)
    Lexicon {
        /// Directory of documents (or one file, split on blank lines) for author A
        corpus_a: PathBuf,

        /// Same, for author B
        corpus_b: PathBuf,

        /// Terms to report per side
        #[arg(long, default_value = "25")]
        top_n: usize,

        /// Minimum combined occurrences for a term to be scored
        #[arg(long, default_value = "2")]
        min_occurrences: usize,

        /// Keep common function words in the ranking
        #[arg(long)]
        keep_stop_words: bool,
    },

    /// Show system status (DB stats, snapshot coverage)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("graphite=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing graphite database...");
            let config = config::Config::load()?;
            let conn = store::initialize(&config.db_path)?;
            let table_count = store::schema::table_count(&conn)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nGraphite is ready. Record a snapshot with:");
            println!("  graphite record <author> <vector.json>");
        }

        Commands::Record { author, vector, at } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;

            let fingerprint = read_vector(&vector)?;
            let recorded_at = match at {
                Some(raw) => DateTime::parse_from_rfc3339(&raw)
                    .with_context(|| format!("--at must be RFC 3339, got {raw:?}"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };

            store
                .append_snapshot(&author, &fingerprint, recorded_at)
                .await?;
            let total = store.get_snapshots(&author).await?.len();

            info!(author = %author, signals = fingerprint.len(), "Recorded snapshot");
            println!(
                "Recorded snapshot for {author} ({} signals). History now has {total} snapshot(s).",
                fingerprint.len()
            );
        }

        Commands::Drift {
            author,
            threshold,
            decay,
        } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;
            let threshold = threshold.unwrap_or(config.drift_threshold);
            let decay = decay.unwrap_or(config.decay_factor);

            let history = store.get_snapshots(&author).await?;
            let result = engine::detect_recent_drift_in(&history, threshold, decay)?;
            terminal::display_drift(&author, history.len(), &result);
        }

        Commands::Scan {
            threshold,
            concurrency,
        } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;
            let threshold = threshold.unwrap_or(config.drift_threshold);

            let report = scan::run(&store, threshold, config.decay_factor, concurrency).await?;
            terminal::display_scan_report(&report);
        }

        Commands::Delta {
            target,
            candidates,
            window_size,
            step,
        } => {
            let target_text = read_text(&target)?;
            let candidate_texts = parse_candidates(&candidates)?;

            let report =
                delta::analyze_rolling_delta(&target_text, &candidate_texts, window_size, step)?;
            terminal::display_delta_report(&report);
        }

        Commands::Verify {
            target,
            suspect,
            impostors,
            iterations,
            subset_size,
            seed,
        } => {
            let target_vocab = vocabulary_from_file(&target)?;
            let suspect_vocab = vocabulary_from_file(&suspect)?;
            let impostor_vocabs: Vec<Vocabulary> = impostors
                .iter()
                .map(|path| vocabulary_from_file(path))
                .collect::<Result<_>>()?;

            let seed = seed.unwrap_or_else(rand::random);

            // The bootstrap can run hundreds of iterations; keep it off
            // the async executor. Interactive callers can wrap this in a
            // tokio timeout if they need a deadline.
            let result = tokio::task::spawn_blocking(move || {
                impostors::verify_authorship_seeded(
                    &target_vocab,
                    &suspect_vocab,
                    &impostor_vocabs,
                    iterations,
                    subset_size,
                    seed,
                )
            })
            .await??;

            terminal::display_verification(&result, seed);
        }

        Commands::Lexicon {
            corpus_a,
            corpus_b,
            top_n,
            min_occurrences,
            keep_stop_words,
        } => {
            let docs_a = load_corpus(&corpus_a)?;
            let docs_b = load_corpus(&corpus_b)?;

            let result = zeta::contrastive_lexicon(
                &docs_a,
                &docs_b,
                top_n,
                min_occurrences,
                !keep_stop_words,
            );
            terminal::display_lexicon(&corpus_label(&corpus_a), &corpus_label(&corpus_b), &result);
        }

        Commands::Status => {
            let config = config::Config::load()?;
            if !Path::new(&config.db_path).exists() {
                println!("Database: not initialized");
                println!("\nRun `graphite init` to set up the database.");
                return Ok(());
            }
            let store = open_store(&config)?;
            status::show(&store, &config.db_path).await?;
        }
    }

    Ok(())
}

/// Open the store for commands that need existing data.
fn open_store(config: &config::Config) -> Result<Arc<dyn ProfileStore>> {
    let conn = store::open(&config.db_path)?;
    Ok(Arc::new(SqliteStore::new(conn)))
}

/// Read a fingerprint vector from a JSON file.
///
/// Accepts either the full `{"signals": {...}}` form or a bare
/// signal -> weight object. Empty vectors are rejected — fingerprints
/// are never empty by construction, and the engine relies on that.
fn read_vector(path: &Path) -> Result<FingerprintVector> {
    let raw = read_text(path)?;
    let fingerprint = serde_json::from_str::<FingerprintVector>(&raw)
        .or_else(|_| {
            serde_json::from_str::<BTreeMap<String, f64>>(&raw)
                .map(|signals| FingerprintVector { signals })
        })
        .with_context(|| format!("{} is not a JSON fingerprint vector", path.display()))?;

    if fingerprint.is_empty() {
        anyhow::bail!("fingerprint vector in {} is empty", path.display());
    }
    Ok(fingerprint)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Tokenize a text file into a term -> count vocabulary.
fn vocabulary_from_file(path: &Path) -> Result<Vocabulary> {
    let text = read_text(path)?;
    let mut vocabulary = Vocabulary::new();
    for token in tokenize(&text) {
        *vocabulary.entry(token).or_insert(0) += 1;
    }
    Ok(vocabulary)
}

/// Parse repeated `--candidate name=path` flags into name -> text.
fn parse_candidates(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut candidates = BTreeMap::new();
    for entry in raw {
        let (name, path) = entry
            .split_once('=')
            .with_context(|| format!("--candidate must be NAME=PATH, got {entry:?}"))?;
        let text = read_text(Path::new(path))?;
        candidates.insert(name.to_string(), text);
    }
    Ok(candidates)
}

/// Load a corpus: a directory of text files (one document each, sorted
/// by filename) or a single file split into blank-line-separated blocks.
fn load_corpus(path: &Path) -> Result<Vec<String>> {
    if path.is_dir() {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
            .with_context(|| format!("Failed to read directory {}", path.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();

        let mut documents = Vec::new();
        for entry in entries {
            documents.push(read_text(&entry)?);
        }
        Ok(documents)
    } else {
        let text = read_text(path)?;
        Ok(text
            .split("\n\n")
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn corpus_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
