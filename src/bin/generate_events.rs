//! Generate a synthetic, rule-labeled match event dataset
//!
//! ```text
//! generate-events --input data/profiles.json --groups data/groups.json \
//!     --count 500 --match-type solo --seed 42
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use kovari_algo::config::Settings;
use kovari_algo::logging;
use kovari_algo::models::{GroupProfile, TripProfile};
use kovari_algo::training::{DatasetWriter, EventGenerator, GeneratorConfig, MatchSelection};

#[derive(Debug, Parser)]
#[command(name = "generate-events", version, about = "Generate synthetic match events for model training")]
struct Args {
    /// JSON array of traveler profiles
    #[arg(long)]
    input: PathBuf,

    /// JSON array of group profiles
    #[arg(long)]
    groups: Option<PathBuf>,

    /// Dataset to append to (defaults to dataset.path from config)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of events to generate
    #[arg(long, default_value_t = 300)]
    count: usize,

    /// solo, group or both
    #[arg(long, default_value = "both")]
    match_type: MatchSelection,

    /// Weight preset name recorded on every event
    #[arg(long, default_value = "balanced")]
    preset: String,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
}

fn run(args: Args, settings: &Settings) -> Result<(), String> {
    let travelers: Vec<TripProfile> = read_json(&args.input)?;
    let (valid, invalid): (Vec<_>, Vec<_>) = travelers.into_iter().partition(|t| t.validate().is_ok());
    if !invalid.is_empty() {
        warn!("Skipping {} malformed profiles", invalid.len());
    }
    let groups: Vec<GroupProfile> = match &args.groups {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    info!("Loaded {} travelers and {} groups", valid.len(), groups.len());

    if matches!(args.match_type, MatchSelection::Group | MatchSelection::Both) && groups.is_empty() {
        warn!("No groups supplied, group events will be skipped");
    }

    let generator = EventGenerator::new(GeneratorConfig {
        count: args.count,
        selection: args.match_type,
        preset: args.preset,
        base_timestamp_ms: chrono::Utc::now().timestamp_millis(),
    });

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let generated = generator.generate(&valid, &groups, &mut rng);

    let output = args.output.unwrap_or_else(|| settings.dataset.path.clone());
    let mut writer = DatasetWriter::open(&output).map_err(|e| e.to_string())?;
    writer.append_all(&generated.events).map_err(|e| e.to_string())?;
    let written = writer.finish().map_err(|e| e.to_string())?;

    let summary = &generated.summary;
    info!("Wrote {} events to {}", written, output.display());
    info!(
        total = summary.total,
        solo = summary.solo,
        group = summary.group,
        accepts = summary.accepts,
        ignores = summary.ignores,
        "Generation summary"
    );

    Ok(())
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        Settings::default()
    });

    logging::init(&settings.logging);

    match run(args, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Event generation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
