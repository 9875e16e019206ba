use crate::reports;
use clap::Args;
use fittsforge::api::{optimize_layout, SearchRequest};
use fittsforge::config::Config;
use fittsforge::error::FfResult;
use fittsforge::geometry::KeyboardGeometry;
use fittsforge::optimizer::SearchProgress;
use fittsforge::scorer::Scorer;
use fittsforge::telemetry::{CsvTelemetry, JsonSnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    /// Root directory for progress logs, the live snapshot and results.
    #[arg(short = 'o', long, default_value = "annealing")]
    pub out_dir: PathBuf,

    /// Stop gracefully after this many seconds, keeping the best layout.
    #[arg(short = 'T', long)]
    pub max_seconds: Option<u64>,
}

/// Output locations for one run, numbered by the first unused result index.
pub struct RunPaths {
    pub index: usize,
    pub progress: PathBuf,
    pub snapshot: PathBuf,
    pub result: PathBuf,
}

impl RunPaths {
    pub fn allocate(out_dir: &Path) -> FfResult<Self> {
        let progress_dir = out_dir.join("progress_logs");
        let result_dir = out_dir.join("result_log");
        fs::create_dir_all(&progress_dir)?;
        fs::create_dir_all(&result_dir)?;

        let index = next_run_index(&result_dir);
        Ok(Self {
            index,
            progress: progress_dir.join(format!("annealing_progress{}.csv", index)),
            snapshot: progress_dir.join("current_best_layout.json"),
            result: result_dir.join(format!("results{}.json", index)),
        })
    }
}

/// First `N >= 1` for which `results{N}.json` does not exist in `dir`.
pub fn next_run_index(dir: &Path) -> usize {
    let mut index = 1;
    while dir.join(format!("results{}.json", index)).exists() {
        index += 1;
    }
    index
}

pub fn run(
    args: SearchArgs,
    config: Config,
    scorer: &Scorer,
    geometry: &KeyboardGeometry,
    alphabet: &[char],
) -> FfResult<()> {
    let paths = RunPaths::allocate(&args.out_dir)?;
    info!("📝 Run #{} -> {}", paths.index, paths.progress.display());

    let telemetry = CsvTelemetry::create(&paths.progress)?;
    let snapshots = JsonSnapshot::new(&paths.snapshot);

    let limit = args.max_seconds.map(Duration::from_secs);
    let control = move |p: &SearchProgress| limit.is_none_or(|l| p.elapsed < l);

    let request = SearchRequest {
        scorer,
        geometry,
        alphabet,
        config: &config,
        initial: None,
    };
    let result = optimize_layout(request, telemetry, snapshots, control)?;

    let json = serde_json::to_string(&result)?;
    fs::write(&paths.result, json)?;
    info!("💾 Results written to {}", paths.result.display());

    let breakdown = scorer.evaluate(&result.best_layout)?;
    reports::print_run_summary(&result, &breakdown);
    reports::print_layout_grid("OPTIMIZED", &result.best_layout);
    Ok(())
}
