use crate::reports;
use clap::Args;
use fittsforge::config::Config;
use fittsforge::error::FfResult;
use fittsforge::geometry::KeyboardGeometry;
use fittsforge::layouts::{KnownLayout, Layout};
use fittsforge::scorer::Scorer;
use strum::IntoEnumIterator;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub config: Config,

    /// Only score layouts whose name contains this text.
    #[arg(long)]
    pub layout: Option<String>,
}

pub fn run(args: ScoreArgs, scorer: &Scorer, geometry: &KeyboardGeometry) -> FfResult<()> {
    let mut names = Vec::new();
    let mut layouts: Vec<Layout> = Vec::new();

    for known in KnownLayout::iter() {
        let name = known.to_string();
        if let Some(ref filter) = args.layout {
            if !name.to_lowercase().contains(&filter.to_lowercase()) {
                continue;
            }
        }
        match known.to_layout(geometry) {
            Ok(layout) => {
                names.push(name);
                layouts.push(layout);
            }
            Err(e) => warn!("Skipping '{}': {}", name, e),
        }
    }

    let mut results = Vec::new();
    for ((name, layout), record) in names
        .into_iter()
        .zip(layouts.iter())
        .zip(scorer.evaluate_many(&layouts))
    {
        reports::print_layout_grid(&name, layout);
        results.push((name, record?));
    }

    results.sort_by(|a, b| a.1.total_cost.total_cmp(&b.1.total_cost));
    reports::print_cost_report(&results);
    Ok(())
}
