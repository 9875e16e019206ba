use crate::config::Config;
use crate::error::FfResult;
use crate::geometry::KeyboardGeometry;
use crate::layouts::Layout;
use crate::optimizer::{make_rng, mutation, AnnealOptions, AnnealResult, Annealer, SearchControl};
use crate::scorer::Scorer;
use crate::telemetry::{SnapshotWriter, TelemetrySink};
use tracing::info;

/// Everything a search needs besides its output sinks.
pub struct SearchRequest<'a> {
    pub scorer: &'a Scorer,
    pub geometry: &'a KeyboardGeometry,
    pub alphabet: &'a [char],
    pub config: &'a Config,
    /// Start from this layout instead of a random one.
    pub initial: Option<Layout>,
}

/// Builds the starting layout (random unless given) and anneals it.
///
/// The random source is seeded from `config.search.seed` when present, so a
/// seeded request always reproduces the same result.
pub fn optimize_layout<T, S, C>(
    request: SearchRequest<'_>,
    telemetry: T,
    snapshots: S,
    control: C,
) -> FfResult<AnnealResult>
where
    T: TelemetrySink,
    S: SnapshotWriter,
    C: SearchControl,
{
    let options = AnnealOptions::from(request.config);
    let mut annealer = Annealer::new(request.scorer, options, telemetry, snapshots)?;
    let mut rng = make_rng(request.config.search.seed);

    let initial = match request.initial {
        Some(layout) => layout,
        None => mutation::random_layout(&mut rng, request.alphabet, &request.geometry.positions)?,
    };
    info!(
        "Initial layout cost: {:.6}",
        request.scorer.total(&initial)?
    );

    annealer.run_with_control(initial, &mut rng, control)
}
