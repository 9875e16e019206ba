use super::mutation;
use super::schedule::AnnealSchedule;
use crate::config::Config;
use crate::error::{FfResult, FittsForgeError};
use crate::layouts::Layout;
use crate::scorer::Scorer;
use crate::telemetry::{SnapshotWriter, TelemetryRecord, TelemetrySink};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct AnnealOptions {
    pub schedule: AnnealSchedule,
    /// Emit a telemetry record every `log_every` proposals.
    pub log_every: usize,
    /// Attach the digraph/single-letter split of the current cost to each record.
    pub log_components: bool,
}

impl From<&Config> for AnnealOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            schedule: AnnealSchedule::from(&cfg.search),
            log_every: cfg.telemetry.log_every,
            log_components: cfg.telemetry.log_components,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealResult {
    pub best_layout: Layout,
    pub best_cost: f64,
    /// Current cost after every proposal.
    pub cost_history: Vec<f64>,
    /// Temperature in effect for every proposal.
    pub temperature_history: Vec<f64>,
    pub outer_steps: usize,
    pub total_moves: usize,
    pub accepted_moves: usize,
    pub cancelled: bool,
    /// Telemetry or snapshot writes that failed and were skipped.
    pub io_failures: usize,
}

/// Snapshot handed to a [`SearchControl`] before each proposal.
#[derive(Debug, Clone, Copy)]
pub struct SearchProgress {
    pub iteration: usize,
    pub temperature: f64,
    pub current_cost: f64,
    pub best_cost: f64,
    pub elapsed: Duration,
}

/// Return value decides if the search continues (true) or stops early (false).
/// The best-so-far result is returned either way.
pub trait SearchControl {
    fn should_continue(&mut self, progress: &SearchProgress) -> bool;
}

impl<F: FnMut(&SearchProgress) -> bool> SearchControl for F {
    fn should_continue(&mut self, progress: &SearchProgress) -> bool {
        self(progress)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysContinue;

impl SearchControl for AlwaysContinue {
    fn should_continue(&mut self, _progress: &SearchProgress) -> bool {
        true
    }
}

struct SearchState {
    current: Layout,
    current_cost: f64,
    best: Layout,
    best_cost: f64,
    temperature: f64,
    outer_steps: usize,
    total_moves: usize,
    accepted_moves: usize,
    window_moves: usize,
    window_accepted: usize,
    io_failures: usize,
}

/// Single-threaded simulated annealing over symbol-to-slot assignments.
pub struct Annealer<'a, T, S> {
    scorer: &'a Scorer,
    options: AnnealOptions,
    telemetry: T,
    snapshots: S,
}

impl<'a, T: TelemetrySink, S: SnapshotWriter> Annealer<'a, T, S> {
    pub fn new(
        scorer: &'a Scorer,
        options: AnnealOptions,
        telemetry: T,
        snapshots: S,
    ) -> FfResult<Self> {
        options.schedule.validate()?;
        if options.log_every == 0 {
            return Err(FittsForgeError::InvalidParameter(
                "log_every must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            scorer,
            options,
            telemetry,
            snapshots,
        })
    }

    pub fn options(&self) -> &AnnealOptions {
        &self.options
    }

    pub fn run(&mut self, initial: Layout, rng: &mut Rng) -> FfResult<AnnealResult> {
        self.run_with_control(initial, rng, AlwaysContinue)
    }

    pub fn run_with_control<C: SearchControl>(
        &mut self,
        initial: Layout,
        rng: &mut Rng,
        mut control: C,
    ) -> FfResult<AnnealResult> {
        if initial.len() < 2 {
            return Err(FittsForgeError::InvalidInput(format!(
                "annealing needs at least two symbols, layout has {}",
                initial.len()
            )));
        }
        self.scorer.check_coverage(&initial)?;

        let schedule = self.options.schedule;
        let initial_cost = self.scorer.total(&initial)?;
        // Capped reservation; histories grow on demand.
        let expected = schedule.total_iterations().min(1 << 20);

        info!(
            "🔥 Annealing {} symbols: T0={} Tf={} rate={} N={} ({} outer steps)",
            initial.len(),
            schedule.initial_temperature,
            schedule.final_temperature,
            schedule.cooling_rate,
            schedule.iterations_per_temperature,
            schedule.outer_steps()
        );

        let mut state = SearchState {
            best: initial.clone(),
            current: initial,
            current_cost: initial_cost,
            best_cost: initial_cost,
            temperature: schedule.initial_temperature,
            outer_steps: 0,
            total_moves: 0,
            accepted_moves: 0,
            window_moves: 0,
            window_accepted: 0,
            io_failures: 0,
        };
        let mut cost_history = Vec::with_capacity(expected);
        let mut temperature_history = Vec::with_capacity(expected);
        let mut cancelled = false;
        let start = Instant::now();

        'cooling: while state.temperature > schedule.final_temperature {
            for _ in 0..schedule.iterations_per_temperature {
                let progress = SearchProgress {
                    iteration: state.total_moves,
                    temperature: state.temperature,
                    current_cost: state.current_cost,
                    best_cost: state.best_cost,
                    elapsed: start.elapsed(),
                };
                if !control.should_continue(&progress) {
                    cancelled = true;
                    break 'cooling;
                }

                let neighbor = mutation::swap_two(rng, &state.current)?;
                let neighbor_cost = self.scorer.total(&neighbor)?;
                let delta = neighbor_cost - state.current_cost;
                let accepted = super::accept_neighbor(rng, delta, state.temperature);

                if accepted {
                    state.current = neighbor;
                    state.current_cost = neighbor_cost;

                    if state.current_cost < state.best_cost {
                        state.best = state.current.clone();
                        state.best_cost = state.current_cost;
                        debug!(
                            "New best {:.6} at move {}",
                            state.best_cost,
                            state.total_moves + 1
                        );
                        self.write_snapshot(&mut state);
                    }
                }

                state.total_moves += 1;
                state.window_moves += 1;
                if accepted {
                    state.accepted_moves += 1;
                    state.window_accepted += 1;
                }

                cost_history.push(state.current_cost);
                temperature_history.push(state.temperature);

                if state.total_moves % self.options.log_every == 0 {
                    self.emit(&mut state, start)?;
                }
            }

            state.temperature *= schedule.cooling_rate;
            state.outer_steps += 1;
        }

        if let Err(e) = self.telemetry.close() {
            warn!("Failed to close telemetry sink: {}", e);
            state.io_failures += 1;
        }

        info!(
            "🏁 Annealing finished: best {:.6} after {} moves ({} accepted){}",
            state.best_cost,
            state.total_moves,
            state.accepted_moves,
            if cancelled { ", stopped early" } else { "" }
        );

        Ok(AnnealResult {
            best_layout: state.best,
            best_cost: state.best_cost,
            cost_history,
            temperature_history,
            outer_steps: state.outer_steps,
            total_moves: state.total_moves,
            accepted_moves: state.accepted_moves,
            cancelled,
            io_failures: state.io_failures,
        })
    }

    fn write_snapshot(&mut self, state: &mut SearchState) {
        if let Err(e) = self.snapshots.write(&state.best, state.best_cost) {
            warn!("Snapshot write failed (search continues): {}", e);
            state.io_failures += 1;
        }
    }

    fn emit(&mut self, state: &mut SearchState, start: Instant) -> FfResult<()> {
        let acceptance_ratio = if state.window_moves > 0 {
            state.window_accepted as f64 / state.window_moves as f64
        } else {
            0.0
        };

        let (digraph_cost, single_letter_cost) = if self.options.log_components {
            let parts = self.scorer.evaluate(&state.current)?;
            (Some(parts.digraph_cost), Some(parts.letter_cost))
        } else {
            (None, None)
        };

        let record = TelemetryRecord {
            iteration: state.total_moves,
            elapsed_seconds: round_to(start.elapsed().as_secs_f64(), 2),
            temperature: state.temperature,
            current_cost: state.current_cost,
            best_cost: state.best_cost,
            acceptance_ratio: round_to(acceptance_ratio, 6),
            digraph_cost,
            single_letter_cost,
        };

        debug!(
            "acceptance_rate={:.3}  T={:.6}  current={:.4}  best={:.4}",
            record.acceptance_ratio, record.temperature, record.current_cost, record.best_cost
        );

        if let Err(e) = self.telemetry.record(&record) {
            warn!("Telemetry write failed (search continues): {}", e);
            state.io_failures += 1;
        }

        state.window_moves = 0;
        state.window_accepted = 0;
        Ok(())
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CostParams;
    use crate::geometry::Position;
    use crate::scorer::{Digraph, DigraphTable, LetterTable};
    use crate::telemetry::{MemorySnapshot, MemoryTelemetry, NullSnapshot, NullTelemetry};

    fn line_scorer() -> Scorer {
        let digraphs = DigraphTable::from_entries([
            (Digraph::new('a', 'b'), 5.0),
            (Digraph::new('b', 'c'), 1.0),
            (Digraph::new('c', 'd'), 3.0),
        ])
        .unwrap();
        let letters = LetterTable::from_entries([('a', 4.0), ('b', 3.0), ('c', 2.0), ('d', 1.0)])
            .unwrap();
        Scorer::new(digraphs, letters, CostParams::default()).unwrap()
    }

    fn line_layout() -> Layout {
        let positions: Vec<Position> = (0..4).map(|i| Position::new(i as f64, 0.0)).collect();
        Layout::from_parts(&['d', 'c', 'b', 'a'], &positions).unwrap()
    }

    fn options(t0: f64, tf: f64, r: f64, n: usize, log_every: usize) -> AnnealOptions {
        AnnealOptions {
            schedule: AnnealSchedule {
                initial_temperature: t0,
                final_temperature: tf,
                cooling_rate: r,
                iterations_per_temperature: n,
            },
            log_every,
            log_components: true,
        }
    }

    #[test]
    fn test_invalid_schedule_rejected_before_run() {
        let scorer = line_scorer();
        let res = Annealer::new(
            &scorer,
            options(0.01, 1.0, 0.5, 10, 1),
            NullTelemetry,
            NullSnapshot,
        );
        assert!(matches!(res, Err(FittsForgeError::InvalidParameter(_))));

        let res = Annealer::new(
            &scorer,
            options(1.0, 0.01, 1.0, 10, 1),
            NullTelemetry,
            NullSnapshot,
        );
        assert!(matches!(res, Err(FittsForgeError::InvalidParameter(_))));

        let res = Annealer::new(
            &scorer,
            options(1.0, 0.01, 0.5, 0, 1),
            NullTelemetry,
            NullSnapshot,
        );
        assert!(matches!(res, Err(FittsForgeError::InvalidParameter(_))));
    }

    #[test]
    fn test_history_lengths_and_best_consistency() {
        let scorer = line_scorer();
        let mut telemetry = MemoryTelemetry::default();
        let mut snapshots = MemorySnapshot::default();
        let mut annealer = Annealer::new(
            &scorer,
            options(1.0, 0.01, 0.5, 10, 5),
            &mut telemetry,
            &mut snapshots,
        )
        .unwrap();

        let mut rng = Rng::with_seed(11);
        let result = annealer.run(line_layout(), &mut rng).unwrap();

        assert_eq!(result.outer_steps, 7);
        assert_eq!(result.cost_history.len(), 70);
        assert_eq!(result.temperature_history.len(), 70);
        assert!(!result.cancelled);

        let min_seen = result
            .cost_history
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        let initial = scorer.total(&line_layout()).unwrap();
        assert!(result.best_cost <= initial);
        assert!(result.best_cost <= min_seen);
        assert_eq!(scorer.total(&result.best_layout).unwrap(), result.best_cost);

        assert_eq!(telemetry.records.len(), 14);
        assert!(telemetry.closed);
        assert_eq!(telemetry.records[0].iteration, 5);
        assert!(telemetry.records[0].digraph_cost.is_some());

        if let Some((layout, cost)) = snapshots.latest() {
            assert_eq!(*cost, result.best_cost);
            assert_eq!(*layout, result.best_layout);
        } else {
            assert_eq!(result.best_cost, initial);
        }
    }

    #[test]
    fn test_control_stops_early_and_keeps_best() {
        let scorer = line_scorer();
        let mut annealer = Annealer::new(
            &scorer,
            options(1.0, 0.01, 0.5, 10, 1000),
            NullTelemetry,
            NullSnapshot,
        )
        .unwrap();

        let mut rng = Rng::with_seed(5);
        let stop_at = |p: &SearchProgress| p.iteration < 13;
        let result = annealer
            .run_with_control(line_layout(), &mut rng, stop_at)
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.total_moves, 13);
        assert_eq!(result.cost_history.len(), 13);
        assert_eq!(result.outer_steps, 1);
        assert_eq!(scorer.total(&result.best_layout).unwrap(), result.best_cost);
    }

    #[test]
    fn test_long_schedule_cancelled_early() {
        let scorer = line_scorer();
        let mut annealer = Annealer::new(
            &scorer,
            options(1.0, 1e-6, 0.99999, 100_000_000, 1000),
            NullTelemetry,
            NullSnapshot,
        )
        .unwrap();
        assert!(annealer.options().schedule.total_iterations() > 1_000_000_000);

        let mut rng = Rng::with_seed(3);
        let result = annealer
            .run_with_control(line_layout(), &mut rng, |p: &SearchProgress| p.iteration < 5)
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.total_moves, 5);
        assert_eq!(result.cost_history.len(), 5);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.1234567, 6), 0.123457);
        assert_eq!(round_to(12.3456, 2), 12.35);
    }
}
