//! Progress and best-layout sinks fed by the annealing loop.
//!
//! The engine only depends on the two traits below; file-backed
//! implementations live in [`csv_log`] and [`snapshot`].

pub mod csv_log;
pub mod snapshot;

pub use self::csv_log::CsvTelemetry;
pub use self::snapshot::{JsonSnapshot, SnapshotDocument};

use crate::error::FfResult;
use crate::layouts::Layout;
use serde::{Deserialize, Serialize};

/// One row of the progress log.
///
/// Cost components are only present when the run was configured to
/// decompose the current layout's cost at each emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub iteration: usize,
    pub elapsed_seconds: f64,
    pub temperature: f64,
    pub current_cost: f64,
    pub best_cost: f64,
    pub acceptance_ratio: f64,
    pub digraph_cost: Option<f64>,
    pub single_letter_cost: Option<f64>,
}

/// Append-only progress log. Each record must be durable when `record` returns.
pub trait TelemetrySink {
    fn record(&mut self, record: &TelemetryRecord) -> FfResult<()>;

    fn close(&mut self) -> FfResult<()> {
        Ok(())
    }
}

/// Overwrites the persisted best solution.
pub trait SnapshotWriter {
    fn write(&mut self, layout: &Layout, best_cost: f64) -> FfResult<()>;
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for &mut T {
    fn record(&mut self, record: &TelemetryRecord) -> FfResult<()> {
        (**self).record(record)
    }

    fn close(&mut self) -> FfResult<()> {
        (**self).close()
    }
}

impl<S: SnapshotWriter + ?Sized> SnapshotWriter for &mut S {
    fn write(&mut self, layout: &Layout, best_cost: f64) -> FfResult<()> {
        (**self).write(layout, best_cost)
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn record(&mut self, _record: &TelemetryRecord) -> FfResult<()> {
        Ok(())
    }
}

/// Discards every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSnapshot;

impl SnapshotWriter for NullSnapshot {
    fn write(&mut self, _layout: &Layout, _best_cost: f64) -> FfResult<()> {
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryTelemetry {
    pub records: Vec<TelemetryRecord>,
    pub closed: bool,
}

impl TelemetrySink for MemoryTelemetry {
    fn record(&mut self, record: &TelemetryRecord) -> FfResult<()> {
        self.records.push(*record);
        Ok(())
    }

    fn close(&mut self) -> FfResult<()> {
        self.closed = true;
        Ok(())
    }
}

/// Keeps every snapshot written, oldest first.
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshot {
    pub history: Vec<(Layout, f64)>,
}

impl MemorySnapshot {
    pub fn latest(&self) -> Option<&(Layout, f64)> {
        self.history.last()
    }
}

impl SnapshotWriter for MemorySnapshot {
    fn write(&mut self, layout: &Layout, best_cost: f64) -> FfResult<()> {
        self.history.push((layout.clone(), best_cost));
        Ok(())
    }
}
