use super::{TelemetryRecord, TelemetrySink};
use crate::error::{FfResult, FittsForgeError};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Column order of [`TelemetryRecord`].
const HEADER: [&str; 8] = [
    "iteration",
    "elapsed_seconds",
    "temperature",
    "current_cost",
    "best_cost",
    "acceptance_ratio",
    "digraph_cost",
    "single_letter_cost",
];

/// CSV progress log, appended to and flushed on every record.
///
/// The header row is written at creation, and only when the file did not
/// exist before. Recording after `close` is an error.
pub struct CsvTelemetry {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
}

impl CsvTelemetry {
    pub fn create<P: AsRef<Path>>(path: P) -> FfResult<Self> {
        let path = path.as_ref().to_path_buf();
        let is_new = !path.is_file();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            writer: Some(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySink for CsvTelemetry {
    fn record(&mut self, record: &TelemetryRecord) -> FfResult<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            FittsForgeError::Io(io::Error::other(format!(
                "telemetry sink {} is closed",
                self.path.display()
            )))
        })?;
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> FfResult<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
