use super::SnapshotWriter;
use crate::error::FfResult;
use crate::layouts::Layout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `{"best_cost": 1.23, "layout": {"a": [x, y], ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub best_cost: f64,
    pub layout: Layout,
}

impl SnapshotDocument {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Best-so-far JSON document, replaced on every write.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a concurrent reader never sees a half-written document.
pub struct JsonSnapshot {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl JsonSnapshot {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        Self {
            path,
            tmp_path: PathBuf::from(tmp),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotWriter for JsonSnapshot {
    fn write(&mut self, layout: &Layout, best_cost: f64) -> FfResult<()> {
        let doc = SnapshotDocument {
            best_cost,
            layout: layout.clone(),
        };
        let json = serde_json::to_string(&doc)?;
        fs::write(&self.tmp_path, json)?;
        fs::rename(&self.tmp_path, &self.path)?;
        Ok(())
    }
}
