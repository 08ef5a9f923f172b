use crate::error::Result;
use crate::models::LoadRuleWatermarks;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persists load rule watermarks between reconciliation passes as JSON.
pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads saved watermarks. A missing file yields empty watermarks.
    pub fn load(&self) -> Result<LoadRuleWatermarks> {
        if !self.path.exists() {
            debug!("No watermark state at {:?}, starting fresh", self.path);
            return Ok(LoadRuleWatermarks::new());
        }

        let json = fs::read_to_string(&self.path)?;
        let watermarks = serde_json::from_str(&json)?;
        Ok(watermarks)
    }

    /// Loads saved watermarks, treating any failure as a first run.
    pub fn load_or_default(&self) -> LoadRuleWatermarks {
        self.load().unwrap_or_else(|e| {
            warn!(
                "Couldn't read watermark state from {:?}, treating as first run: {}",
                self.path, e
            );
            LoadRuleWatermarks::new()
        })
    }

    pub fn save(&self, watermarks: &LoadRuleWatermarks) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(watermarks)?;
        fs::write(&self.path, json)?;
        debug!(
            "Saved {} load rule watermark(s) to {:?}",
            watermarks.len(),
            self.path
        );
        Ok(())
    }
}
