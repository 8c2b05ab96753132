use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunables for landmark-based analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Landmarks must be strictly more visible than this to count towards
    /// the body height estimate.
    pub visibility_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.5,
        }
    }
}

impl AnalysisConfig {
    /// Load from a JSON file. Missing fields fall back to their defaults.
    ///
    /// A missing or malformed file is the caller's error, not an I/O fault.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::unreadable(path, e))?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| Error::unreadable(path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(Error::InvalidInput(format!(
                "visibility_threshold must be within [0, 1], got {}",
                self.visibility_threshold
            )));
        }
        Ok(())
    }
}
