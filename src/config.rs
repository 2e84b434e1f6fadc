//! JSON configuration for the executor and the demo tools.
use crate::parallel::CrossoverTable;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Worker pool size and crossover thresholds.
///
/// ```json
/// { "threads": 4, "crossover": { "distance_transform": 4096 } }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Number of workers. `None` uses the global pool (one worker per
    /// hardware thread).
    pub threads: Option<usize>,
    pub crossover: CrossoverTable,
}

impl ExecutorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.threads == Some(0) {
            return Err("threads must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Read and parse any JSON config file.
pub fn load_json_config<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn load_config(path: &Path) -> Result<ExecutorConfig, String> {
    let config: ExecutorConfig = load_json_config(path)?;
    config
        .validate()
        .map_err(|e| format!("Invalid config {}: {e}", path.display()))?;
    Ok(config)
}
