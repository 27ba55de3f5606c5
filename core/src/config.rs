//! Console configuration, loaded from a JSON file.
//!
//! Every key is optional; a missing file section falls back to `Default`.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

use crate::{console::DEFAULT_EVENT_CAPACITY, query::QueryParams};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Delay applied to fixture fetches, to mimic a network round trip.
    pub simulated_latency_ms: u64,
    /// Fixture rows generated per view when no data file is present.
    pub records_per_view: usize,
    /// Directory of `<view>.json` fixture files. Views without a file use
    /// generated fixtures.
    pub data_dir: Option<String>,
    /// Event log entries each view keeps before dropping the oldest.
    pub max_events_per_view: usize,
    /// Initial query per view name. Overrides the view's built-in default.
    pub views: BTreeMap<String, QueryParams>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 0,
            records_per_view: 25,
            data_dir: None,
            max_events_per_view: DEFAULT_EVENT_CAPACITY,
            views: BTreeMap::new(),
        }
    }
}

impl ConsoleConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: ConsoleConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        log::info!(
            "Loaded console config from {} ({} view overrides)",
            path.display(),
            config.views.len()
        );
        Ok(config)
    }

    /// Fixture file for `view`, if a data directory is configured.
    pub fn data_file(&self, view: &str) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|dir| format!("{dir}/{view}.json"))
    }

    pub fn view_params(&self, view: &str) -> Option<&QueryParams> {
        self.views.get(view)
    }
}
