use serde::{Deserialize, Serialize};

use crate::dependency::Classpath;

/// Settings from the `[resolution]` table of a resolution manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionSettings {
    /// Restrict the result to the scopes of one classpath.
    #[serde(default)]
    pub classpath: Option<Classpath>,

    /// How many independent resolutions may run at once in a batch.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            classpath: None,
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
