use serde::{Deserialize, Serialize};

/// Tunables for edit sessions and history. Hosts usually load this once at
/// startup from JSON and share it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Maximum changed cells per session, `None` for unlimited.
    pub change_limit: Option<u64>,
    /// Depth of the per-player undo stack.
    pub history_size: usize,
    /// Maximum retained change records per journal before it degrades to
    /// untracked.
    pub journal_budget: usize,
    /// Gaussian kernel radius used by terrain smoothing.
    pub smooth_kernel_radius: usize,
    /// Gaussian kernel sigma used by terrain smoothing.
    pub smooth_kernel_sigma: f64,
    /// Per-evaluation work cap for shape expressions, standing in for a
    /// wall-clock timeout.
    pub expression_node_cap: u64,
}

impl Default for EditConfig {
    fn default() -> Self {
        EditConfig {
            change_limit: None,
            history_size: 15,
            journal_budget: 10_000_000,
            smooth_kernel_radius: 5,
            smooth_kernel_sigma: 1.0,
            expression_node_cap: 100_000,
        }
    }
}

impl EditConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
