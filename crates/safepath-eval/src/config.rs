//! Evaluation settings.

use serde::{Deserialize, Serialize};

/// Default nesting limit for a single evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Tunables for [`crate::PathEvaluator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Maximum node nesting, counting lambda bodies. Paths built by hand are
    /// shallow; this only trips on runaway generated trees.
    pub max_depth: usize,
}

impl EvalConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
