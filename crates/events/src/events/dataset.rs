use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Dataset store lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetEvent {
    Loaded {
        name: String,
        processes: usize,
        resources: usize,
    },

    Saved {
        name: String,
        path: PathBuf,
    },

    Removed {
        name: String,
    },

    /// Dataset copied into the store from an external file
    Imported {
        name: String,
        source: PathBuf,
    },

    Failed {
        name: Option<String>,
        failure: FailureContext,
    },
}
