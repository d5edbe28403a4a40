//! Persisted dataset record

use serde::{Deserialize, Serialize};

/// A named snapshot as stored on disk.
///
/// Values are kept signed so that a hand-edited file with a negative entry
/// still parses and is then rejected by validation with a precise error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub num_processes: usize,
    pub num_resources: usize,
    pub allocation: Vec<Vec<i64>>,
    pub maximum: Vec<Vec<i64>>,
    pub available: Vec<i64>,
}

impl Dataset {
    /// The textbook five-process, three-resource snapshot
    #[must_use]
    pub fn textbook() -> Self {
        Self {
            num_processes: 5,
            num_resources: 3,
            allocation: vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
            maximum: vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            available: vec![3, 3, 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_match_file_format() {
        let json = serde_json::to_value(Dataset::textbook()).unwrap();
        for key in [
            "num_processes",
            "num_resources",
            "allocation",
            "maximum",
            "available",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
