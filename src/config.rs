use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PackError;
use crate::solver::{Solver, Strategy};
use crate::types::{Demand, Point};

/// A complete packing job, as read from a task file or an HTTP request.
///
/// ```json
/// {"bin": [10, 10], "items": [{"size": [6, 5], "count": 2}], "strategy": "first-fit"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingTask {
    pub bin: Point,
    /// Ordered size-to-count mapping. Order decides ties between equal heights.
    #[serde(default)]
    pub items: Vec<Demand>,
    #[serde(default)]
    pub strategy: Strategy,
}

impl PackingTask {
    pub fn from_path(path: &Path) -> Result<Self, PackError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json(json: &str) -> Result<Self, PackError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn solver(&self) -> Solver {
        Solver::new(self.bin, self.strategy, self.items.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task() {
        let task = PackingTask::from_json(
            r#"{
                "bin": [10, 10],
                "items": [
                    {"size": [6, 5], "count": 2},
                    {"size": [4, 5], "count": 1},
                    {"size": [10, 10], "count": 1}
                ],
                "strategy": "first-fit"
            }"#,
        )
        .unwrap();

        assert_eq!(task.bin, Point::new(10, 10));
        assert_eq!(task.strategy, Strategy::FirstFit);
        assert_eq!(task.items[1].size, Point::new(4, 5));

        let sol = task.solver().solve().unwrap();
        assert_eq!(sol.bin_count(), 2);
        assert_eq!(sol.item_count(), 4);
    }

    #[test]
    fn test_defaults() {
        let task = PackingTask::from_json(r#"{"bin": [5, 5]}"#).unwrap();
        assert!(task.items.is_empty());
        assert_eq!(task.strategy, Strategy::BestFit);
    }

    #[test]
    fn test_invalid_count_is_a_task_error() {
        let err = PackingTask::from_json(r#"{"bin": [5, 5], "items": [{"size": [1, 1], "count": -3}]}"#)
            .unwrap_err();
        assert!(matches!(err, PackError::Task(_)));
        assert!(err.to_string().contains("non-negative"), "{err}");
    }

    #[test]
    fn test_unknown_strategy_is_a_task_error() {
        let err = PackingTask::from_json(r#"{"bin": [5, 5], "strategy": "worst-fit"}"#).unwrap_err();
        assert!(matches!(err, PackError::Task(_)));
    }

    #[test]
    fn test_huge_count_fails_validation() {
        let task = PackingTask::from_json(
            r#"{"bin": [1, 1], "items": [{"size": [1, 1], "count": 4294967295}]}"#,
        )
        .unwrap();
        let err = task.solver().solve().unwrap_err();
        assert!(matches!(err, PackError::TooManyItems { .. }), "{err}");
    }

    #[test]
    fn test_missing_file() {
        let err = PackingTask::from_path(Path::new("/nonexistent/task.json")).unwrap_err();
        assert!(matches!(err, PackError::Io(_)));
    }
}
