use thiserror::Error;

use crate::types::Point;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("bin dimensions must be positive, got {0}")]
    InvalidBin(Point),
    #[error("item dimensions must be positive, got {0}")]
    InvalidItem(Point),
    #[error("item size {0} is listed more than once")]
    DuplicateSize(Point),
    #[error("item {item} exceeds bin capacity {bin}")]
    ItemExceedsBin { item: Point, bin: Point },
    #[error("demand expands to {total} items, more than the limit of {limit}")]
    TooManyItems { total: u64, limit: u64 },
    #[error("unknown strategy '{0}', expected: next-fit, first-fit, or best-fit")]
    UnknownStrategy(String),
    #[error("invalid task: {0}")]
    Task(#[from] serde_json::Error),
    #[error("could not read task file: {0}")]
    Io(#[from] std::io::Error),
}
