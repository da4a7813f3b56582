use thiserror::Error;

/// Reasons a raw table cannot become a [`Dataset`](super::model::Dataset).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("table has no columns")]
    NoColumns,

    #[error("row {row} has {found} cells but the header has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("columns '{first}' and '{second}' both normalize to '{normalized}'")]
    NormalizationCollision {
        first: String,
        second: String,
        normalized: String,
    },
}
