use std::num::ParseIntError;

use thiserror::Error;

/// Errors raised while building a `FrequencyModel`
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("line {line}: no delimiter found")]
    MissingDelimiter { line: usize },

    #[error("line {line}: empty word")]
    EmptyWord { line: usize },

    #[error("line {line}: invalid count")]
    InvalidCount {
        line: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("total token count must be positive and finite, got {0}")]
    InvalidTotal(f64),

    #[error("total token count {total} is smaller than the sum of all counts ({observed})")]
    TotalBelowObserved { total: f64, observed: f64 },

    #[error("failed to read counts: {0}")]
    Io(#[from] std::io::Error),
}
