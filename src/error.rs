//! Error type shared by every layer of the scoring engine.

use thiserror::Error;

use crate::reference::{Sex, TableId};

/// Errors produced while loading reference tables or computing scores.
///
/// Every scoring call either succeeds completely or returns one of these;
/// there are no partial results and no silent fallback to another cohort.
#[derive(Debug, Error)]
pub enum AnthroError {
    #[error("I/O error while reading reference data: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error while reading reference data: {0}")]
    Csv(#[from] csv::Error),

    /// The (sex, age) combination is absent from the requested table.
    #[error("no {table} reference row for sex={sex}, age={age}")]
    CohortNotFound { table: TableId, sex: Sex, age: u32 },

    /// A reference table violates a structural invariant the engine relies on.
    #[error("malformed {table} reference data: {reason}")]
    MalformedReferenceData { table: TableId, reason: String },

    /// No coefficient tuple has a quantile in `[q, 1.1 q)`.
    #[error("no coefficient row with quantile in [{q}, 1.1 * {q}) for sex={sex}, age={age}")]
    CoefficientNotFound { sex: Sex, age: u32, q: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AnthroError {
    pub(crate) fn malformed(table: TableId, reason: impl Into<String>) -> Self {
        Self::MalformedReferenceData {
            table,
            reason: reason.into(),
        }
    }
}

impl serde::Serialize for AnthroError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AnthroError>;
