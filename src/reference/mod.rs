//! Reference Data Store.
//!
//! Loads the height, weight and height-adjusted-weight tables and indexes
//! them by cohort (sex, age in years).
//!
//! - [`ReferenceStore`] — immutable index, optionally shared process-wide
//! - [`QUANTILE_GRID`] — the 25 probabilities of the height and weight tables
//! - [`Sex`], [`CohortKey`], [`TableId`] — lookup keys

mod cohort;
mod loader;
mod rows;
mod store;

pub use cohort::{CohortKey, Sex, TableId};
pub use rows::{ParameterRow, ParameterTuple, ReferenceRow, QUANTILE_GRID};
pub use store::ReferenceStore;

#[cfg(test)]
pub(crate) use store::tests::sample_store;
