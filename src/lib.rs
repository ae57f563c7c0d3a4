//! # anthro-score
//!
//! Percentile scores for height-for-age, weight-for-age and
//! height-adjusted weight, computed against sex- and age-specific reference
//! quantile tables.
//!
//! A measurement is bracketed between two tabulated quantiles of its cohort,
//! the quantiles are mapped to normal z-scores, and the measurement's
//! position on the line through them is mapped back to a percentile. Height
//! is interpolated on a linear scale, weight on a log scale. Measurements far
//! outside the table score exactly 0 or 100.
//!
//! ## Modules
//!
//! - [`reference`] — loading and indexing of the reference tables
//! - [`interpolation`] — bracketing and normal-score interpolation
//! - [`scoring`] — the three scores, ranges and the height-adjusted regression
//! - [`config`] — where the tables live on disk
//!
//! ## Examples
//!
//! ```no_run
//! // Tables are read from $ANTHRO_DATA_DIR (default: ./data) on first use.
//! let h = anthro_score::height_score("Male", 12, 151.0)?;
//! let w = anthro_score::weight_score("Male", 12, 43.0)?;
//! let haw = anthro_score::haw_score("Male", 12, 151.0, 43.0)?;
//! assert!((0.0..=100.0).contains(&h));
//! # let _ = (w, haw);
//! # Ok::<(), anthro_score::AnthroError>(())
//! ```
//!
//! With an explicitly loaded store:
//!
//! ```no_run
//! use anthro_score::{DataConfig, ReferenceStore, Sex};
//!
//! let store = ReferenceStore::load(&DataConfig::with_data_dir("tables"))?;
//! let report = store.assess(Sex::Female, 10, 138.0, 31.5)?;
//! println!("{report:?}");
//! # Ok::<(), anthro_score::AnthroError>(())
//! ```

pub mod config;
pub mod error;
pub mod interpolation;
pub mod reference;
pub mod scoring;

pub use config::DataConfig;
pub use error::{AnthroError, Result};
pub use reference::{
    CohortKey, ParameterRow, ParameterTuple, ReferenceRow, ReferenceStore, Sex, TableId,
    QUANTILE_GRID,
};
pub use scoring::{CurvePoint, HawCurve, ScoreReport};

/// Height-for-age percentile of `height_cm` using the process-wide store.
///
/// `sex` is parsed case-insensitively (`male`/`female`).
pub fn height_score(sex: &str, age: u32, height_cm: f64) -> Result<f64> {
    ReferenceStore::global()?.height_score(sex.parse()?, age, height_cm)
}

/// Weight-for-age percentile of `weight_kg` using the process-wide store.
pub fn weight_score(sex: &str, age: u32, weight_kg: f64) -> Result<f64> {
    ReferenceStore::global()?.weight_score(sex.parse()?, age, weight_kg)
}

/// Height-adjusted-weight percentile using the process-wide store.
pub fn haw_score(sex: &str, age: u32, height_cm: f64, weight_kg: f64) -> Result<f64> {
    ReferenceStore::global()?.haw_score(sex.parse()?, age, height_cm, weight_kg)
}

/// All three scores using the process-wide store.
pub fn assess(sex: &str, age: u32, height_cm: f64, weight_kg: f64) -> Result<ScoreReport> {
    ReferenceStore::global()?.assess(sex.parse()?, age, height_cm, weight_kg)
}

/// Tabulated height extremes of the cohort, in centimeters.
pub fn height_range(sex: &str, age: u32) -> Result<(f64, f64)> {
    ReferenceStore::global()?.height_range(sex.parse()?, age)
}

/// Tabulated weight extremes of the cohort, in kilograms.
pub fn weight_range(sex: &str, age: u32) -> Result<(f64, f64)> {
    ReferenceStore::global()?.weight_range(sex.parse()?, age)
}

/// Coefficient tuple of the cohort with quantile in `[q, 1.1 q)`.
pub fn coefficients(sex: &str, age: u32, q: f64) -> Result<ParameterTuple> {
    ReferenceStore::global()?.coefficients(sex.parse()?, age, q)
}
