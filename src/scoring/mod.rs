//! Height, weight and height-adjusted-weight percentile scores.
//!
//! - [`ReferenceStore::height_score`], [`ReferenceStore::weight_score`],
//!   [`ReferenceStore::haw_score`] — the three scores
//! - [`ReferenceStore::assess`] — all three as a [`ScoreReport`]
//! - [`ReferenceStore::height_range`], [`ReferenceStore::weight_range`] —
//!   tabulated extremes for chart axes
//! - [`weight_curve`], [`ReferenceStore::coefficients`],
//!   [`ReferenceStore::haw_curves`] — the height-adjusted weight regression

mod polynomial;
mod score;

pub use polynomial::{weight_curve, CurvePoint, HawCurve, COEFFICIENT_WINDOW};
pub use score::{ScoreReport, LOWER_TAIL_FACTOR, UPPER_TAIL_FACTOR};
