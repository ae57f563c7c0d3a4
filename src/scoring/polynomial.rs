//! Polynomial Weight-Adjuster.
//!
//! The height-adjusted-weight table stores, per cohort and quantile, a cubic
//! regression of weight on height. Evaluating every quantile's cubic at the
//! subject's height yields a weight-quantile table personalised to that
//! height, which is then scored exactly like a tabulated weight row.

use serde::Serialize;

use crate::error::{AnthroError, Result};
use crate::reference::{ParameterRow, ParameterTuple, ReferenceStore, Sex};

/// Upper bound factor of the quantile window searched by
/// [`ReferenceStore::coefficients`].
pub const COEFFICIENT_WINDOW: f64 = 1.1;

/// One point of a height-adjusted weight curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub q: f64,
    pub weight_kg: f64,
}

/// Weight-per-quantile curve at one height, for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HawCurve {
    pub height_cm: f64,
    pub points: Vec<CurvePoint>,
}

/// Evaluates every coefficient tuple of `params` at `height_m`.
///
/// The result follows the row's ascending quantile order.
pub fn weight_curve(params: &ParameterRow, height_m: f64) -> Vec<CurvePoint> {
    params
        .tuples()
        .iter()
        .map(|t| CurvePoint {
            q: t.q,
            weight_kg: t.evaluate(height_m),
        })
        .collect()
}

impl ReferenceStore {
    /// First coefficient tuple of the cohort whose quantile lies in
    /// `[q, 1.1 q)`, searching in ascending quantile order.
    ///
    /// Used for direct inspection of the regression; scoring never calls it.
    ///
    /// # Errors
    ///
    /// [`AnthroError::CohortNotFound`] for an unknown cohort and
    /// [`AnthroError::CoefficientNotFound`] when no quantile falls in the window.
    pub fn coefficients(&self, sex: Sex, age: u32, q: f64) -> Result<ParameterTuple> {
        let row = self.parameter_row(sex, age)?;
        row.tuples()
            .iter()
            .find(|t| t.q >= q && t.q < q * COEFFICIENT_WINDOW)
            .copied()
            .ok_or(AnthroError::CoefficientNotFound { sex, age, q })
    }

    /// Height-adjusted weight curves of a cohort at each of `heights_cm`.
    pub fn haw_curves(&self, sex: Sex, age: u32, heights_cm: &[f64]) -> Result<Vec<HawCurve>> {
        let row = self.parameter_row(sex, age)?;
        Ok(heights_cm
            .iter()
            .map(|&height_cm| HawCurve {
                height_cm,
                points: weight_curve(row, height_cm / 100.0),
            })
            .collect())
    }
}
