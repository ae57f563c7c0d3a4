//! Score Functions.
//!
//! Every score follows the same steps:
//!
//! 1. Resolve the cohort's reference values (for height-adjusted weight,
//!    derive them from the cubic regression at the subject's height).
//! 2. Bracket the measurement with [`locate`](crate::interpolation::locate).
//! 3. Interpolate between the bracketing quantiles in the normal-score
//!    domain, on a linear scale for height and a log scale for weight.
//! 4. Override the tails: a measurement at or below 0.9 × the smallest
//!    reference value scores 0, one at or above 1.2 × the largest scores 100.
//!
//! Inputs are in centimeters and kilograms; the height table is stored in
//! meters.

use serde::Serialize;

use super::polynomial::weight_curve;
use crate::error::{AnthroError, Result};
use crate::interpolation::{place, Scale};
use crate::reference::{ReferenceStore, Sex, TableId, QUANTILE_GRID};

/// Below `LOWER_TAIL_FACTOR × min(reference)` the score is forced to 0.
pub const LOWER_TAIL_FACTOR: f64 = 0.9;

/// Above `UPPER_TAIL_FACTOR × max(reference)` the score is forced to 100.
pub const UPPER_TAIL_FACTOR: f64 = 1.2;

const CM_PER_M: f64 = 100.0;

/// The three scores of one subject, each a percentile in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreReport {
    pub height_score: f64,
    pub weight_score: f64,
    pub haw_score: f64,
}

fn check_measurement(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnthroError::InvalidInput(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

/// Scores `x` against `values` (ascending, parallel to `quantiles`) and
/// applies the tail override.
fn score_against(
    table: TableId,
    values: &[f64],
    quantiles: &[f64],
    x: f64,
    scale: Scale,
) -> Result<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let placement = place(values, quantiles, x, scale).ok_or_else(|| {
        AnthroError::malformed(table, "fewer than 2 reference values in cohort")
    })?;

    let score = if x <= min * LOWER_TAIL_FACTOR {
        tracing::warn!(%table, x, min, "measurement below lower tail, score forced to 0");
        0.0
    } else if x >= max * UPPER_TAIL_FACTOR {
        tracing::warn!(%table, x, max, "measurement above upper tail, score forced to 100");
        100.0
    } else {
        placement.score
    };

    tracing::debug!(%table, x, index = placement.index, score, "scored measurement");
    Ok(score)
}

impl ReferenceStore {
    /// Height-for-age percentile.
    ///
    /// # Errors
    ///
    /// [`AnthroError::CohortNotFound`] for an unknown cohort and
    /// [`AnthroError::InvalidInput`] for a non-positive or non-finite height.
    pub fn height_score(&self, sex: Sex, age: u32, height_cm: f64) -> Result<f64> {
        check_measurement("height", height_cm)?;
        let row = self.height_row(sex, age)?;
        score_against(
            TableId::Height,
            row.values(),
            &QUANTILE_GRID,
            height_cm / CM_PER_M,
            Scale::Linear,
        )
    }

    /// Weight-for-age percentile, interpolated on a log-weight scale.
    pub fn weight_score(&self, sex: Sex, age: u32, weight_kg: f64) -> Result<f64> {
        check_measurement("weight", weight_kg)?;
        let row = self.weight_row(sex, age)?;
        score_against(TableId::Weight, row.values(), &QUANTILE_GRID, weight_kg, Scale::Log)
    }

    /// Height-adjusted-weight percentile.
    ///
    /// The cohort's cubic weight-on-height regressions are evaluated at the
    /// subject's height, and the weight is scored against that curve on a
    /// log-weight scale with the usual tail override.
    ///
    /// # Errors
    ///
    /// Besides the cohort and input errors of [`height_score`](Self::height_score),
    /// [`AnthroError::MalformedReferenceData`] if the regression yields a
    /// non-positive weight at this height, or if the regressions cross so
    /// that a higher quantile gives a lower weight. Equal neighbouring
    /// weights are allowed and scored with the zero-width bracket rule of
    /// [`interpolate`](crate::interpolation::interpolate).
    pub fn haw_score(&self, sex: Sex, age: u32, height_cm: f64, weight_kg: f64) -> Result<f64> {
        check_measurement("height", height_cm)?;
        check_measurement("weight", weight_kg)?;
        let params = self.parameter_row(sex, age)?;

        let curve = weight_curve(params, height_cm / CM_PER_M);
        if let Some(bad) = curve.iter().find(|p| !(p.weight_kg.is_finite() && p.weight_kg > 0.0)) {
            return Err(AnthroError::malformed(
                TableId::HawParams,
                format!(
                    "regression for {sex}/{age} at q={} gives weight {} at {height_cm} cm",
                    bad.q, bad.weight_kg
                ),
            ));
        }
        let quantiles: Vec<f64> = curve.iter().map(|p| p.q).collect();
        let weights: Vec<f64> = curve.iter().map(|p| p.weight_kg).collect();
        if let Some(i) = (1..weights.len()).find(|&i| weights[i - 1] > weights[i]) {
            return Err(AnthroError::malformed(
                TableId::HawParams,
                format!(
                    "regressions for {sex}/{age} cross at {height_cm} cm: q={} gives {} kg, q={} gives {} kg",
                    quantiles[i - 1],
                    weights[i - 1],
                    quantiles[i],
                    weights[i]
                ),
            ));
        }

        score_against(TableId::HawParams, &weights, &quantiles, weight_kg, Scale::Log)
    }

    /// All three scores of one subject.
    pub fn assess(&self, sex: Sex, age: u32, height_cm: f64, weight_kg: f64) -> Result<ScoreReport> {
        Ok(ScoreReport {
            height_score: self.height_score(sex, age, height_cm)?,
            weight_score: self.weight_score(sex, age, weight_kg)?,
            haw_score: self.haw_score(sex, age, height_cm, weight_kg)?,
        })
    }

    /// Smallest and largest tabulated height of the cohort, in centimeters.
    pub fn height_range(&self, sex: Sex, age: u32) -> Result<(f64, f64)> {
        let row = self.height_row(sex, age)?;
        Ok((row.min() * CM_PER_M, row.max() * CM_PER_M))
    }

    /// Smallest and largest tabulated weight of the cohort, in kilograms.
    pub fn weight_range(&self, sex: Sex, age: u32) -> Result<(f64, f64)> {
        let row = self.weight_row(sex, age)?;
        Ok((row.min(), row.max()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::sample_store;

    // -----------------------------------------------------------------------
    // Median identity
    // -----------------------------------------------------------------------

    #[test]
    fn tabulated_median_scores_fifty() {
        let store = sample_store();
        // sample rows: height 1.40 + 0.01 i, weight 30 + i; median at i = 12
        let h = store.height_score(Sex::Male, 12, 152.0).unwrap();
        assert!((h - 50.0).abs() < 1e-3, "height median score = {h}");
        let w = store.weight_score(Sex::Female, 12, 42.0).unwrap();
        assert!((w - 50.0).abs() < 1e-3, "weight median score = {w}");
    }

    #[test]
    fn haw_median_at_regression_point() {
        let store = sample_store();
        // male q=0.5 curve is 18 h²
        let h = 1.5;
        let s = store.haw_score(Sex::Male, 12, h * 100.0, 18.0 * h * h).unwrap();
        assert!((s - 50.0).abs() < 1e-3, "haw median score = {s}");
    }

    // -----------------------------------------------------------------------
    // Tail override
    // -----------------------------------------------------------------------

    #[test]
    fn lower_tail_forced_to_zero() {
        let store = sample_store();
        let (min_cm, _) = store.height_range(Sex::Male, 12).unwrap();
        assert_eq!(store.height_score(Sex::Male, 12, min_cm * 0.85).unwrap(), 0.0);
        assert_eq!(store.height_score(Sex::Male, 12, min_cm * 0.5).unwrap(), 0.0);
        let (min_kg, _) = store.weight_range(Sex::Male, 12).unwrap();
        assert_eq!(store.weight_score(Sex::Male, 12, min_kg * 0.89).unwrap(), 0.0);
    }

    #[test]
    fn upper_tail_forced_to_hundred() {
        let store = sample_store();
        let (_, max_cm) = store.height_range(Sex::Female, 12).unwrap();
        assert_eq!(store.height_score(Sex::Female, 12, max_cm * 1.3).unwrap(), 100.0);
        let (_, max_kg) = store.weight_range(Sex::Female, 12).unwrap();
        assert_eq!(store.weight_score(Sex::Female, 12, max_kg * 1.2).unwrap(), 100.0);
    }

    #[test]
    fn between_tail_and_table_extrapolates() {
        let store = sample_store();
        let (min_kg, max_kg) = store.weight_range(Sex::Male, 12).unwrap();
        let low = store.weight_score(Sex::Male, 12, min_kg * 0.95).unwrap();
        let high = store.weight_score(Sex::Male, 12, max_kg * 1.1).unwrap();
        assert!(low > 0.0 && low < 0.2, "low = {low}");
        assert!(high > 99.8 && high < 100.0, "high = {high}");
    }

    #[test]
    fn haw_tails_use_derived_curve() {
        let store = sample_store();
        let h: f64 = 1.5;
        let min = 15.0 * h * h;
        let max = 22.0 * h * h;
        assert_eq!(store.haw_score(Sex::Male, 12, 150.0, min * 0.9).unwrap(), 0.0);
        assert_eq!(store.haw_score(Sex::Male, 12, 150.0, max * 1.2).unwrap(), 100.0);
    }

    // -----------------------------------------------------------------------
    // Ranges
    // -----------------------------------------------------------------------

    #[test]
    fn ranges_in_cm_and_kg() {
        let store = sample_store();
        let (lo, hi) = store.height_range(Sex::Male, 12).unwrap();
        assert!((lo - 140.0).abs() < 1e-9 && (hi - 164.0).abs() < 1e-9, "({lo}, {hi})");
        let (lo, hi) = store.weight_range(Sex::Male, 12).unwrap();
        assert!((lo - 30.0).abs() < 1e-9 && (hi - 54.0).abs() < 1e-9, "({lo}, {hi})");
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_cohort_propagates() {
        let store = sample_store();
        for result in [
            store.height_score(Sex::Male, 30, 150.0),
            store.weight_score(Sex::Female, 1, 40.0),
            store.haw_score(Sex::Male, 13, 150.0, 40.0),
        ] {
            let err = result.unwrap_err();
            assert!(matches!(err, AnthroError::CohortNotFound { .. }), "{err:?}");
        }
        assert!(store.height_range(Sex::Male, 30).is_err());
        assert!(store.weight_range(Sex::Male, 30).is_err());
    }

    #[test]
    fn invalid_measurements_rejected() {
        let store = sample_store();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                store.weight_score(Sex::Male, 12, bad),
                Err(AnthroError::InvalidInput(_))
            ));
            assert!(matches!(
                store.height_score(Sex::Male, 12, bad),
                Err(AnthroError::InvalidInput(_))
            ));
            assert!(matches!(
                store.haw_score(Sex::Male, 12, 150.0, bad),
                Err(AnthroError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn non_positive_regression_weight_is_malformed() {
        let header: String = std::iter::once("male,age".to_string())
            .chain(QUANTILE_GRID.iter().map(|q| format!("q{q}")))
            .collect::<Vec<_>>()
            .join(",");
        let row: String = (0..25).map(|i| format!(",{}", 1.0 + i as f64)).collect();
        let table = format!("{header}\n1,12{row}\n");
        let params = "male,age,q,c0,c1,c2,c3\n1,12,0.1,-50,0,10,0\n1,12,0.9,0,0,20,0\n";
        let store =
            ReferenceStore::from_readers(table.as_bytes(), table.as_bytes(), params.as_bytes())
                .unwrap();
        let err = store.haw_score(Sex::Male, 12, 150.0, 40.0).unwrap_err();
        assert!(matches!(err, AnthroError::MalformedReferenceData { .. }), "{err:?}");
    }

    /// Store with a single male cohort aged 12 whose height-adjusted rows
    /// are `c2 · h²` for the given `(q, c2)` pairs.
    fn store_with_haw_rows(rows: &[(f64, f64)]) -> ReferenceStore {
        let header: String = std::iter::once("male,age".to_string())
            .chain(QUANTILE_GRID.iter().map(|q| format!("q{q}")))
            .collect::<Vec<_>>()
            .join(",");
        let row: String = (0..25).map(|i| format!(",{}", 1.0 + i as f64)).collect();
        let table = format!("{header}\n1,12{row}\n");
        let mut params = String::from("male,age,q,c0,c1,c2,c3\n");
        for (q, c2) in rows {
            params.push_str(&format!("1,12,{q},0,0,{c2},0\n"));
        }
        ReferenceStore::from_readers(table.as_bytes(), table.as_bytes(), params.as_bytes())
            .expect("tables are well-formed")
    }

    #[test]
    fn crossing_regressions_are_malformed() {
        // at 150 cm the curve is 45, 36, 49.5 kg
        let store = store_with_haw_rows(&[(0.1, 20.0), (0.5, 16.0), (0.9, 22.0)]);
        for weight in [34.0, 36.0, 45.0, 60.0] {
            let err = store.haw_score(Sex::Male, 12, 150.0, weight).unwrap_err();
            assert!(
                matches!(err, AnthroError::MalformedReferenceData { table: TableId::HawParams, .. }),
                "weight {weight}: {err:?}"
            );
            assert!(err.to_string().contains("cross"), "{err}");
        }
    }

    #[test]
    fn flat_lower_bracket_scores_lower_quantile() {
        // at 150 cm the curve is 36, 36, 45 kg; 33 kg is above the 0.9 tail
        let store = store_with_haw_rows(&[(0.1, 16.0), (0.5, 16.0), (0.9, 20.0)]);
        let s = store.haw_score(Sex::Male, 12, 150.0, 33.0).unwrap();
        assert!((s - 10.0).abs() < 1e-9, "expected 10, got {s}");
        // at the flat value itself the next (non-flat) bracket starts at q=0.5
        let s = store.haw_score(Sex::Male, 12, 150.0, 36.0).unwrap();
        assert!((s - 50.0).abs() < 1e-6, "expected 50, got {s}");
    }

    #[test]
    fn flat_upper_bracket_scores_upper_quantile() {
        // at 150 cm the curve is 36, 45, 45 kg; 50 kg is below the 1.2 tail
        let store = store_with_haw_rows(&[(0.1, 16.0), (0.5, 20.0), (0.9, 20.0)]);
        let s = store.haw_score(Sex::Male, 12, 150.0, 50.0).unwrap();
        assert!((s - 90.0).abs() < 1e-9, "expected 90, got {s}");
        let s = store.haw_score(Sex::Male, 12, 150.0, 45.0).unwrap();
        assert!((s - 90.0).abs() < 1e-9, "expected 90, got {s}");
    }

    #[test]
    fn flat_curve_stays_monotone() {
        let store = store_with_haw_rows(&[(0.1, 16.0), (0.5, 16.0), (0.9, 20.0)]);
        let mut prev = -1.0;
        for i in 0..=300 {
            let weight = 20.0 + i as f64 * 0.1;
            let s = store.haw_score(Sex::Male, 12, 150.0, weight).unwrap();
            assert!(s >= prev, "weight {weight} scored {s} after {prev}");
            prev = s;
        }
    }

    // -----------------------------------------------------------------------
    // Report
    // -----------------------------------------------------------------------

    #[test]
    fn assess_matches_individual_scores() {
        let store = sample_store();
        let report = store.assess(Sex::Male, 12, 151.0, 43.0).unwrap();
        assert_eq!(report.height_score, store.height_score(Sex::Male, 12, 151.0).unwrap());
        assert_eq!(report.weight_score, store.weight_score(Sex::Male, 12, 43.0).unwrap());
        assert_eq!(
            report.haw_score,
            store.haw_score(Sex::Male, 12, 151.0, 43.0).unwrap()
        );
    }

    #[test]
    fn report_serializes_to_json() {
        let report = ScoreReport {
            height_score: 41.5,
            weight_score: 60.0,
            haw_score: 70.25,
        };
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["height_score"], 41.5);
        assert_eq!(json["haw_score"], 70.25);
    }
}
