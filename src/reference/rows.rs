//! Row types of the reference tables and the shared quantile grid.

use serde::Serialize;

/// Probabilities at which the height and weight tables are tabulated.
///
/// Strictly increasing, shared by both tables. The height-adjusted-weight
/// parameter table carries its own quantile column instead.
pub const QUANTILE_GRID: [f64; 25] = [
    0.002, 0.005, 0.010, 0.020, 0.030, 0.050, 0.070, 0.100, 0.150, 0.200, 0.300, 0.400, 0.500,
    0.600, 0.700, 0.800, 0.850, 0.900, 0.930, 0.950, 0.970, 0.980, 0.990, 0.995, 0.998,
];

/// Reference values of one cohort, one per entry of [`QUANTILE_GRID`].
///
/// Values are strictly increasing; the loader rejects rows that are not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRow {
    values: Vec<f64>,
}

impl ReferenceRow {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Smallest tabulated value (the 0.2% quantile).
    pub fn min(&self) -> f64 {
        self.values.first().copied().unwrap_or(f64::NAN)
    }

    /// Largest tabulated value (the 99.8% quantile).
    pub fn max(&self) -> f64 {
        self.values.last().copied().unwrap_or(f64::NAN)
    }

    /// `(quantile, value)` pairs, ascending.
    pub fn quantile_values(&self) -> Vec<(f64, f64)> {
        QUANTILE_GRID
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .collect()
    }
}

/// Cubic coefficients of weight as a function of height at one quantile.
///
/// ```text
/// weight(h) = c0 + c1 h + c2 h² + c3 h³      (h in meters, weight in kg)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterTuple {
    pub q: f64,
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl ParameterTuple {
    /// Evaluates the polynomial at `height_m` (Horner form).
    ///
    /// # Examples
    ///
    /// ```
    /// use anthro_score::ParameterTuple;
    ///
    /// let t = ParameterTuple { q: 0.5, c0: 1.0, c1: 2.0, c2: 3.0, c3: 4.0 };
    /// assert!((t.evaluate(2.0) - (1.0 + 4.0 + 12.0 + 32.0)).abs() < 1e-12);
    /// ```
    pub fn evaluate(&self, height_m: f64) -> f64 {
        self.c0 + height_m * (self.c1 + height_m * (self.c2 + height_m * self.c3))
    }
}

/// All coefficient tuples of one cohort, sorted by ascending quantile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterRow {
    tuples: Vec<ParameterTuple>,
}

impl ParameterRow {
    /// Sorts `tuples` by quantile. Quantiles must already be finite.
    pub(crate) fn new(mut tuples: Vec<ParameterTuple>) -> Self {
        tuples.sort_by(|a, b| a.q.total_cmp(&b.q));
        Self { tuples }
    }

    pub fn tuples(&self) -> &[ParameterTuple] {
        &self.tuples
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }
}
