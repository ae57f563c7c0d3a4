//! Normal-Score Interpolator.
//!
//! Between two adjacent tabulated quantiles the reference distribution is
//! treated as locally normal in some value space `v` (raw values for height,
//! log values for weight). The quantiles are mapped to z-scores, a line
//! `z = a·v + b` is fitted through the two points, and the target's z-score
//! is mapped back to a percentile.
//!
//! ```text
//! z1 = Φ⁻¹(q1),  z2 = Φ⁻¹(q2)      (see `probit`)
//! a  = (z2 - z1) / (v2 - v1)
//! b  = z1 - a·v1
//! score = 100 · Φ(a·v + b)
//! ```

use u_numflow::special::{inverse_normal_cdf, standard_normal_cdf};

use super::locate::locate;

/// Value space in which the reference distribution is treated as normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Normal in the raw value (height).
    Linear,
    /// Normal in the logarithm of the value (weight).
    Log,
}

impl Scale {
    /// Maps a raw measurement into this value space.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Scale::Linear => x,
            Scale::Log => x.ln(),
        }
    }
}

/// Newton steps applied on top of the closed-form probit approximation.
const PROBIT_REFINEMENT_STEPS: usize = 3;

/// Standard normal density φ(z).
fn normal_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Inverse standard normal CDF, refined so that `Φ(probit(q)) == q` to
/// within floating-point noise.
///
/// Starts from [`inverse_normal_cdf`] and polishes the root of
/// `Φ(z) - q` with Newton steps against [`standard_normal_cdf`]. Tabulated
/// quantiles therefore map back to themselves exactly enough that a
/// measurement equal to a tabulated value scores that value's quantile.
///
/// `q` must lie in `(0, 1)`.
///
/// # Examples
///
/// ```
/// use anthro_score::interpolation::probit;
/// use u_numflow::special::standard_normal_cdf;
///
/// for q in [0.002, 0.1, 0.5, 0.9, 0.998] {
///     assert!((standard_normal_cdf(probit(q)) - q).abs() < 1e-9);
/// }
/// ```
pub fn probit(q: f64) -> f64 {
    let mut z = inverse_normal_cdf(q);
    if !z.is_finite() {
        return z;
    }
    for _ in 0..PROBIT_REFINEMENT_STEPS {
        let density = normal_pdf(z);
        if density <= 0.0 {
            break;
        }
        z -= (standard_normal_cdf(z) - q) / density;
    }
    z
}

/// Percentile of `v` given the bracket `(v1, q1)`, `(v2, q2)`.
///
/// All values must already be in the interpolation value space. The result
/// is on a 0–100 scale. `v` outside `[v1, v2]` extrapolates along the same
/// line.
///
/// A zero-width bracket (`v1 == v2`) has no slope; the score is then the
/// upper quantile when `v >= v1` and the lower quantile otherwise.
///
/// # Examples
///
/// ```
/// use anthro_score::interpolation::interpolate;
///
/// // At a tabulated point the tabulated quantile is recovered.
/// let s = interpolate(1.0, 0.25, 2.0, 0.75, 1.0);
/// assert!((s - 25.0).abs() < 1e-6);
///
/// // Symmetric quantiles: the midpoint is the median.
/// let s = interpolate(1.0, 0.25, 2.0, 0.75, 1.5);
/// assert!((s - 50.0).abs() < 1e-3);
/// ```
pub fn interpolate(v1: f64, q1: f64, v2: f64, q2: f64, v: f64) -> f64 {
    let width = v2 - v1;
    if width == 0.0 {
        let q = if v >= v1 { q2 } else { q1 };
        return q * 100.0;
    }
    let z1 = probit(q1);
    let z2 = probit(q2);
    let a = (z2 - z1) / width;
    let b = z1 - a * v1;
    standard_normal_cdf(a * v + b) * 100.0
}

/// Where a measurement fell and the percentile it was given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Upper index of the bracket used (see [`locate`]).
    pub index: usize,
    /// Percentile on a 0–100 scale, before any tail override.
    pub score: f64,
}

/// Locates `x` in `values` and interpolates between the bracketing quantiles.
///
/// `values` and `quantiles` are parallel, both ascending, in raw units;
/// `scale` is applied to the bracket values and to `x` before interpolating.
///
/// # Returns
///
/// `None` if the slices differ in length or hold fewer than 2 entries.
///
/// # Examples
///
/// ```
/// use anthro_score::interpolation::{place, Scale};
///
/// let values = [10.0, 20.0, 40.0];
/// let quantiles = [0.1, 0.5, 0.9];
/// let p = place(&values, &quantiles, 20.0, Scale::Log).unwrap();
/// assert_eq!(p.index, 2);
/// assert!((p.score - 50.0).abs() < 1e-3);
/// ```
pub fn place(values: &[f64], quantiles: &[f64], x: f64, scale: Scale) -> Option<Placement> {
    if values.len() != quantiles.len() {
        return None;
    }
    let index = locate(values, x)?;
    let score = interpolate(
        scale.apply(values[index - 1]),
        quantiles[index - 1],
        scale.apply(values[index]),
        quantiles[index],
        scale.apply(x),
    );
    Some(Placement { index, score })
}
