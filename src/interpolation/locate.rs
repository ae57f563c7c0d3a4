//! Quantile Locator: bracketing a value inside a sorted reference row.

/// Finds the bracket `[index - 1, index]` of `target` in `sorted_values`.
///
/// Uses upper (right-biased) bisection, so that
/// `sorted_values[index - 1] <= target < sorted_values[index]` whenever the
/// target lies inside the tabulated range. The raw bisection result is then
/// clamped into `[1, len - 1]`: targets below the first value use the first
/// bracket, targets at or above the last value use the last bracket. Both
/// `index - 1` and `index` are therefore always valid positions.
///
/// # Returns
///
/// `None` if fewer than 2 values are given.
///
/// # Examples
///
/// ```
/// use anthro_score::interpolation::locate;
///
/// let row = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(locate(&row, 2.5), Some(2));
/// assert_eq!(locate(&row, 2.0), Some(2)); // ties go right
/// assert_eq!(locate(&row, 0.0), Some(1)); // below range: first bracket
/// assert_eq!(locate(&row, 9.0), Some(3)); // above range: last bracket
/// ```
pub fn locate(sorted_values: &[f64], target: f64) -> Option<usize> {
    let n = sorted_values.len();
    if n < 2 {
        return None;
    }
    let raw = sorted_values.partition_point(|&v| v <= target);
    Some(raw.clamp(1, n - 1))
}
