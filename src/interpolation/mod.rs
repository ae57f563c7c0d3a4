//! Bracketing and normal-score interpolation over quantile tables.
//!
//! - [`locate`] — right-biased bisection clamped to a valid bracket
//! - [`probit`] — inverse normal CDF refined against the forward CDF
//! - [`interpolate`] — probit-linear interpolation between two quantiles
//! - [`place`] — both steps at once over a value/quantile row

mod locate;
mod normal;

pub use locate::locate;
pub use normal::{interpolate, place, probit, Placement, Scale};
