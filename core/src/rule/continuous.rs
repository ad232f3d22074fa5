//! Templates for real- and complex-valued cells.
//!
//! Each rule carries an "empty" and a "full" marker describing the values it
//! expects cells to take. The markers are advisory: results outside them are
//! accepted, but non-finite results are not.

use std::fmt;

use num::complex::Complex64;

use super::{config_error, gather, Rule, RuleResult, Scalar};
use crate::cell::Cell;

/// Rule over real-valued states.
pub struct RealRule<F> {
    empty: f64,
    full: f64,
    hook: F,
}
impl<F> fmt::Debug for RealRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealRule")
            .field("empty", &self.empty)
            .field("full", &self.full)
            .finish()
    }
}
impl<F> RealRule<F>
where
    F: Fn(f64, &[f64], u64) -> f64 + Send + Sync,
{
    /// Constructs a real-valued rule. Fails if either marker is not finite or
    /// if `empty > full`.
    pub fn new(empty: f64, full: f64, hook: F) -> RuleResult<Self> {
        if !(empty.is_finite() && full.is_finite()) {
            return config_error(format!(
                "markers must be finite, got empty={} full={}",
                empty, full,
            ));
        }
        if empty > full {
            return config_error(format!(
                "empty marker {} is greater than full marker {}",
                empty, full,
            ));
        }
        Ok(Self { empty, full, hook })
    }
}
impl<F> RealRule<F> {
    /// Returns the value of an empty cell.
    pub fn empty(&self) -> f64 {
        self.empty
    }
    /// Returns the value of a full cell.
    pub fn full(&self) -> f64 {
        self.full
    }
    /// Returns whether a value lies between the markers.
    pub fn is_expected(&self, value: f64) -> bool {
        (self.empty..=self.full).contains(&value)
    }
}
impl<F> Rule<f64> for RealRule<F>
where
    F: Fn(f64, &[f64], u64) -> f64 + Send + Sync,
{
    fn next_state(&self, cell: &Cell<f64>, neighbors: &[&Cell<f64>]) -> RuleResult<f64> {
        let (generation, own, neighbors) = gather(cell, neighbors)?;
        (self.hook)(own, &neighbors, generation).check(None)
    }
}

/// Rule over complex-valued states.
///
/// The magnitudes of the markers bound an annulus `|empty| <= |z| <= |full|`
/// of expected values.
pub struct ComplexRule<F> {
    empty: Complex64,
    full: Complex64,
    hook: F,
}
impl<F> fmt::Debug for ComplexRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplexRule")
            .field("empty", &self.empty)
            .field("full", &self.full)
            .finish()
    }
}
impl<F> ComplexRule<F>
where
    F: Fn(Complex64, &[Complex64], u64) -> Complex64 + Send + Sync,
{
    /// Constructs a complex-valued rule. Fails if either marker is not finite
    /// or if `|empty| > |full|`.
    pub fn new(empty: Complex64, full: Complex64, hook: F) -> RuleResult<Self> {
        if empty.check(None).is_err() || full.check(None).is_err() {
            return config_error(format!(
                "markers must be finite, got empty={} full={}",
                empty, full,
            ));
        }
        if empty.norm() > full.norm() {
            return config_error(format!(
                "empty marker {} is larger than full marker {}",
                empty, full,
            ));
        }
        Ok(Self { empty, full, hook })
    }
}
impl<F> ComplexRule<F> {
    /// Returns the value of an empty cell.
    pub fn empty(&self) -> Complex64 {
        self.empty
    }
    /// Returns the value of a full cell.
    pub fn full(&self) -> Complex64 {
        self.full
    }
    /// Returns whether a value lies in the annulus between the markers.
    pub fn is_expected(&self, value: Complex64) -> bool {
        (self.empty.norm()..=self.full.norm()).contains(&value.norm())
    }
}
impl<F> Rule<Complex64> for ComplexRule<F>
where
    F: Fn(Complex64, &[Complex64], u64) -> Complex64 + Send + Sync,
{
    fn next_state(
        &self,
        cell: &Cell<Complex64>,
        neighbors: &[&Cell<Complex64>],
    ) -> RuleResult<Complex64> {
        let (generation, own, neighbors) = gather(cell, neighbors)?;
        (self.hook)(own, &neighbors, generation).check(None)
    }
}
