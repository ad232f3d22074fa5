//! Everything related to the description of a cellular automaton rule,
//! primarily the transition function.
//!
//! A rule is handed a cell and its neighbors (in lattice order) and returns
//! the cell's next state. The templates in this module read every input at
//! the updated cell's generation, convert it to a typed value, call a
//! user-supplied hook, and check the hook's result before handing it back.
//! Committing the result is the simulation's job.

use std::fmt;
use std::sync::Arc;

use log::warn;
use num::Complex;
use thiserror::Error;

use crate::cell::Cell;
use crate::coord::Coord;

mod continuous;
mod cyclic;
mod integer;
pub mod library;
mod margolus;
mod multigen;
mod object;
mod totalistic;
mod vector;

pub use continuous::{ComplexRule, RealRule};
pub use cyclic::CyclicRule;
pub use integer::{BinaryRule, IntegerRule};
pub use library::RuleParams;
pub use margolus::{BlockRule, Margolus1DRule, MargolusRule};
pub use multigen::MultiGenerationRule;
pub use object::{FiniteObjectRule, ObjectRule, ObjectState};
pub use totalistic::{LifeRule, LIFE};
pub use vector::{ComplexVectorRule, IntegerVectorRule, RealVectorRule, VectorRule};

/// Result type returned by rules.
pub type RuleResult<T> = Result<T, RuleError>;

/// Error encountered while configuring or evaluating a rule.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("state {value} is out of bounds for a rule with {num_states} states")]
    StateOutOfBounds { value: u32, num_states: u32 },
    #[error("value {0} is not finite")]
    NotFinite(String),
    #[error("unrecognized object state {0:?}")]
    UnrecognizedObject(String),
    #[error("expected a vector of length {expected}, got length {got}")]
    VectorLength { expected: usize, got: usize },
    #[error("cell {coord} has no state for generation {generation}")]
    MissingGeneration { coord: Coord, generation: u64 },
    #[error("cell {0} is not part of a Margolus block")]
    NotInBlock(Coord),
    #[error("Margolus block containing cell {0} is incomplete")]
    IncompleteBlock(Coord),
    #[error("invalid rule configuration: {0}")]
    InvalidConfig(String),
}

/// Cellular automaton rule over cells with state type `S`.
pub trait Rule<S>: fmt::Debug + Send + Sync {
    /// Computes the next state of `cell`, given its neighbors in lattice
    /// order. Every input is read at the cell's current generation.
    fn next_state(&self, cell: &Cell<S>, neighbors: &[&Cell<S>]) -> RuleResult<S>;

    /// Called once at the start of every generation, before any call to
    /// `next_state()` for that generation.
    fn begin_generation(&self, _generation: u64) {}

    /// Returns the number of generations of history (including the current
    /// one) the rule reads from every cell.
    fn required_generations(&self) -> usize {
        1
    }

    /// Converts the rule into an `Arc<dyn Rule<S>>`.
    fn into_arc(self) -> Arc<dyn Rule<S>>
    where
        Self: 'static + Sized,
    {
        Arc::new(self)
    }
}

/// Scalar cell value that a rule template can check.
pub trait Scalar: fmt::Debug + Default + Copy + PartialEq + Send + Sync + 'static {
    /// Returns an error if the value is out of bounds. Integers are checked
    /// against `num_states` (if any); floating-point values must be finite.
    fn check(self, num_states: Option<u32>) -> RuleResult<Self>;
}
impl Scalar for u32 {
    fn check(self, num_states: Option<u32>) -> RuleResult<Self> {
        match num_states {
            Some(num_states) if self >= num_states => Err(RuleError::StateOutOfBounds {
                value: self,
                num_states,
            }),
            _ => Ok(self),
        }
    }
}
impl Scalar for f64 {
    fn check(self, _num_states: Option<u32>) -> RuleResult<Self> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(RuleError::NotFinite(self.to_string()))
        }
    }
}
impl Scalar for Complex<f64> {
    fn check(self, _num_states: Option<u32>) -> RuleResult<Self> {
        if self.re.is_finite() && self.im.is_finite() {
            Ok(self)
        } else {
            Err(RuleError::NotFinite(self.to_string()))
        }
    }
}

/// Returns the state of a cell at `generation`.
pub fn value_at<S>(cell: &Cell<S>, generation: u64) -> RuleResult<&S> {
    cell.state_at(generation)
        .ok_or(RuleError::MissingGeneration {
            coord: cell.coord(),
            generation,
        })
}

/// Returns the states of several cells, all at `generation`.
pub fn values_at<'a, S>(cells: &[&'a Cell<S>], generation: u64) -> RuleResult<Vec<&'a S>> {
    cells.iter().map(|&cell| value_at(cell, generation)).collect()
}

/// Reads a cell's generation, its state, and its neighbors' states at that
/// same generation.
pub(crate) fn gather<S: Copy>(
    cell: &Cell<S>,
    neighbors: &[&Cell<S>],
) -> RuleResult<(u64, S, Vec<S>)> {
    let generation = cell.generation();
    let own = *value_at(cell, generation)?;
    let neighbors = neighbors
        .iter()
        .map(|&n| value_at(n, generation).copied())
        .collect::<RuleResult<_>>()?;
    Ok((generation, own, neighbors))
}

/// Logs a rule configuration error and returns it.
pub(crate) fn config_error<T>(message: impl Into<String>) -> RuleResult<T> {
    let message = message.into();
    warn!("Invalid rule configuration: {}", message);
    Err(RuleError::InvalidConfig(message))
}

pub(crate) fn check_num_states(num_states: u32) -> RuleResult<()> {
    if num_states < 2 {
        config_error(format!("need at least 2 states, got {}", num_states))
    } else {
        Ok(())
    }
}

/// Basic rule that never changes any cell states.
#[derive(Debug, Default, Copy, Clone)]
pub struct IdentityRule;
impl<S: Clone> Rule<S> for IdentityRule {
    fn next_state(&self, cell: &Cell<S>, _neighbors: &[&Cell<S>]) -> RuleResult<S> {
        Ok(cell.state().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_checks() {
        assert_eq!(Ok(3), 3_u32.check(Some(4)));
        assert_eq!(Ok(300), 300_u32.check(None));
        assert_eq!(
            Err(RuleError::StateOutOfBounds {
                value: 4,
                num_states: 4
            }),
            4_u32.check(Some(4)),
        );
        assert!(f64::INFINITY.check(None).is_err());
        assert!(Complex::new(0.0, f64::NAN).check(None).is_err());
        assert!(Complex::new(1.0, -1.0).check(None).is_ok());
    }

    #[test]
    fn test_gather_reads_one_generation() {
        let mut cell = Cell::new(Coord::new(0, 0), 1_u32, 2);
        let mut neighbor = Cell::new(Coord::new(0, 1), 5_u32, 2);
        cell.push_state(2);
        neighbor.push_state(6);
        let (generation, own, neighbors) = gather(&cell, &[&neighbor]).unwrap();
        assert_eq!((1, 2, vec![6]), (generation, own, neighbors));

        // A neighbor that lags behind has no state for the cell's generation.
        let stale = Cell::new(Coord::new(1, 1), 0_u32, 2);
        assert_eq!(
            Err(RuleError::MissingGeneration {
                coord: Coord::new(1, 1),
                generation: 1
            }),
            gather(&cell, &[&neighbor, &stale]),
        );
    }

    #[test]
    fn test_config_error_and_num_states() {
        assert!(check_num_states(2).is_ok());
        assert!(matches!(
            check_num_states(1),
            Err(RuleError::InvalidConfig(_))
        ));
    }
}
