//! The driver that applies a rule to every cell of a lattice.

use std::sync::Arc;

use log::{trace, warn};
use thiserror::Error;

use crate::lattice::{Lattice, LatticeError};
use crate::rule::{Rule, RuleError, RuleResult};

/// Result type returned by the simulation driver.
pub type SimResult<T> = Result<T, SimError>;

/// Error encountered while simulating.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Lattice(#[from] LatticeError),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("rule reads {required} generations but cells only remember {available}")]
    InsufficientHistory { required: usize, available: usize },
}

/// A lattice together with the rule that advances it.
///
/// Every step computes all next states from the current generation before
/// committing any of them, so a rule never sees a mix of old and new states.
#[derive(Debug)]
pub struct Simulation<S> {
    lattice: Lattice<S>,
    rule: Arc<dyn Rule<S>>,
}

impl<S> Simulation<S> {
    /// Constructs a simulation using the given rule.
    pub fn from<R: 'static + Rule<S>>(lattice: Lattice<S>, rule: R) -> SimResult<Self> {
        Self::new(lattice, rule.into_arc())
    }
    /// Constructs a simulation using the given rule. Fails if the lattice's
    /// cells do not remember enough generations for the rule.
    pub fn new(lattice: Lattice<S>, rule: Arc<dyn Rule<S>>) -> SimResult<Self> {
        let required = rule.required_generations();
        let available = lattice.history_capacity();
        if available < required {
            let e = SimError::InsufficientHistory {
                required,
                available,
            };
            warn!("Cannot build simulation: {}", e);
            return Err(e);
        }
        Ok(Self { lattice, rule })
    }

    /// Returns the lattice.
    pub fn lattice(&self) -> &Lattice<S> {
        &self.lattice
    }
    /// Returns the lattice mutably, e.g. for editing cell states between
    /// steps.
    pub fn lattice_mut(&mut self) -> &mut Lattice<S> {
        &mut self.lattice
    }
    /// Returns the lattice, consuming the simulation.
    pub fn into_lattice(self) -> Lattice<S> {
        self.lattice
    }
    /// Returns the rule.
    pub fn rule(&self) -> &Arc<dyn Rule<S>> {
        &self.rule
    }
    /// Returns the current generation.
    pub fn generation(&self) -> u64 {
        self.lattice.generation()
    }

    /// Advances the lattice by one generation. On error the lattice is left
    /// unchanged.
    pub fn step(&mut self) -> SimResult<()> {
        let generation = self.lattice.generation();
        self.rule.begin_generation(generation);
        let lattice = &self.lattice;
        let next = lattice
            .cells()
            .iter()
            .map(|cell| {
                let neighbors = lattice.neighbor_cells(cell);
                self.rule.next_state(cell, &neighbors)
            })
            .collect::<RuleResult<Vec<S>>>()?;
        self.lattice.advance(next)?;
        trace!("Simulated generation {}", generation);
        Ok(())
    }
    /// Advances the lattice by `n` generations, stopping at the first error.
    pub fn step_n(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }
}
