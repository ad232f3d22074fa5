//! Cellular automaton lattices with pluggable neighborhood topologies and
//! typed rule templates.

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]
#![deny(clippy::correctness)]

pub mod boundary;
pub mod cell;
pub mod coord;
pub mod lattice;
pub mod rule;
pub mod simulation;
pub mod topology;

pub mod traits {
    //! Traits that are useful to have in scope.

    pub use crate::rule::{ObjectState, Rule, Scalar};
}

pub mod prelude {
    //! Everything needed to build and run a simulation.

    pub use crate::traits::*;

    pub use crate::boundary::Boundary;
    pub use crate::cell::{BlockCorner, BlockTag, Cell};
    pub use crate::coord::{Coord, Offset, Parity};
    pub use crate::lattice::{
        Lattice, LatticeConfig, LatticeError, LatticeResult, NeighborStrategy,
    };
    pub use crate::rule::library::BuiltinRule;
    pub use crate::rule::{
        BinaryRule, ComplexRule, CyclicRule, FiniteObjectRule, IdentityRule, IntegerRule,
        LifeRule, Margolus1DRule, MargolusRule, MultiGenerationRule, ObjectRule, RealRule,
        RuleError, RuleParams, RuleResult, VectorRule, LIFE,
    };
    pub use crate::simulation::{SimError, SimResult, Simulation};
    pub use crate::topology::{Dimensionality, Topology, TopologyParams};
}

pub use boundary::Boundary;
pub use cell::Cell;
pub use coord::{Coord, Offset, Parity};
pub use lattice::{Lattice, LatticeConfig};
pub use simulation::Simulation;
pub use topology::Topology;

#[cfg(test)]
mod tests;
