//! Lattice topologies: which cells count as neighbors of which.
//!
//! Every topology is a variant of the closed [`Topology`] enum. Geometric
//! topologies (everything that is not global or random) describe their
//! neighbors as a [`Stencil`] of offsets, which the lattice resolves against
//! its boundary condition. Random topologies build an explicit adjacency list
//! once, see [`random`].

use std::fmt;
use std::str::FromStr;

use crate::boundary::Boundary;
use crate::lattice::{LatticeError, LatticeResult};

pub mod random;
mod registry;
mod stencil;

pub use registry::{TopologyParams, REGISTRY};
pub(crate) use stencil::block_tag;
pub use stencil::{moore_offsets, square_ring, von_neumann_offsets, Stencil};

/// Default standard deviation for [`Topology::RandomGaussian`].
pub const DEFAULT_STD_DEV: f64 = 5.0;

/// Number of spatial dimensions of a lattice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Dimensionality {
    /// A single row of cells.
    One,
    /// A rectangular grid of cells.
    Two,
}

/// Neighborhood topology of a lattice.
///
/// Neighbors are listed clockwise starting from the position closest to the
/// north-west, wherever such an ordering makes sense.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Topology {
    /// Square cells with all 8 surrounding cells as neighbors.
    Square,
    /// Square cells with the 4 orthogonally adjacent cells as neighbors.
    FourNeighborSquare,
    /// Hexagonal cells in offset rows (odd rows shifted half a cell east),
    /// with 6 neighbors.
    Hexagonal,
    /// Alternating up/down triangles with the 3 edge-adjacent triangles as
    /// neighbors. A cell points up when `row + col` is even.
    Triangular,
    /// Alternating up/down triangles with all 12 triangles that share a
    /// vertex as neighbors.
    TwelveNeighborTriangular,
    /// Square cells with every cell within Chebyshev distance `radius`, i.e.
    /// `(2r+1)² - 1` neighbors.
    Moore {
        /// Neighborhood radius (at least 1).
        radius: usize,
    },
    /// Square cells with every cell within Manhattan distance `radius`, i.e.
    /// `2r(r+1)` neighbors.
    VonNeumann {
        /// Neighborhood radius (at least 1).
        radius: usize,
    },
    /// Square cells whose 4 neighbors alternate between the orthogonal cells
    /// (even generations) and the diagonal cells (odd generations).
    Bahr,
    /// 2x2 Margolus block partition; each cell's 3 neighbors are its
    /// block-mates. The partition shifts by one cell diagonally every
    /// generation.
    Margolus,
    /// Every other cell is a neighbor.
    Global,
    /// Each cell gets between 1 and 50 random neighbors; the relation is
    /// directed.
    RandomAsymmetric,
    /// Symmetric random links whose lengths follow a 2D Gaussian.
    RandomGaussian {
        /// Standard deviation of the link offsets, in cells.
        std_dev: f64,
    },
    /// Symmetric preferential-attachment (Barabási–Albert style) graph.
    RandomSmallWorld,
    /// One row of cells; neighbors are the `radius` cells on either side,
    /// giving `2 * radius` neighbors.
    Linear {
        /// Neighborhood radius (at least 1).
        radius: usize,
    },
    /// One row of cells with nearest and next-nearest neighbors on either
    /// side (4 neighbors).
    NextNearestLinear,
    /// One row of cells partitioned into pairs that shift by one cell every
    /// generation.
    Margolus1D,
}
impl Default for Topology {
    fn default() -> Self {
        Topology::Square
    }
}
impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Moore { radius }
            | Topology::VonNeumann { radius }
            | Topology::Linear { radius } => write!(f, "{} (radius {})", self.name(), radius),
            Topology::RandomGaussian { std_dev } => {
                write!(f, "{} (std-dev {})", self.name(), std_dev)
            }
            _ => write!(f, "{}", self.name()),
        }
    }
}
impl FromStr for Topology {
    type Err = LatticeError;

    /// Parses a registry name, optionally followed by `:` and a parameter
    /// (radius or standard deviation), e.g. `moore:3` or `random-gaussian:2.5`.
    fn from_str(s: &str) -> LatticeResult<Self> {
        let (name, param) = match s.find(':') {
            Some(i) => (&s[..i], Some(&s[i + 1..])),
            None => (s, None),
        };
        let mut params = TopologyParams::default();
        if let Some(param) = param {
            let bad_param = || LatticeError::UnknownTopology(s.to_owned());
            if name.contains("gaussian") {
                params.std_dev = param.parse().map_err(|_| bad_param())?;
            } else {
                params.radius = param.parse().map_err(|_| bad_param())?;
            }
        }
        registry::lookup(name, &params)
    }
}

impl Topology {
    /// Returns the registry name of the topology.
    pub fn name(&self) -> &'static str {
        match self {
            Topology::Square => "square",
            Topology::FourNeighborSquare => "four-square",
            Topology::Hexagonal => "hexagonal",
            Topology::Triangular => "triangular",
            Topology::TwelveNeighborTriangular => "twelve-triangular",
            Topology::Moore { .. } => "moore",
            Topology::VonNeumann { .. } => "von-neumann",
            Topology::Bahr => "bahr",
            Topology::Margolus => "margolus",
            Topology::Global => "global",
            Topology::RandomAsymmetric => "random-asymmetric",
            Topology::RandomGaussian { .. } => "random-gaussian",
            Topology::RandomSmallWorld => "small-world",
            Topology::Linear { .. } => "linear",
            Topology::NextNearestLinear => "next-nearest",
            Topology::Margolus1D => "margolus-1d",
        }
    }

    /// Returns whether the topology lays cells out in one row or in a grid.
    pub fn dimensionality(&self) -> Dimensionality {
        match self {
            Topology::Linear { .. } | Topology::NextNearestLinear | Topology::Margolus1D => {
                Dimensionality::One
            }
            _ => Dimensionality::Two,
        }
    }

    /// Returns the number of neighbors every cell has on a lattice of
    /// `cell_count` cells, or `None` if the number varies from cell to cell.
    pub fn neighbor_count(&self, cell_count: usize) -> Option<usize> {
        match *self {
            Topology::Square => Some(8),
            Topology::FourNeighborSquare => Some(4),
            Topology::Hexagonal => Some(6),
            Topology::Triangular => Some(3),
            Topology::TwelveNeighborTriangular => Some(12),
            Topology::Moore { radius } => {
                let side = radius.saturating_mul(2).saturating_add(1);
                Some(side.saturating_mul(side) - 1)
            }
            Topology::VonNeumann { radius } => {
                Some(radius.saturating_mul(2).saturating_mul(radius.saturating_add(1)))
            }
            Topology::Bahr => Some(4),
            Topology::Margolus => Some(3),
            Topology::Global => Some(cell_count.saturating_sub(1)),
            Topology::RandomAsymmetric
            | Topology::RandomGaussian { .. }
            | Topology::RandomSmallWorld => None,
            Topology::Linear { radius } => Some(radius.saturating_mul(2)),
            Topology::NextNearestLinear => Some(4),
            Topology::Margolus1D => Some(1),
        }
    }

    /// Returns whether a cell's neighbors depend on the parity of its
    /// generation.
    pub fn is_time_varying(&self) -> bool {
        matches!(
            self,
            Topology::Bahr | Topology::Margolus | Topology::Margolus1D
        )
    }
    /// Returns whether the lattice is partitioned into Margolus blocks.
    pub fn is_block_partitioned(&self) -> bool {
        matches!(self, Topology::Margolus | Topology::Margolus1D)
    }
    /// Returns whether neighbors are chosen at random when the lattice is
    /// built.
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            Topology::RandomAsymmetric
                | Topology::RandomGaussian { .. }
                | Topology::RandomSmallWorld
        )
    }
    /// Returns whether, on a `width` by `height` lattice with the given
    /// boundary, `b` being a neighbor of `a` implies that `a` is a neighbor of
    /// `b`.
    ///
    /// Hexagonal and triangular stencils depend on the parity of the cell's
    /// position. Reflection maps an edge cell onto a cell of the other parity,
    /// and so does wrapping around an odd number of rows (or columns, for
    /// triangles), so those lattices have one-way links. Reflection also
    /// breaks symmetry once the reach of the neighborhood is at least half the
    /// lattice, because the mirrored offset is then wrapped.
    pub fn is_symmetric(&self, boundary: Boundary, width: usize, height: usize) -> bool {
        let fits = |reach: usize| {
            2 * reach < width && (self.dimensionality() == Dimensionality::One || 2 * reach < height)
        };
        match (*self, boundary) {
            _ if !self.supports(boundary) => false,
            (Topology::RandomAsymmetric, _) => false,
            (Topology::Hexagonal, Boundary::WrapAround) => height % 2 == 0,
            (Topology::Triangular | Topology::TwelveNeighborTriangular, Boundary::WrapAround) => {
                width % 2 == 0 && height % 2 == 0
            }
            (
                Topology::Hexagonal | Topology::Triangular | Topology::TwelveNeighborTriangular,
                Boundary::Reflection,
            ) => false,
            (_, Boundary::WrapAround) => true,
            (_, Boundary::Reflection) => fits(self.reach()),
        }
    }

    /// Returns the radius parameter of radius-based topologies.
    pub fn radius(&self) -> Option<usize> {
        match *self {
            Topology::Moore { radius }
            | Topology::VonNeumann { radius }
            | Topology::Linear { radius } => Some(radius),
            _ => None,
        }
    }
    /// Returns the largest row or column distance to a neighbor, for
    /// geometric topologies.
    fn reach(&self) -> usize {
        match self.radius() {
            Some(radius) => radius,
            None => match self {
                Topology::NextNearestLinear | Topology::TwelveNeighborTriangular => 2,
                _ => 1,
            },
        }
    }

    /// Returns whether the topology supports a boundary condition. Reflection
    /// has no meaningful definition for block partitions, global lattices, or
    /// random graphs, so only wrap-around is accepted for those.
    pub fn supports(&self, boundary: Boundary) -> bool {
        match boundary {
            Boundary::WrapAround => true,
            Boundary::Reflection => {
                !(self.is_block_partitioned() || self.is_random() || *self == Topology::Global)
            }
        }
    }

    /// Checks the topology's parameters. Lattice sizes are checked by
    /// [`LatticeConfig::validate()`](crate::lattice::LatticeConfig::validate),
    /// which also logs the error.
    pub fn validate(&self) -> LatticeResult<()> {
        match *self {
            Topology::Moore { radius }
            | Topology::VonNeumann { radius }
            | Topology::Linear { radius }
                if radius == 0 =>
            {
                Err(LatticeError::ZeroRadius)
            }
            Topology::RandomGaussian { std_dev } if !(std_dev.is_finite() && std_dev > 0.0) => {
                Err(LatticeError::InvalidStdDev(std_dev))
            }
            _ => Ok(()),
        }
    }

    /// Returns the neighbor stencil for geometric topologies, or `None` for
    /// global and random topologies.
    pub fn stencil(&self) -> Option<Stencil> {
        match *self {
            Topology::Square => Some(Stencil::Uniform(moore_offsets(1))),
            Topology::FourNeighborSquare => Some(Stencil::Uniform(von_neumann_offsets(1))),
            Topology::Hexagonal => Some(stencil::hexagonal()),
            Topology::Triangular => Some(stencil::triangular()),
            Topology::TwelveNeighborTriangular => Some(stencil::twelve_triangular()),
            Topology::Moore { radius } => Some(Stencil::Uniform(moore_offsets(radius))),
            Topology::VonNeumann { radius } => Some(Stencil::Uniform(von_neumann_offsets(radius))),
            Topology::Bahr => Some(stencil::bahr()),
            Topology::Margolus => Some(Stencil::Block(Dimensionality::Two)),
            Topology::Linear { radius } => Some(stencil::linear(radius)),
            Topology::NextNearestLinear => Some(stencil::linear(2)),
            Topology::Margolus1D => Some(Stencil::Block(Dimensionality::One)),
            Topology::Global
            | Topology::RandomAsymmetric
            | Topology::RandomGaussian { .. }
            | Topology::RandomSmallWorld => None,
        }
    }
}
