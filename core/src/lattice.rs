//! Grids of cells together with their neighbor structure.
//!
//! A lattice owns its cells in row-major order and answers "who are this
//! cell's neighbors?" in constant time for small lattices. Neighbor lists are
//! computed once at construction; lattices past a size threshold compute them
//! on every query instead, and random lattices build their graph on the first
//! query.

use std::borrow::Cow;
use std::sync::OnceLock;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::boundary::Boundary;
use crate::cell::Cell;
use crate::coord::{Coord, Parity};
use crate::topology::random::{self, Graph};
use crate::topology::{Dimensionality, Stencil, Topology};

/// 2D lattices with more cells than this compute neighbors on the fly.
pub const MAX_CACHED_2D_CELLS: usize = 200 * 200;
/// 1D lattices with more cells than this compute neighbors on the fly.
pub const MAX_CACHED_1D_CELLS: usize = 750 * 750;
/// Global lattices with more cells than this compute neighbors on the fly.
pub const MAX_CACHED_GLOBAL_CELLS: usize = 2500;

/// Result type returned by fallible lattice routines.
pub type LatticeResult<T> = Result<T, LatticeError>;

/// Error encountered while building or updating a lattice.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LatticeError {
    #[error("lattice must contain at least 2 cells, got {width}x{height}")]
    TooSmall { width: usize, height: usize },
    #[error("{topology} lattices are one-dimensional, so height must be 1 (got {height})")]
    NotOneDimensional { topology: &'static str, height: usize },
    #[error("{topology} lattices need an even number of rows and columns, got {width}x{height}")]
    OddBlockDimensions {
        topology: &'static str,
        width: usize,
        height: usize,
    },
    #[error("{boundary} boundary is not supported by {topology} lattices")]
    UnsupportedBoundary {
        topology: &'static str,
        boundary: Boundary,
    },
    #[error("neighborhood radius must be at least 1")]
    ZeroRadius,
    #[error("neighborhood radius {radius} is larger than the lattice (at most {max})")]
    RadiusTooLarge { radius: usize, max: usize },
    #[error("standard deviation must be positive and finite, got {0}")]
    InvalidStdDev(f64),
    #[error("unknown topology {0:?}")]
    UnknownTopology(String),
    #[error("coordinate {coord} is outside the {width}x{height} lattice")]
    OutOfRange {
        coord: Coord,
        width: usize,
        height: usize,
    },
    #[error("expected {expected} states, got {got}")]
    WrongStateCount { expected: usize, got: usize },
}

/// Parameters for building a lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows; must be 1 for one-dimensional topologies.
    pub height: usize,
    /// Neighborhood topology.
    pub topology: Topology,
    /// Boundary condition.
    pub boundary: Boundary,
    /// Number of generations each cell remembers (including the current one).
    pub history: usize,
    /// Seed for random topologies; `None` draws one from the OS.
    pub seed: Option<u64>,
}
impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            topology: Topology::Square,
            boundary: Boundary::WrapAround,
            history: 2,
            seed: None,
        }
    }
}
impl LatticeConfig {
    /// Returns a config for a `width` by `height` lattice with the given
    /// topology and default everything else.
    pub fn new(width: usize, height: usize, topology: Topology) -> Self {
        Self {
            width,
            height,
            topology,
            ..Self::default()
        }
    }
    /// Sets the boundary condition.
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }
    /// Sets the number of generations each cell remembers.
    pub fn with_history(mut self, history: usize) -> Self {
        self.history = history;
        self
    }
    /// Sets the seed for random topologies.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the configuration describes a buildable lattice.
    pub fn validate(&self) -> LatticeResult<()> {
        self.validate_inner().map_err(|e| {
            warn!("Invalid lattice configuration: {}", e);
            e
        })
    }
    fn validate_inner(&self) -> LatticeResult<()> {
        let topology = self.topology;
        topology.validate()?;
        if self.width.saturating_mul(self.height) < 2 {
            return Err(LatticeError::TooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if let Some(radius) = topology.radius() {
            let max = match topology.dimensionality() {
                Dimensionality::One => self.width,
                Dimensionality::Two => self.width.max(self.height),
            };
            if radius > max {
                return Err(LatticeError::RadiusTooLarge { radius, max });
            }
        }
        if topology.dimensionality() == Dimensionality::One && self.height != 1 {
            return Err(LatticeError::NotOneDimensional {
                topology: topology.name(),
                height: self.height,
            });
        }
        if topology.is_block_partitioned() {
            let odd_rows = topology.dimensionality() == Dimensionality::Two && self.height % 2 != 0;
            if odd_rows || self.width % 2 != 0 {
                return Err(LatticeError::OddBlockDimensions {
                    topology: topology.name(),
                    width: self.width,
                    height: self.height,
                });
            }
        }
        if !topology.supports(self.boundary) {
            return Err(LatticeError::UnsupportedBoundary {
                topology: topology.name(),
                boundary: self.boundary,
            });
        }
        Ok(())
    }
}

/// How a lattice answers neighbor queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NeighborStrategy {
    /// One precomputed list per cell.
    Cached,
    /// Two precomputed lists per cell, selected by generation parity.
    CachedByParity,
    /// Computed on every query.
    OnTheFly,
    /// Random graph, built on the first query.
    Graph,
}

#[derive(Debug, Clone)]
enum NeighborTable {
    Cached(Vec<Box<[usize]>>),
    CachedByParity([Vec<Box<[usize]>>; 2]),
    OnTheFly,
    Graph(OnceLock<Graph>),
}

/// Everything needed to resolve neighbors without touching the cells.
#[derive(Debug, Clone)]
struct Geometry {
    width: usize,
    height: usize,
    topology: Topology,
    boundary: Boundary,
    stencil: Option<Stencil>,
}
impl Geometry {
    fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Computes the neighbors of a cell of a non-random topology.
    fn resolve(&self, coord: Coord, parity: Parity) -> Vec<usize> {
        match &self.stencil {
            Some(stencil) => stencil
                .offsets(coord, parity)
                .iter()
                .map(|&offset| {
                    self.boundary
                        .resolve(coord, offset, self.height, self.width)
                        .to_index(self.width)
                })
                .collect(),
            None => {
                debug_assert_eq!(Topology::Global, self.topology);
                let own = coord.to_index(self.width);
                (0..self.cell_count()).filter(|&i| i != own).collect()
            }
        }
    }

    fn resolve_all(&self, parity: Parity) -> Vec<Box<[usize]>> {
        (0..self.cell_count())
            .map(|i| {
                self.resolve(Coord::from_index(i, self.width), parity)
                    .into_boxed_slice()
            })
            .collect()
    }

    fn strategy(&self) -> NeighborStrategy {
        let cells = self.cell_count();
        let max_cached = match self.topology {
            t if t.is_random() => return NeighborStrategy::Graph,
            Topology::Global => MAX_CACHED_GLOBAL_CELLS,
            t if t.dimensionality() == Dimensionality::One => MAX_CACHED_1D_CELLS,
            _ => MAX_CACHED_2D_CELLS,
        };
        if cells > max_cached {
            NeighborStrategy::OnTheFly
        } else if self.topology.is_time_varying() {
            NeighborStrategy::CachedByParity
        } else {
            NeighborStrategy::Cached
        }
    }
}

/// Grid of cells with state type `S` and a fixed neighbor topology.
#[derive(Debug, Clone)]
pub struct Lattice<S> {
    geometry: Geometry,
    seed: Option<u64>,
    cells: Vec<Cell<S>>,
    table: NeighborTable,
}

impl<S> Lattice<S> {
    /// Builds a lattice, setting each cell's initial state with `init`.
    pub fn new(config: &LatticeConfig, mut init: impl FnMut(Coord) -> S) -> LatticeResult<Self> {
        config.validate()?;
        let geometry = Geometry {
            width: config.width,
            height: config.height,
            topology: config.topology,
            boundary: config.boundary,
            stencil: config.topology.stencil(),
        };

        let block_dim = if config.topology.is_block_partitioned() {
            Some(config.topology.dimensionality())
        } else {
            None
        };
        let cells = (0..geometry.cell_count())
            .map(|i| {
                let coord = Coord::from_index(i, config.width);
                let mut cell = Cell::new(coord, init(coord), config.history);
                cell.set_block(block_dim.map(|dim| crate::topology::block_tag(dim, coord)));
                cell
            })
            .collect();

        let strategy = geometry.strategy();
        debug!(
            "Building {}x{} {} lattice ({} boundary) with {:?} neighbors",
            config.width, config.height, config.topology, config.boundary, strategy,
        );
        let table = match strategy {
            NeighborStrategy::Cached => NeighborTable::Cached(geometry.resolve_all(Parity::Even)),
            NeighborStrategy::CachedByParity => NeighborTable::CachedByParity([
                geometry.resolve_all(Parity::Even),
                geometry.resolve_all(Parity::Odd),
            ]),
            NeighborStrategy::OnTheFly => NeighborTable::OnTheFly,
            NeighborStrategy::Graph => NeighborTable::Graph(OnceLock::new()),
        };

        Ok(Self {
            geometry,
            seed: config.seed,
            cells,
            table,
        })
    }

    /// Builds a lattice with every cell in the same state.
    pub fn filled(config: &LatticeConfig, state: S) -> LatticeResult<Self>
    where
        S: Clone,
    {
        Self::new(config, |_| state.clone())
    }

    /// Returns the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.geometry.width
    }
    /// Returns the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.geometry.height
    }
    /// Returns the number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    /// Returns whether the lattice has no cells (never true for a lattice
    /// built by `new()`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    /// Returns the topology.
    #[inline]
    pub fn topology(&self) -> Topology {
        self.geometry.topology
    }
    /// Returns the boundary condition.
    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.geometry.boundary
    }
    /// Returns how neighbor queries are answered.
    pub fn strategy(&self) -> NeighborStrategy {
        match self.table {
            NeighborTable::Cached(_) => NeighborStrategy::Cached,
            NeighborTable::CachedByParity(_) => NeighborStrategy::CachedByParity,
            NeighborTable::OnTheFly => NeighborStrategy::OnTheFly,
            NeighborTable::Graph(_) => NeighborStrategy::Graph,
        }
    }
    /// Returns the generation of the lattice's cells.
    pub fn generation(&self) -> u64 {
        self.cells.first().map_or(0, Cell::generation)
    }
    /// Returns the number of generations each cell remembers.
    pub fn history_capacity(&self) -> usize {
        self.cells.first().map_or(0, Cell::history_capacity)
    }

    /// Returns whether every neighbor link on this lattice goes both ways.
    /// See [`Topology::is_symmetric()`].
    pub fn is_symmetric(&self) -> bool {
        self.geometry
            .topology
            .is_symmetric(self.geometry.boundary, self.width(), self.height())
    }

    /// Returns the number of neighbors every cell has, or `None` if it varies
    /// (random topologies).
    pub fn neighbor_count(&self) -> Option<usize> {
        self.geometry.topology.neighbor_count(self.len())
    }

    /// Returns all cells in row-major order (`row * width + col`).
    #[inline]
    pub fn cells(&self) -> &[Cell<S>] {
        &self.cells
    }
    /// Returns the current state of every cell in row-major order.
    pub fn states(&self) -> impl '_ + Iterator<Item = &S> {
        self.cells.iter().map(Cell::state)
    }
    /// Returns the row-major index of a coordinate, if it is on the lattice.
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if coord.row < self.height() && coord.col < self.width() {
            Some(coord.to_index(self.width()))
        } else {
            None
        }
    }
    /// Returns the cell at a coordinate.
    pub fn cell(&self, coord: Coord) -> Option<&Cell<S>> {
        self.index_of(coord).map(|i| &self.cells[i])
    }
    /// Returns the cell at a row-major index.
    pub fn cell_at(&self, index: usize) -> Option<&Cell<S>> {
        self.cells.get(index)
    }

    /// Overwrites the current state of a cell.
    pub fn set_state(&mut self, coord: Coord, state: S) -> LatticeResult<()> {
        let index = self.index_of(coord).ok_or(LatticeError::OutOfRange {
            coord,
            width: self.width(),
            height: self.height(),
        })?;
        self.cells[index].set_state(state);
        Ok(())
    }

    /// Commits one new state per cell (in row-major order), advancing every
    /// cell by one generation.
    pub fn advance(&mut self, next: Vec<S>) -> LatticeResult<()> {
        if next.len() != self.cells.len() {
            return Err(LatticeError::WrongStateCount {
                expected: self.cells.len(),
                got: next.len(),
            });
        }
        for (cell, state) in self.cells.iter_mut().zip(next) {
            cell.push_state(state);
        }
        trace!("Lattice advanced to generation {}", self.generation());
        Ok(())
    }

    /// Returns the row-major indices of a cell's neighbors for the cell's
    /// current generation.
    pub fn neighbors_of(&self, cell: &Cell<S>) -> Cow<'_, [usize]> {
        self.neighbors_at(cell.coord(), cell.generation())
    }
    /// Returns the row-major indices of the neighbors of the cell at `coord`
    /// during `generation`.
    ///
    /// # Panics
    ///
    /// This function panics if `coord` is not on the lattice.
    pub fn neighbors_at(&self, coord: Coord, generation: u64) -> Cow<'_, [usize]> {
        let index = self
            .index_of(coord)
            .unwrap_or_else(|| panic!("{} is not on the lattice", coord));
        let parity = Parity::of(generation);
        match &self.table {
            NeighborTable::Cached(table) => Cow::Borrowed(&table[index]),
            NeighborTable::CachedByParity(tables) => Cow::Borrowed(&tables[parity.index()][index]),
            NeighborTable::OnTheFly => Cow::Owned(self.geometry.resolve(coord, parity)),
            NeighborTable::Graph(graph) => Cow::Borrowed(&self.graph(graph)[index]),
        }
    }
    /// Returns a cell's neighbors for the cell's current generation.
    pub fn neighbor_cells(&self, cell: &Cell<S>) -> Vec<&Cell<S>> {
        self.neighbors_of(cell)
            .iter()
            .map(|&i| &self.cells[i])
            .collect()
    }

    fn graph<'a>(&self, graph: &'a OnceLock<Graph>) -> &'a Graph {
        graph.get_or_init(|| {
            let mut rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let g = &self.geometry;
            match g.topology {
                Topology::RandomAsymmetric => random::asymmetric(g.cell_count(), &mut rng),
                Topology::RandomGaussian { std_dev } => {
                    random::gaussian(g.height, g.width, std_dev, &mut rng)
                }
                Topology::RandomSmallWorld => random::small_world(g.cell_count(), &mut rng),
                other => unreachable!("{} is not a random topology", other),
            }
        })
    }
}
