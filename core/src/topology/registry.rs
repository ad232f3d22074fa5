//! Lookup of topologies by name.

use super::{Topology, DEFAULT_STD_DEV};
use crate::lattice::{LatticeError, LatticeResult};

/// Parameters that some topologies take when constructed by name.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TopologyParams {
    /// Neighborhood radius for radius-based topologies.
    pub radius: usize,
    /// Standard deviation for the Gaussian random topology.
    pub std_dev: f64,
}
impl Default for TopologyParams {
    fn default() -> Self {
        Self {
            radius: 1,
            std_dev: DEFAULT_STD_DEV,
        }
    }
}

/// Every topology name along with its constructor.
pub const REGISTRY: &[(&str, fn(&TopologyParams) -> Topology)] = &[
    ("square", |_| Topology::Square),
    ("four-square", |_| Topology::FourNeighborSquare),
    ("hexagonal", |_| Topology::Hexagonal),
    ("triangular", |_| Topology::Triangular),
    ("twelve-triangular", |_| Topology::TwelveNeighborTriangular),
    ("moore", |p| Topology::Moore { radius: p.radius }),
    ("von-neumann", |p| Topology::VonNeumann { radius: p.radius }),
    ("bahr", |_| Topology::Bahr),
    ("margolus", |_| Topology::Margolus),
    ("global", |_| Topology::Global),
    ("random-asymmetric", |_| Topology::RandomAsymmetric),
    ("random-gaussian", |p| Topology::RandomGaussian {
        std_dev: p.std_dev,
    }),
    ("small-world", |_| Topology::RandomSmallWorld),
    ("linear", |p| Topology::Linear { radius: p.radius }),
    ("next-nearest", |_| Topology::NextNearestLinear),
    ("margolus-1d", |_| Topology::Margolus1D),
];

/// Constructs a topology from its registry name (case-insensitive).
pub(super) fn lookup(name: &str, params: &TopologyParams) -> LatticeResult<Topology> {
    let name = name.trim().to_ascii_lowercase();
    REGISTRY
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, make)| make(params))
        .ok_or(LatticeError::UnknownTopology(name))
}
