//! Boundary conditions for cells near the edge of a lattice.

use std::fmt;
use std::str::FromStr;

use crate::coord::{Coord, Offset};

/// How neighbor offsets that leave the grid are brought back onto it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Opposite edges are glued together (toroidal topology).
    WrapAround,
    /// An offset that would leave the grid is mirrored back into it, i.e.
    /// `row - dr` is used instead of `row + dr`. Each axis is handled
    /// independently.
    Reflection,
}
impl Default for Boundary {
    fn default() -> Self {
        Boundary::WrapAround
    }
}
impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::WrapAround => write!(f, "wrap-around"),
            Boundary::Reflection => write!(f, "reflection"),
        }
    }
}
impl FromStr for Boundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "wrap" | "wrap-around" | "wraparound" | "torus" => Ok(Boundary::WrapAround),
            "reflect" | "reflection" | "mirror" => Ok(Boundary::Reflection),
            other => Err(format!("unknown boundary condition {:?}", other)),
        }
    }
}

impl Boundary {
    /// Moves `pos` by `delta` along an axis of length `len`.
    ///
    /// With `Reflection`, if the mirrored position is also outside the grid
    /// (only possible when `|delta| >= len`) it is wrapped.
    #[inline]
    pub fn resolve_axis(self, pos: usize, delta: isize, len: usize) -> usize {
        debug_assert!(len > 0, "axis length must be positive");
        let len = len as isize;
        let target = pos as isize + delta;
        match self {
            Boundary::WrapAround => target.rem_euclid(len) as usize,
            Boundary::Reflection => {
                if 0 <= target && target < len {
                    target as usize
                } else {
                    (pos as isize - delta).rem_euclid(len) as usize
                }
            }
        }
    }

    /// Moves `coord` by `offset` on a `height` by `width` grid.
    #[inline]
    pub fn resolve(self, coord: Coord, offset: Offset, height: usize, width: usize) -> Coord {
        Coord {
            row: self.resolve_axis(coord.row, offset.dr, height),
            col: self.resolve_axis(coord.col, offset.dc, width),
        }
    }
}
