//! Grid positions and displacements.

use std::fmt;
use std::ops::Neg;

/// Position of a cell on a lattice.
///
/// Rows grow downwards and columns grow to the right, so `(0, 0)` is the
/// north-west corner of the grid. One-dimensional lattices only use row 0.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Row index (`0..height`).
    pub row: usize,
    /// Column index (`0..width`).
    pub col: usize,
}
impl Coord {
    /// Constructs a coordinate from a row and column.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the row-major index of this coordinate on a grid with the given
    /// width.
    #[inline]
    pub const fn to_index(self, width: usize) -> usize {
        self.row * width + self.col
    }
    /// Returns the coordinate at a row-major index on a grid with the given
    /// width.
    #[inline]
    pub const fn from_index(index: usize, width: usize) -> Self {
        Self {
            row: index / width,
            col: index % width,
        }
    }

    /// Returns the parity of `row + col`, used by lattices whose cell shape
    /// alternates (e.g. triangles pointing up or down).
    #[inline]
    pub const fn checker_parity(self) -> Parity {
        Parity::of((self.row + self.col) as u64)
    }
}
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Signed displacement between two cells, in rows and columns.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Row displacement (positive is south).
    pub dr: isize,
    /// Column displacement (positive is east).
    pub dc: isize,
}
impl Offset {
    /// Constructs an offset.
    #[inline]
    pub const fn new(dr: isize, dc: isize) -> Self {
        Self { dr, dc }
    }

    /// Returns whether the offset is `(0, 0)`.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.dr == 0 && self.dc == 0
    }
    /// Returns the Manhattan (taxicab) length of the offset.
    #[inline]
    pub const fn manhattan(self) -> usize {
        self.dr.unsigned_abs() + self.dc.unsigned_abs()
    }
    /// Returns the Chebyshev (king-move) length of the offset.
    #[inline]
    pub fn chebyshev(self) -> usize {
        std::cmp::max(self.dr.unsigned_abs(), self.dc.unsigned_abs())
    }
}
impl Neg for Offset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.dr, -self.dc)
    }
}
impl From<(isize, isize)> for Offset {
    fn from((dr, dc): (isize, isize)) -> Self {
        Self { dr, dc }
    }
}

/// Even or odd; used for generation and position parity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Parity {
    /// Divisible by two.
    Even = 0,
    /// Not divisible by two.
    Odd = 1,
}
impl Parity {
    /// Returns the parity of a number.
    #[inline]
    pub const fn of(n: u64) -> Self {
        if n % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
    /// Returns the other parity.
    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }
    /// Returns `0` for even and `1` for odd.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}
