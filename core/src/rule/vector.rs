use std::fmt;
use std::marker::PhantomData;

use num::complex::Complex64;

use super::{check_num_states, config_error, value_at, Rule, RuleError, RuleResult, Scalar};
use crate::cell::Cell;

/// Rule over fixed-length vectors of scalars.
///
/// Every cell holds a vector of the same length. Inputs and results of any
/// other length are rejected, as are results containing out-of-bounds
/// elements.
pub struct VectorRule<T, F> {
    len: usize,
    num_states: Option<u32>,
    hook: F,
    _marker: PhantomData<fn() -> T>,
}

/// Vectors of integer states.
pub type IntegerVectorRule<F> = VectorRule<u32, F>;
/// Vectors of real values.
pub type RealVectorRule<F> = VectorRule<f64, F>;
/// Vectors of complex values.
pub type ComplexVectorRule<F> = VectorRule<Complex64, F>;

impl<T, F> fmt::Debug for VectorRule<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorRule")
            .field("len", &self.len)
            .field("num_states", &self.num_states)
            .finish()
    }
}

impl<T, F> VectorRule<T, F>
where
    T: Scalar,
    F: Fn(&[T], &[&[T]], u64) -> Vec<T> + Send + Sync,
{
    /// Constructs a rule over vectors of length `len`. Fails if `len` is 0.
    pub fn new(len: usize, hook: F) -> RuleResult<Self> {
        if len == 0 {
            return config_error("vector length must be at least 1");
        }
        Ok(Self {
            len,
            num_states: None,
            hook,
            _marker: PhantomData,
        })
    }
}
impl<F> VectorRule<u32, F> {
    /// Bounds every element of every result to `0..num_states`.
    pub fn with_num_states(mut self, num_states: u32) -> RuleResult<Self> {
        check_num_states(num_states)?;
        self.num_states = Some(num_states);
        Ok(self)
    }
}
impl<T, F> VectorRule<T, F> {
    /// Returns the length of every vector.
    pub fn vector_len(&self) -> usize {
        self.len
    }

    fn check_len(&self, got: usize) -> RuleResult<()> {
        if got == self.len {
            Ok(())
        } else {
            Err(RuleError::VectorLength {
                expected: self.len,
                got,
            })
        }
    }
}

impl<T, F> Rule<Vec<T>> for VectorRule<T, F>
where
    T: Scalar,
    F: Fn(&[T], &[&[T]], u64) -> Vec<T> + Send + Sync,
{
    fn next_state(
        &self,
        cell: &Cell<Vec<T>>,
        neighbors: &[&Cell<Vec<T>>],
    ) -> RuleResult<Vec<T>> {
        let generation = cell.generation();
        let own = value_at(cell, generation)?;
        self.check_len(own.len())?;
        let neighbors = neighbors
            .iter()
            .map(|&n| {
                let v = value_at(n, generation)?;
                self.check_len(v.len())?;
                Ok::<_, RuleError>(v.as_slice())
            })
            .collect::<RuleResult<Vec<_>>>()?;

        let next = (self.hook)(own.as_slice(), &neighbors, generation);
        self.check_len(next.len())?;
        next.into_iter()
            .map(|x| x.check(self.num_states))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coord;

    fn sum_hook(own: &[u32], neighbors: &[&[u32]], _: u64) -> Vec<u32> {
        own.iter()
            .enumerate()
            .map(|(i, x)| x + neighbors.iter().map(|n| n[i]).sum::<u32>())
            .collect()
    }

    #[test]
    fn test_integer_vector_sum() {
        let rule = IntegerVectorRule::new(2, sum_hook).unwrap();
        let a = Cell::new(Coord::new(0, 0), vec![1, 2], 1);
        let b = Cell::new(Coord::new(0, 1), vec![10, 20], 1);
        assert_eq!(Ok(vec![11, 22]), rule.next_state(&a, &[&b]));
    }

    #[test]
    fn test_vector_length_mismatch() {
        let rule = IntegerVectorRule::new(2, sum_hook).unwrap();
        let a = Cell::new(Coord::new(0, 0), vec![1, 2], 1);
        let short = Cell::new(Coord::new(0, 1), vec![1], 1);
        assert_eq!(
            Err(RuleError::VectorLength {
                expected: 2,
                got: 1
            }),
            rule.next_state(&a, &[&short]),
        );

        let truncate =
            RealVectorRule::new(3, |own: &[f64], _: &[&[f64]], _| own[..2].to_vec()).unwrap();
        let c = Cell::new(Coord::new(0, 0), vec![0.0; 3], 1);
        assert!(matches!(
            truncate.next_state(&c, &[]),
            Err(RuleError::VectorLength { expected: 3, got: 2 })
        ));
        assert!(RealVectorRule::new(0, |own: &[f64], _: &[&[f64]], _| own.to_vec()).is_err());
    }

    #[test]
    fn test_integer_vector_bounds() {
        let rule = IntegerVectorRule::new(2, sum_hook)
            .unwrap()
            .with_num_states(4)
            .unwrap();
        let a = Cell::new(Coord::new(0, 0), vec![1, 2], 1);
        let b = Cell::new(Coord::new(0, 1), vec![1, 2], 1);
        assert_eq!(
            Err(RuleError::StateOutOfBounds {
                value: 4,
                num_states: 4
            }),
            rule.next_state(&a, &[&b]),
        );
    }
}
