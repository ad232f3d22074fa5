use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use super::{check_num_states, config_error, gather, Rule, RuleError, RuleResult, Scalar};
use crate::cell::Cell;

lazy_static! {
    static ref RULESTRING_REGEX: Regex =
        Regex::new(r"^[Bb](\d*)/?[Ss](\d*)(?:/[Cc]?(\d+))?$").unwrap();
}

/// Largest neighbor count that a birth or survival condition can name.
pub const MAX_COUNT: usize = 63;

/// Outer-totalistic birth/survival rule over neighbors equal to 1, with
/// optional multi-state decay ("Generations" rules).
///
/// - A cell in state 0 becomes 1 if the number of neighbors in state 1 is in
///   the birth set.
/// - A cell in state 1 stays 1 if that number is in the survival set, and
///   otherwise starts decaying.
/// - A decaying cell advances by one state per generation, modulo
///   `num_states`, until it wraps around to 0.
///
/// With 2 states, a cell that fails to survive dies immediately.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LifeRule {
    /// Bit `n` is set if `n` live neighbors cause birth.
    birth: u64,
    /// Bit `n` is set if `n` live neighbors allow survival.
    survival: u64,
    num_states: u32,
}
impl Default for LifeRule {
    fn default() -> Self {
        LIFE
    }
}

/// Conway's Game of Life (B3/S23).
pub const LIFE: LifeRule = LifeRule {
    birth: 1 << 3,
    survival: 1 << 2 | 1 << 3,
    num_states: 2,
};

impl LifeRule {
    /// Constructs a rule from birth and survival neighbor counts. Fails if
    /// there are fewer than 2 states or a count exceeds `MAX_COUNT`.
    pub fn new(birth: &[usize], survival: &[usize], num_states: u32) -> RuleResult<Self> {
        check_num_states(num_states)?;
        let mask = |counts: &[usize]| {
            counts.iter().try_fold(0_u64, |mask, &n| {
                if n > MAX_COUNT {
                    config_error(format!(
                        "neighbor count {} is larger than {}",
                        n, MAX_COUNT,
                    ))
                } else {
                    Ok(mask | 1 << n)
                }
            })
        };
        Ok(Self {
            birth: mask(birth)?,
            survival: mask(survival)?,
            num_states,
        })
    }
    /// Parses a rulestring such as `B3/S23` or, for Generations rules,
    /// `B2/S/C3`.
    pub fn from_rulestring(s: &str) -> RuleResult<Self> {
        let captures = match RULESTRING_REGEX.captures(s.trim()) {
            Some(c) => c,
            None => return config_error(format!("invalid rulestring {:?}", s)),
        };
        let digits = |i: usize| {
            captures[i]
                .chars()
                .filter_map(|ch| ch.to_digit(10))
                .map(|d| d as usize)
                .collect_vec()
        };
        let num_states = match captures.get(3) {
            Some(m) => match m.as_str().parse() {
                Ok(n) => n,
                Err(_) => return config_error(format!("invalid state count in {:?}", s)),
            },
            None => 2,
        };
        Self::new(&digits(1), &digits(2), num_states)
    }

    /// Returns the neighbor counts that cause birth, in increasing order.
    pub fn birth(&self) -> Vec<usize> {
        counts(self.birth).collect()
    }
    /// Returns the neighbor counts that allow survival, in increasing order.
    pub fn survival(&self) -> Vec<usize> {
        counts(self.survival).collect()
    }
    /// Returns the number of cell states.
    pub fn num_states(&self) -> u32 {
        self.num_states
    }

    /// Returns the next state of a cell in state `own` with `live` neighbors
    /// in state 1.
    pub fn transition(&self, own: u32, live: usize) -> u32 {
        let has = |mask: u64| live <= MAX_COUNT && mask & 1 << live != 0;
        match own {
            0 if has(self.birth) => 1,
            0 => 0,
            1 if has(self.survival) => 1,
            _ => (own + 1) % self.num_states,
        }
    }
}

fn counts(mask: u64) -> impl Iterator<Item = usize> {
    (0..=MAX_COUNT).filter(move |&n| mask & 1 << n != 0)
}

impl TryFrom<&str> for LifeRule {
    type Error = RuleError;

    fn try_from(s: &str) -> RuleResult<Self> {
        Self::from_rulestring(s)
    }
}
impl FromStr for LifeRule {
    type Err = RuleError;

    fn from_str(s: &str) -> RuleResult<Self> {
        Self::from_rulestring(s)
    }
}
impl fmt::Display for LifeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "B{}/S{}",
            counts(self.birth).join(""),
            counts(self.survival).join(""),
        )?;
        if self.num_states > 2 {
            write!(f, "/C{}", self.num_states)?;
        }
        Ok(())
    }
}

impl Rule<u32> for LifeRule {
    fn next_state(&self, cell: &Cell<u32>, neighbors: &[&Cell<u32>]) -> RuleResult<u32> {
        let (_, own, neighbors) = gather(cell, neighbors)?;
        let own = own.check(Some(self.num_states))?;
        let live = neighbors.iter().filter(|&&n| n == 1).count();
        Ok(self.transition(own, live))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_life_example() {
        let life = LIFE;
        assert_eq!(1, life.transition(0, 3));
        assert_eq!(0, life.transition(0, 2));
        assert_eq!(1, life.transition(1, 2));
        assert_eq!(1, life.transition(1, 3));
        assert_eq!(0, life.transition(1, 1));
        assert_eq!(0, life.transition(1, 4));
    }

    #[test]
    fn test_generations_decay() {
        let brian: LifeRule = "B2/S/C3".parse().unwrap();
        assert_eq!(3, brian.num_states());
        assert_eq!(1, brian.transition(0, 2));
        // Live cells never survive, so they start dying ...
        assert_eq!(2, brian.transition(1, 2));
        // ... and dying cells ignore their neighbors.
        assert_eq!(0, brian.transition(2, 2));
    }

    #[test]
    fn test_rulestrings() {
        assert_eq!(Ok(LIFE), LifeRule::try_from("B3/S23"));
        assert_eq!(Ok(LIFE), LifeRule::try_from("b3s32"));
        assert_eq!("B36/S23", LifeRule::try_from("B63/S23").unwrap().to_string());
        assert_eq!("B2/S/C3", LifeRule::try_from("B2/S/3").unwrap().to_string());
        assert_eq!("B3/S23", LIFE.to_string());
        assert!(LifeRule::try_from("S23/B3").is_err());
        assert!(LifeRule::try_from("B3/S23/C1").is_err());
        assert!(LifeRule::new(&[64], &[], 2).is_err());
        assert_eq!(vec![2, 3], LIFE.survival());
    }
}
