//! Built-in rules over integer states, looked up by name.

use std::sync::Arc;

use super::{
    check_num_states, BinaryRule, CyclicRule, IntegerRule, LifeRule, MargolusRule, Rule,
    RuleError, RuleResult,
};

/// Default number of states for the cyclic rule.
pub const DEFAULT_CYCLIC_STATES: u32 = 14;

/// Parameters that built-in rules take when constructed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleParams {
    /// Rulestring for Life-like rules.
    pub rulestring: String,
    /// Number of states, for rules where it is configurable. `None` picks the
    /// rule's default.
    pub num_states: Option<u32>,
    /// Number of successor-state neighbors needed to advance, for the cyclic
    /// rule.
    pub trigger: u32,
}
impl Default for RuleParams {
    fn default() -> Self {
        Self {
            rulestring: super::LIFE.to_string(),
            num_states: None,
            trigger: 1,
        }
    }
}

/// Rule constructed from the library, along with the number of states its
/// cells take.
#[derive(Debug, Clone)]
pub struct BuiltinRule {
    /// Library name.
    pub name: &'static str,
    /// Number of cell states.
    pub num_states: u32,
    /// The rule itself.
    pub rule: Arc<dyn Rule<u32>>,
}

type Constructor = fn(&RuleParams) -> RuleResult<(u32, Arc<dyn Rule<u32>>)>;

/// Every built-in rule name along with its constructor.
pub const RULES: &[(&str, Constructor)] = &[
    ("life", |p| {
        let rule = LifeRule::from_rulestring(&p.rulestring)?;
        Ok((rule.num_states(), rule.into_arc()))
    }),
    ("cyclic", |p| {
        let num_states = p.num_states.unwrap_or(DEFAULT_CYCLIC_STATES);
        Ok((num_states, CyclicRule::new(num_states, p.trigger)?.into_arc()))
    }),
    ("majority", |_| Ok((2, BinaryRule::new(majority).into_arc()))),
    ("parity", |p| {
        let num_states = p.num_states.unwrap_or(2);
        check_num_states(num_states)?;
        let rule = IntegerRule::new(num_states, move |own, neighbors: &[u32], _| {
            let sum = neighbors.iter().fold(own as u64, |sum, &n| sum + n as u64);
            (sum % num_states as u64) as u32
        })?;
        Ok((num_states, rule.into_arc()))
    }),
    ("critters", |_| {
        Ok((2, MargolusRule::new(critters).with_num_states(2)?.into_arc()))
    }),
];

/// Constructs a built-in rule from its library name (case-insensitive).
pub fn lookup(name: &str, params: &RuleParams) -> RuleResult<BuiltinRule> {
    let wanted = name.trim().to_ascii_lowercase();
    let (name, make) = RULES
        .iter()
        .find(|(n, _)| *n == wanted)
        .ok_or_else(|| RuleError::InvalidConfig(format!("unknown rule {:?}", name)))?;
    let (num_states, rule) = make(params)?;
    Ok(BuiltinRule {
        name: *name,
        num_states,
        rule,
    })
}

/// A cell takes the state held by the majority of itself and its neighbors,
/// keeping its state on a tie.
fn majority(own: u32, neighbors: &[u32], _generation: u64) -> u32 {
    let total = neighbors.len() + 1;
    let live = neighbors.iter().filter(|&&n| n == 1).count() + (own == 1) as usize;
    match (2 * live).cmp(&total) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => 0,
        std::cmp::Ordering::Equal => own,
    }
}

/// Critters: blocks with exactly two live cells are left alone; every other
/// block is inverted, and blocks with three live cells are also turned 180
/// degrees.
fn critters(block: [u32; 4], _generation: u64) -> [u32; 4] {
    let live = block.iter().filter(|&&s| s != 0).count();
    let inverted = block.map(|s| (s == 0) as u32);
    match live {
        2 => block,
        3 => [inverted[2], inverted[3], inverted[0], inverted[1]],
        _ => inverted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::coord::Coord;

    #[test]
    fn test_lookup() {
        let params = RuleParams::default();
        for (name, _) in RULES {
            let builtin = lookup(name, &params).unwrap();
            assert_eq!(*name, builtin.name);
            assert!(builtin.num_states >= 2);
        }
        assert_eq!(DEFAULT_CYCLIC_STATES, lookup("Cyclic", &params).unwrap().num_states);
        assert!(lookup("langtons-ant", &params).is_err());

        let params = RuleParams {
            rulestring: "B2/S/C3".to_owned(),
            ..RuleParams::default()
        };
        assert_eq!(3, lookup("life", &params).unwrap().num_states);
    }

    #[test]
    fn test_majority() {
        assert_eq!(1, majority(0, &[1, 1, 1, 0], 0));
        assert_eq!(0, majority(1, &[0, 0, 1, 0], 0));
        // Tie between 2 live and 2 dead.
        assert_eq!(1, majority(1, &[1, 0, 0], 0));
        assert_eq!(0, majority(0, &[1, 1, 0], 0));
    }

    #[test]
    fn test_critters_blocks() {
        assert_eq!([1, 0, 0, 1], critters([1, 0, 0, 1], 0));
        assert_eq!([1, 1, 1, 1], critters([0, 0, 0, 0], 0));
        assert_eq!([0, 1, 1, 1], critters([1, 0, 0, 0], 0));
        // Three live cells: the dead NE corner becomes the live SW corner.
        assert_eq!([0, 0, 0, 1], critters([1, 0, 1, 1], 0));
    }

    #[test]
    fn test_parity() {
        let params = RuleParams {
            num_states: Some(3),
            ..RuleParams::default()
        };
        let parity = lookup("parity", &params).unwrap().rule;
        let cells = (0..4)
            .map(|i| Cell::new(Coord::new(0, i), i as u32 % 3, 1))
            .collect::<Vec<_>>();
        // 0 + 1 + 2 + 0 = 3
        let neighbors = cells[1..].iter().collect::<Vec<_>>();
        assert_eq!(Ok(0), parity.next_state(&cells[0], &neighbors));
    }
}
