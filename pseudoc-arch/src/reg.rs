//! Register identifiers and the register-set filters described in §4.1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A register identifier, e.g. `a2` or `sp`. Architectures are free to use
/// whatever naming scheme they like; the core never interprets the string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Reg(pub String);

impl Reg {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Reg {
    fn from(s: &str) -> Self {
        Reg::new(s)
    }
}

/// An unordered set of registers (used for universes, call-save sets, and
/// as the candidate input to the filters below).
pub type RegSet = BTreeSet<Reg>;

/// Build `{prefix}{lo}..={prefix}{hi}` as an ordered sequence, e.g.
/// `reg_range("a", 2, 5)` is `[a2, a3, a4, a5]`.
pub fn reg_range(prefix: &str, lo: u32, hi: u32) -> Vec<Reg> {
    (lo..=hi).map(|n| Reg::new(format!("{prefix}{n}"))).collect()
}

/// The continuous-subrange filter (§4.1, §8 property 7): given a candidate
/// set `regs` and an ordered reference sequence `order`, return the longest
/// prefix of `order` that is entirely contained in `regs`.
///
/// This is stricter than a plain intersection: a calling convention that
/// fills `a2, a3, a4, ...` in order treats a candidate set like `{a2, a4}`
/// as "only `a2` is a real parameter" rather than "`a2` and `a4` both are",
/// since `a4` being used without `a3` means it wasn't filled by this call's
/// argument-passing convention.
pub fn reg_continuous_subrange(regs: &RegSet, order: &[Reg]) -> RegSet {
    order
        .iter()
        .take_while(|r| regs.contains(*r))
        .cloned()
        .collect()
}

/// The simple-intersection filter (§4.1): `regs ∩ order`, order-agnostic.
pub fn reg_simple_intersection(regs: &RegSet, order: &[Reg]) -> RegSet {
    let order_set: RegSet = order.iter().cloned().collect();
    regs.intersection(&order_set).cloned().collect()
}
