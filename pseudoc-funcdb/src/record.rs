//! [`FuncRecord`]: the per-function fact bag stored in a [`crate::FuncDb`].

use pseudoc_arch::{Reg, RegSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Facts accumulated about one function, keyed by address in [`crate::FuncDb`].
///
/// `PartialEq` here *is* the structural equality from §3: params/ret stay
/// ordered `Vec`s (order is meaningful, a calling convention's argument
/// order), `save` is a `BTreeSet` so it's already in canonical order, and
/// `props` is a `BTreeMap` so key order never causes two logically-equal
/// records to compare unequal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FuncRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub params: Vec<Reg>,
    #[serde(default)]
    pub ret: Vec<Reg>,
    #[serde(default)]
    pub save: RegSet,
    #[serde(default)]
    pub props: BTreeMap<String, serde_yaml::Value>,
}

impl FuncRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Merge the scratch facts a pipeline run accumulated on a
    /// [`pseudoc_ir::Function`] into this record: a populated field wins
    /// over a stale one, an empty scratch field leaves the existing value
    /// untouched, and `props` is merged key-by-key (new keys override).
    pub fn merge_from_cfg(&mut self, func: &pseudoc_ir::Function) {
        if self.name.is_none() && !func.name.is_empty() {
            self.name = Some(func.name.clone());
        }
        if !func.params.is_empty() {
            self.params = func.params.clone();
        }
        if !func.ret.is_empty() {
            self.ret = func.ret.clone();
        }
        if !func.save.is_empty() {
            self.save = func.save.clone();
        }
        for (k, v) in &func.props {
            self.props.insert(k.clone(), v.clone());
        }
    }
}
