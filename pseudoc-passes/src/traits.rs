//! The three pass-object shapes the registry resolves script steps to,
//! plus the external-script plugin shape (§4.4, §9).

use crate::error::Error;
use pseudoc_ir::{Block, Function, Inst};
use std::collections::BTreeMap;

/// The current function's funcdb property bag (§5: passes may mutate the
/// funcdb only "through the property bag of the current function's own
/// record"). Per-block and per-inst passes get it alongside their narrower
/// unit so `count-insts` and friends can still accumulate function-wide
/// facts.
pub type Props = BTreeMap<String, serde_yaml::Value>;

/// A whole-CFG pass: applied once to the whole function.
pub trait WholeCfgPass: Send + Sync {
    fn run(&self, func: &mut Function) -> Result<(), Error>;
}

/// A per-block pass: driven over every block via `foreach_block`.
pub trait PerBlockPass: Send + Sync {
    fn run(&self, props: &mut Props, block: &mut Block) -> Result<(), Error>;
}

/// A per-instruction pass: driven over every instruction via `foreach_inst`.
pub trait PerInstPass: Send + Sync {
    fn run(&self, props: &mut Props, inst: &mut Inst) -> Result<(), Error>;
}

/// An external-script plugin: the Rust stand-in for the source's dynamic
/// module import (§9). `init()` is called once per iteration if present;
/// `apply()` runs once per function the script is applied to.
pub trait ExternalScript: Send + Sync {
    fn init(&self) {}
    fn apply(&self, func: &mut Function) -> Result<(), Error>;
}

/// Blanket impls so a plain closure can be registered directly, which is
/// how the built-in passes in [`crate::builtin`] are defined.
impl<F> WholeCfgPass for F
where
    F: Fn(&mut Function) -> Result<(), Error> + Send + Sync,
{
    fn run(&self, func: &mut Function) -> Result<(), Error> {
        self(func)
    }
}

impl<F> PerBlockPass for F
where
    F: Fn(&mut Props, &mut Block) -> Result<(), Error> + Send + Sync,
{
    fn run(&self, props: &mut Props, block: &mut Block) -> Result<(), Error> {
        self(props, block)
    }
}

impl<F> PerInstPass for F
where
    F: Fn(&mut Props, &mut Inst) -> Result<(), Error> + Send + Sync,
{
    fn run(&self, props: &mut Props, inst: &mut Inst) -> Result<(), Error> {
        self(props, inst)
    }
}
