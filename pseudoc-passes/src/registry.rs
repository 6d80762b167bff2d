//! Resolves a `(kind, name)` script step to an effect on a CFG (§4.4).

use crate::error::Error;
use crate::traits::{ExternalScript, PerBlockPass, PerInstPass, WholeCfgPass};
use pseudoc_ir::{Function, Script, StepKind};
use std::collections::HashMap;

/// A mapping from script-step name to pass object, one map per arity, plus
/// the external-script namespace.
#[derive(Default)]
pub struct Registry {
    whole_cfg: HashMap<String, Box<dyn WholeCfgPass>>,
    per_block: HashMap<String, Box<dyn PerBlockPass>>,
    per_inst: HashMap<String, Box<dyn PerInstPass>>,
    external: HashMap<String, Box<dyn ExternalScript>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_whole_cfg(&mut self, name: impl Into<String>, pass: impl WholeCfgPass + 'static) {
        self.whole_cfg.insert(name.into(), Box::new(pass));
    }

    pub fn register_per_block(&mut self, name: impl Into<String>, pass: impl PerBlockPass + 'static) {
        self.per_block.insert(name.into(), Box::new(pass));
    }

    pub fn register_per_inst(&mut self, name: impl Into<String>, pass: impl PerInstPass + 'static) {
        self.per_inst.insert(name.into(), Box::new(pass));
    }

    pub fn register_external(&mut self, name: impl Into<String>, script: impl ExternalScript + 'static) {
        self.external.insert(name.into(), Box::new(script));
    }

    /// Call `init()` on every external script named anywhere in `script`,
    /// once per iteration (§4.5 step 2).
    pub fn init_iteration(&self, script: &Script) -> Result<(), Error> {
        for step in script {
            if step.kind == StepKind::ExternalScript {
                let ext = self.external.get(&step.name).ok_or_else(|| {
                    Error::UnknownExternalScript {
                        name: step.name.clone(),
                    }
                })?;
                ext.init();
            }
        }
        Ok(())
    }

    /// Run every step of `script` against `func`, in order (§4.4).
    pub fn run_script(&self, script: &Script, func: &mut Function) -> Result<(), Error> {
        for step in script {
            self.run_step(step, func)?;
        }
        Ok(())
    }

    fn run_step(&self, step: &pseudoc_ir::ScriptStep, func: &mut Function) -> Result<(), Error> {
        log::debug!("applying {} {}", step.kind, step.name);
        match step.kind {
            StepKind::WholeCfgPass => {
                let pass = self
                    .whole_cfg
                    .get(&step.name)
                    .ok_or_else(|| Error::UnknownPass {
                        kind: "whole-cfg",
                        name: step.name.clone(),
                    })?;
                pass.run(func)
            }
            StepKind::PerBlockPass => {
                let pass = self
                    .per_block
                    .get(&step.name)
                    .ok_or_else(|| Error::UnknownPass {
                        kind: "per-block",
                        name: step.name.clone(),
                    })?;
                // Split borrow: the props bag and the block list are
                // disjoint fields, so both can be mutated in the same pass
                // without going through `foreach_block`, which only
                // exposes the latter.
                for block in &mut func.blocks {
                    pass.run(&mut func.props, block)?;
                }
                Ok(())
            }
            StepKind::PerInstPass => {
                let pass = self
                    .per_inst
                    .get(&step.name)
                    .ok_or_else(|| Error::UnknownPass {
                        kind: "per-inst",
                        name: step.name.clone(),
                    })?;
                for block in &mut func.blocks {
                    for inst in &mut block.insts {
                        pass.run(&mut func.props, inst)?;
                    }
                }
                Ok(())
            }
            StepKind::ExternalScript => {
                let ext = self
                    .external
                    .get(&step.name)
                    .ok_or_else(|| Error::UnknownExternalScript {
                        name: step.name.clone(),
                    })?;
                ext.apply(func)
            }
        }
    }
}
