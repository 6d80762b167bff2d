//! The Pass Registry and script interpreter (§4.4): resolves the four
//! script-step kinds a PseudoC `script:` directive or `--script` flag can
//! name to a concrete transformation, and bundles four illustrative passes
//! under their canonical names.

mod builtin;
mod error;
mod registry;
mod traits;

pub use error::Error;
pub use registry::Registry;
pub use traits::{ExternalScript, PerBlockPass, PerInstPass, Props, WholeCfgPass};

#[cfg(test)]
mod tests {
    use super::*;
    use pseudoc_ir::{BlockId, Function, ScriptStep, StepKind};

    #[test]
    fn unknown_whole_cfg_pass_is_an_error() {
        let reg = Registry::new();
        let mut func = Function::new(0, "f");
        let script = vec![ScriptStep {
            kind: StepKind::WholeCfgPass,
            name: "does-not-exist".to_string(),
        }];
        let err = reg.run_script(&script, &mut func).unwrap_err();
        assert!(matches!(err, Error::UnknownPass { kind: "whole-cfg", .. }));
    }

    #[test]
    fn builtin_script_runs_in_order() {
        let _ = pseudoc_arch::load("xtensa");
        let reg = Registry::builtin();
        let mut func = Function::new(0x1000, "f");
        func.blocks.push(pseudoc_ir::Block::new("entry"));
        func.entry = BlockId::new(0);
        func.blocks[0]
            .insts
            .push(pseudoc_ir::Inst::new("mov", vec!["a2".into(), "a3".into()]));
        func.blocks[0].insts.push(pseudoc_ir::Inst::new("call", vec!["0x2000".into()]));

        let script = vec![
            ScriptStep {
                kind: StepKind::WholeCfgPass,
                name: "mark-dead".to_string(),
            },
            ScriptStep {
                kind: StepKind::PerBlockPass,
                name: "count-insts".to_string(),
            },
            ScriptStep {
                kind: StepKind::PerInstPass,
                name: "annotate-calls".to_string(),
            },
        ];
        reg.run_script(&script, &mut func).unwrap();

        assert!(func.props.contains_key("block_inst_counts"));
        assert_eq!(func.blocks[0].insts[1].comments.len(), 1);
    }
}
