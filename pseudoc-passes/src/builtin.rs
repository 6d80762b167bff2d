//! The bundled passes (§4.4), registered at startup by
//! [`crate::registry::Registry::builtin`]. These are deliberately small:
//! each exercises one pass arity rather than forming a realistic
//! optimizing pipeline. `remove-trailing-jumps` additionally demonstrates
//! a pass that is registry-resolvable but never wired into any implicit
//! script (§9 open question 1).

use crate::error::Error;
use crate::registry::Registry;
use crate::traits::Props;
use pseudoc_arch::reg_continuous_subrange;
use pseudoc_ir::{Block, Function, Inst};
use serde_yaml::{Mapping, Value};

impl Registry {
    /// A registry preloaded with the bundled passes under their
    /// canonical names.
    pub fn builtin() -> Self {
        let mut reg = Registry::new();
        reg.register_whole_cfg("mark-dead", mark_dead as fn(&mut Function) -> Result<(), Error>);
        reg.register_whole_cfg(
            "infer-params",
            infer_params as fn(&mut Function) -> Result<(), Error>,
        );
        reg.register_per_block(
            "count-insts",
            count_insts as fn(&mut Props, &mut Block) -> Result<(), Error>,
        );
        reg.register_per_inst(
            "annotate-calls",
            annotate_calls as fn(&mut Props, &mut Inst) -> Result<(), Error>,
        );
        reg.register_whole_cfg(
            "remove-trailing-jumps",
            remove_trailing_jumps as fn(&mut Function) -> Result<(), Error>,
        );
        reg
    }
}

/// Marks every instruction in a block dead if the block has no
/// predecessor other than itself and is not the entry block.
fn mark_dead(func: &mut Function) -> Result<(), Error> {
    let entry = func.entry;
    let mut pred_counts = vec![0usize; func.blocks.len()];
    for (i, block) in func.blocks.iter().enumerate() {
        for succ in &block.succs {
            if succ.index() != i {
                pred_counts[succ.index()] += 1;
            }
        }
    }
    for (i, block) in func.blocks.iter_mut().enumerate() {
        if i != entry.index() && pred_counts[i] == 0 {
            for inst in &mut block.insts {
                inst.dead = true;
            }
        }
    }
    Ok(())
}

/// Drops a block's trailing unconditional `jmp` when its sole target is
/// the next block in layout order: the edge already exists in `succs`, so
/// the jump is redundant with the CFG's own fallthrough. Registered but
/// never applied implicitly -- layout order is not a stable notion once
/// dataflow has run, so this is only safe for a script that explicitly
/// wants asm/bblocks output kept close to straight-line source.
fn remove_trailing_jumps(func: &mut Function) -> Result<(), Error> {
    for i in 0..func.blocks.len() {
        let fallthrough = func.blocks.get(i + 1).map(|b| b.name.clone());
        let block = &mut func.blocks[i];
        let redundant = match (block.insts.last(), &fallthrough) {
            (Some(last), Some(next_name)) => {
                last.mnemonic == "jmp" && last.operands.as_slice() == [next_name.clone()]
            }
            _ => false,
        };
        if redundant {
            block.insts.pop();
        }
    }
    Ok(())
}

/// Treats an instruction's first operand as its write and any remaining
/// operands as reads; a register read in the entry block before any write
/// to it is a parameter candidate, filtered down to the architecture's
/// actual parameter-passing convention.
fn infer_params(func: &mut Function) -> Result<(), Error> {
    let arch = pseudoc_arch::current();
    let mut written = std::collections::HashSet::new();
    let mut candidates = pseudoc_arch::RegSet::new();
    let entry = func.entry;
    for inst in &func.block(entry).insts {
        let mut operands = inst.reg_operands();
        if let Some(dst) = operands.next() {
            for src in operands {
                if !written.contains(src) {
                    candidates.insert(pseudoc_arch::Reg::new(src));
                }
            }
            written.insert(dst);
        }
    }
    let order = arch.call_params(func.addr);
    let filtered = reg_continuous_subrange(&candidates, &order);
    func.params = order.into_iter().filter(|r| filtered.contains(r)).collect();
    Ok(())
}

/// Accumulates each block's instruction count into the function's
/// `block_inst_counts` property, unioned by max across repeated runs.
fn count_insts(props: &mut Props, block: &mut Block) -> Result<(), Error> {
    let entry = props
        .entry("block_inst_counts".to_string())
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    let Value::Mapping(counts) = entry else {
        // A previous, unrelated pass left something else under this key;
        // leave it alone rather than clobber foreign state.
        return Ok(());
    };
    let key = Value::String(block.name.clone());
    let seen = counts.get(&key).and_then(Value::as_u64).unwrap_or(0);
    let count = block.insts.len() as u64;
    counts.insert(key, Value::Number(count.max(seen).into()));
    Ok(())
}

/// For a `call` instruction, attaches a comment listing the current
/// architecture's call-def set, when `--annotate-calls` enabled this pass
/// in the first place (the flag itself gates registration, not this body).
fn annotate_calls(_props: &mut Props, inst: &mut Inst) -> Result<(), Error> {
    if inst.mnemonic != "call" {
        return Ok(());
    }
    let arch = pseudoc_arch::current();
    let addr = inst.addr.unwrap_or(0);
    let defs = arch.call_defs(addr);
    let names: Vec<String> = defs.iter().map(|r| r.to_string()).collect();
    inst.comments.push(format!("defs: {}", names.join(", ")));
    Ok(())
}
