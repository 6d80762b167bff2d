//! The `asm` format (§4.5, §6): a flat assembly-like rendering with no
//! basic-block framing, suited to a disassembly-style read-through.

use crate::inst_text;
use crate::options::PrinterOptions;
use pseudoc_ir::Function;
use std::fmt::Write;

pub fn print(func: &Function, opts: &PrinterOptions) -> String {
    let mut out = String::new();
    writeln!(out, "; {} @ 0x{:x}", func.name, func.addr).unwrap();
    for block in &func.blocks {
        writeln!(out, "{}:", block.name).unwrap();
        for inst in &block.insts {
            if let Some(line) = inst_text::render(inst, opts) {
                writeln!(out, "    {line}").unwrap();
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pseudoc_ir::{Block, BlockId, Inst};

    #[test]
    fn dead_insts_elided_with_no_dead() {
        let mut func = Function::new(0, "f");
        func.blocks.push(Block::new("b"));
        let mut dead = Inst::new("nop", vec![]);
        dead.dead = true;
        func.blocks[0].insts.push(dead);
        func.entry = BlockId::new(0);

        let text = print(&func, &PrinterOptions { no_dead: true, ..Default::default() });
        assert!(!text.contains("nop"));
    }
}
