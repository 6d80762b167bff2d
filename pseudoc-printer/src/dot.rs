//! The `.dot` graph dumper used by `--debug` mode. Shaped after the
//! teacher's `CFGPrinter` (record-shaped block nodes, `rank=min` on the
//! entry block, one edge statement per successor), simplified for PseudoC's
//! flat block/edge model.

use crate::options::PrinterOptions;
use pseudoc_ir::Function;
use std::fmt::Write;

pub fn print(func: &Function, opts: &PrinterOptions) -> String {
    let mut out = String::new();
    writeln!(out, "digraph \"{}\" {{", escape(&func.name)).unwrap();
    writeln!(out, "    {{rank=min; {}}}", func.block(func.entry).name).unwrap();
    for block in &func.blocks {
        write!(out, "    {} [shape=record, label=\"{{{}", block.name, escape(&block.name)).unwrap();
        if opts.dot_inst {
            for inst in &block.insts {
                write!(out, "|{}", escape(&inst.to_string())).unwrap();
            }
        }
        writeln!(out, "}}\"]").unwrap();
    }
    for block in &func.blocks {
        for succ in &block.succs {
            writeln!(out, "    {} -> {}", block.name, func.block(*succ).name).unwrap();
        }
    }
    writeln!(out, "}}").unwrap();
    out
}

/// Escape characters meaningful to the record-label mini-language.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('{', "\\{")
        .replace('}', "\\}")
        .replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pseudoc_ir::{Block, BlockId, Inst};

    #[test]
    fn entry_block_gets_rank_min() {
        let mut func = Function::new(0, "f");
        func.blocks.push(Block::new("entry"));
        func.entry = BlockId::new(0);
        assert!(print(&func, &PrinterOptions::default()).contains("{rank=min; entry}"));
    }

    #[test]
    fn inst_text_only_appears_with_dot_inst() {
        let mut func = Function::new(0, "f");
        func.blocks.push(Block::new("entry"));
        func.blocks[0].insts.push(Inst::new("ret", vec!["a2".into()]));
        func.entry = BlockId::new(0);

        assert!(!print(&func, &PrinterOptions::default()).contains("ret a2"));
        assert!(print(&func, &PrinterOptions { dot_inst: true, ..Default::default() })
            .contains("ret a2"));
    }
}
