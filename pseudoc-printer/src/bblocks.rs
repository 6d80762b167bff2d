//! The `bblocks` format (§4.5, §6): an annotated basic-block dump, the
//! closest rendering to the PseudoC source form the reader accepts.

use crate::inst_text;
use crate::options::PrinterOptions;
use pseudoc_ir::Function;
use std::fmt::Write;

pub fn print(func: &Function, opts: &PrinterOptions) -> String {
    let mut out = String::new();
    if !opts.no_graph_header {
        let edges: usize = func.blocks.iter().map(|b| b.succs.len()).sum();
        writeln!(out, "; graph: {} blocks, {} edges", func.blocks.len(), edges).unwrap();
    }
    writeln!(out, "func {} @ 0x{:x}", func.name, func.addr).unwrap();
    for block in &func.blocks {
        writeln!(out, "block {}:", block.name).unwrap();
        for inst in &block.insts {
            if let Some(line) = inst_text::render(inst, opts) {
                writeln!(out, "    {line}").unwrap();
            }
        }
        if !block.succs.is_empty() {
            let names: Vec<&str> = block
                .succs
                .iter()
                .map(|id| func.block(*id).name.as_str())
                .collect();
            writeln!(out, "    -> {}", names.join(", ")).unwrap();
        }
    }
    out
}
