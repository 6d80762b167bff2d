//! The concrete CFG shape this crate's parser, passes, and printers share.
//!
//! The design doc calls the CFG "opaque to the core": the Pipeline Driver
//! and Pass Registry only ever touch it through [`Function::foreach_block`],
//! [`Function::foreach_inst`], [`Function::number_postorder`], and the
//! `entry_func_*` accessors. Everything else here exists for the parser and
//! printers, which *do* need to see instruction structure.

use crate::entities::BlockId;
use crate::script::Script;
use pseudoc_arch::{Reg, RegSet};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A single PseudoC instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inst {
    pub mnemonic: String,
    pub operands: Vec<String>,
    pub addr: Option<u64>,
    /// Set by dead-code-style passes (e.g. `mark-dead`); printers elide
    /// these when `--no-dead` is given.
    pub dead: bool,
    /// Decompilation annotations attached by passes (e.g.
    /// `--annotate-calls`); printers elide these when `--no-comments` is
    /// given.
    pub comments: Vec<String>,
}

impl Inst {
    pub fn new(mnemonic: impl Into<String>, operands: Vec<String>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            operands,
            addr: None,
            dead: false,
            comments: Vec::new(),
        }
    }

    /// Registers this instruction reads, in left-to-right operand order.
    /// A bare-word operand that isn't a known mnemonic keyword is treated
    /// as a register reference; this is deliberately permissive since the
    /// core does not interpret instruction semantics.
    pub fn reg_operands(&self) -> impl Iterator<Item = &str> {
        self.operands.iter().map(String::as_str)
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        if !self.operands.is_empty() {
            write!(f, " {}", self.operands.join(", "))?;
        }
        Ok(())
    }
}

/// A maximal straight-line sequence of instructions with a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub insts: Vec<Inst>,
    pub succs: Vec<BlockId>,
}

impl Block {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            insts: Vec::new(),
            succs: Vec::new(),
        }
    }
}

/// A single decompiled function: entry block, basic blocks, edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub addr: u64,
    pub name: String,
    pub blocks: Vec<Block>,
    pub entry: BlockId,
    /// Script steps the parser found embedded in the source file, if any.
    pub parser_script: Option<Script>,
    postorder: Option<Vec<BlockId>>,

    /// Scratch funcdb facts passes accumulate for this function during one
    /// pipeline run (§4.5 step 4, §5: "passes may... mutate [the funcdb]
    /// through the property bag of the current function's own record").
    /// `Funcdb::update_from_cfg` reads these back out at the end of the
    /// run; the core never interprets their contents.
    pub params: Vec<Reg>,
    pub ret: Vec<Reg>,
    pub save: RegSet,
    pub props: BTreeMap<String, serde_yaml::Value>,
}

impl Function {
    pub fn new(addr: u64, name: impl Into<String>) -> Self {
        Self {
            addr,
            name: name.into(),
            blocks: Vec::new(),
            entry: BlockId::new(0),
            parser_script: None,
            postorder: None,
            params: Vec::new(),
            ret: Vec::new(),
            save: RegSet::new(),
            props: BTreeMap::new(),
        }
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    pub fn block_id_by_name(&self, name: &str) -> Option<BlockId> {
        self.blocks
            .iter()
            .position(|b| b.name == name)
            .map(BlockId::new)
    }

    pub fn entry_func_addr(&self) -> u64 {
        self.addr
    }

    pub fn entry_func_name(&self) -> &str {
        &self.name
    }

    /// Drive a whole-CFG-shaped callback over each block in layout order.
    pub fn foreach_block(&mut self, mut f: impl FnMut(&mut Block)) {
        for block in &mut self.blocks {
            f(block);
        }
    }

    /// Drive a per-instruction callback over every instruction, in block
    /// layout order, then instruction order within a block.
    pub fn foreach_inst(&mut self, mut f: impl FnMut(&mut Inst)) {
        for block in &mut self.blocks {
            for inst in &mut block.insts {
                f(inst);
            }
        }
    }

    /// Compute a postorder traversal of the CFG from the entry block and
    /// cache it. Required before C-style output (§4.5).
    pub fn number_postorder(&mut self) -> &[BlockId] {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.postorder_visit(self.entry, &mut visited, &mut order);
        self.postorder = Some(order);
        self.postorder.as_deref().unwrap()
    }

    fn postorder_visit(&self, id: BlockId, visited: &mut HashSet<BlockId>, order: &mut Vec<BlockId>) {
        if !visited.insert(id) {
            return;
        }
        let succs = self.block(id).succs.clone();
        for succ in succs {
            self.postorder_visit(succ, visited, order);
        }
        order.push(id);
    }

    /// The cached postorder, if [`Function::number_postorder`] has run.
    pub fn postorder(&self) -> Option<&[BlockId]> {
        self.postorder.as_deref()
    }
}
