//! The CFG model the rest of the pipeline operates on.
//!
//! This is the "CFG Model" component: a deliberately small, concrete
//! representation of a decompiled function, plus the four operations
//! (`foreach_block`, `foreach_inst`, `number_postorder`, `entry_func_*`)
//! the Pipeline Driver and Pass Registry are allowed to use. Everything
//! else in here (instruction/block shape, script steps) exists so the
//! parser and printers have a real structure to build and render.

mod entities;
mod function;
mod script;

pub use entities::BlockId;
pub use function::{Block, Function, Inst};
pub use script::{Script, ScriptStep, StepKind};
