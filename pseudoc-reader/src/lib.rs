//! PseudoC parser: turns a `.lst` text file into a [`pseudoc_ir::Function`]
//! plus an optional embedded script (§4.3). A narrowly-scoped collaborator
//! of the core pipeline, not a full disassembly front end.

#[macro_use]
mod error;
mod parser;

pub use error::{Location, ParseError, ParseResult};
pub use parser::{parse, parse_str};
