//! The PseudoC textual format (§4.3): the parser collaborator.
//!
//! This is intentionally a small recursive-descent-free line scanner, not
//! a general disassembly front end -- the core pipeline only needs a
//! `Function` plus an optional embedded [`pseudoc_ir::Script`] out of it.

use crate::error::{Location, ParseError, ParseResult};
use pseudoc_ir::{Block, Function, Inst, Script, ScriptStep, StepKind};
use std::collections::HashMap;
use std::path::Path;

/// Parse a `.lst` file into a [`Function`].
pub fn parse(path: &Path) -> ParseResult<Function> {
    let text = std::fs::read_to_string(path).map_err(|e| ParseError {
        location: Location::default(),
        message: format!("{}: {e}", path.display()),
    })?;
    let func = parse_str(&text)?;
    log::debug!(
        "parsed {} ({} blocks) from {}",
        func.name,
        func.blocks.len(),
        path.display()
    );
    Ok(func)
}

/// Parse PseudoC source text directly (used by tests and by [`parse`]).
pub fn parse_str(text: &str) -> ParseResult<Function> {
    let mut func: Option<Function> = None;
    let mut block_names: Vec<String> = Vec::new();
    // Deferred successor references: (source block index, target name,
    // the line they were declared on) so we can report a good error if
    // the name never resolves.
    let mut pending_succs: Vec<(usize, String, usize)> = Vec::new();
    let mut script: Script = Vec::new();
    let mut current_block: Option<usize> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_number = idx + 1;
        let loc = Location { line_number };
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("func ") {
            let (name, addr) = parse_func_header(rest, loc)?;
            func = Some(Function::new(addr, name));
            block_names.clear();
            current_block = None;
            continue;
        }

        let Some(f) = func.as_mut() else {
            return err!(loc, "line outside of any `func` declaration");
        };

        if let Some(rest) = trimmed.strip_prefix("block ") {
            let Some(name) = rest.strip_suffix(':') else {
                return err!(loc, "expected `block NAME:`, found {:?}", trimmed);
            };
            let name = name.trim().to_string();
            f.blocks.push(Block::new(name.clone()));
            block_names.push(name);
            current_block = Some(f.blocks.len() - 1);
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("script:") {
            script.push(parse_script_step(rest, loc)?);
            continue;
        }

        // Everything else requires leading whitespace in the source line
        // (an instruction or a successor directive inside a block).
        if !raw_line.starts_with(char::is_whitespace) {
            return err!(loc, "unrecognized directive: {:?}", trimmed);
        }
        let Some(block_idx) = current_block else {
            return err!(loc, "instruction before any `block` declaration");
        };

        if let Some(rest) = trimmed.strip_prefix("->") {
            for name in rest.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                pending_succs.push((block_idx, name.to_string(), line_number));
            }
            continue;
        }

        f.blocks[block_idx].insts.push(parse_inst(trimmed, loc)?);
    }

    let Some(mut func) = func else {
        return err!(
            Location::default(),
            "input file contains no `func` declaration"
        );
    };

    let name_to_idx: HashMap<&str, usize> = block_names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    for (block_idx, target_name, line_number) in pending_succs {
        let loc = Location { line_number };
        let Some(&target_idx) = name_to_idx.get(target_name.as_str()) else {
            return err!(loc, "successor block {:?} is never defined", target_name);
        };
        func.blocks[block_idx]
            .succs
            .push(pseudoc_ir::BlockId::new(target_idx));
    }

    func.parser_script = if script.is_empty() { None } else { Some(script) };
    Ok(func)
}

fn parse_func_header(rest: &str, loc: Location) -> ParseResult<(String, u64)> {
    let mut parts = rest.splitn(2, '@');
    let (Some(name), Some(addr_str)) = (parts.next(), parts.next()) else {
        return err!(loc, "expected `func NAME @ ADDR`, found {:?}", rest);
    };
    let name = name.trim().to_string();
    let addr_str = addr_str.trim();
    let Some(addr) = parse_addr(addr_str) else {
        return err!(loc, "invalid address: {:?}", addr_str);
    };
    Ok((name, addr))
}

fn parse_addr(s: &str) -> Option<u64> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

fn parse_script_step(rest: &str, loc: Location) -> ParseResult<ScriptStep> {
    let rest = rest.trim();
    let mut parts = rest.splitn(2, char::is_whitespace);
    let (Some(kind_str), Some(name)) = (parts.next(), parts.next()) else {
        return err!(loc, "expected `script: KIND NAME`, found {:?}", rest);
    };
    let kind = match kind_str {
        "pass" => StepKind::WholeCfgPass,
        "block-pass" => StepKind::PerBlockPass,
        "inst-pass" => StepKind::PerInstPass,
        "script" => StepKind::ExternalScript,
        other => return err!(loc, "unknown script step kind: {:?}", other),
    };
    Ok(ScriptStep {
        kind,
        name: name.trim().to_string(),
    })
}

fn parse_inst(line: &str, loc: Location) -> ParseResult<Inst> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let Some(mnemonic) = parts.next().filter(|s| !s.is_empty()) else {
        return err!(loc, "empty instruction line");
    };
    let mnemonic = mnemonic.to_string();
    let operands = match parts.next() {
        Some(rest) => rest
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    };
    Ok(Inst::new(mnemonic, operands))
}
