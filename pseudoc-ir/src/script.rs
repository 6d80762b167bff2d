//! The ordered list of pipeline steps a function is run through.
//!
//! A script can come from two places: embedded in the PseudoC source file
//! (`cfg.parser_script`) or supplied on the command line. The driver treats
//! the two as mutually exclusive alternatives, never a merge (§3 of the
//! design doc: CLI scripts replace file-embedded ones).

use std::fmt;

/// The kind of a single script step, matching the four forms the parser
/// recognizes in a `script:` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Apply a whole-CFG pass once.
    WholeCfgPass,
    /// Drive a per-block pass over every block via `foreach_block`.
    PerBlockPass,
    /// Drive a per-inst pass over every instruction via `foreach_inst`.
    PerInstPass,
    /// Hand the CFG to an external script module's `apply(cfg)`.
    ExternalScript,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            StepKind::WholeCfgPass => "pass",
            StepKind::PerBlockPass => "block-pass",
            StepKind::PerInstPass => "inst-pass",
            StepKind::ExternalScript => "script",
        };
        f.write_str(s)
    }
}

/// One `(kind, name)` step of a [`Script`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub kind: StepKind,
    pub name: String,
}

/// An ordered sequence of script steps.
pub type Script = Vec<ScriptStep>;
