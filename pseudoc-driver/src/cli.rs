//! Command-line surface (§6): one positional input path plus the flag
//! table. Parsed with `clap`'s derive API, the same way the rest of this
//! codebase's binaries expose their options.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// PseudoC pipeline driver: load a decompiled function, run a scripted
/// pass pipeline over its CFG, and render the result.
#[derive(Debug, Parser)]
#[command(name = "pseudoc", version, about)]
pub struct Cli {
    /// Input file or directory of `.lst` files.
    pub input: PathBuf,

    /// Output file (single-file mode) or directory (directory mode).
    /// Defaults to stdout in single-file mode, or `<input>.<output-suffix>`
    /// per child in directory mode.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Architecture to load.
    #[arg(long, default_value = "xtensa")]
    pub arch: String,

    /// External script to apply (repeatable); overrides any script
    /// embedded in the input file.
    #[arg(long = "script")]
    pub script: Vec<String>,

    /// Iterate the whole driver until the funcdb is unchanged.
    #[arg(long)]
    pub iter: bool,

    /// Safety cap on `--iter` iterations (ambient hardening not present
    /// in the reference driver; see §4.5 of the design doc).
    #[arg(long, default_value_t = 1000)]
    pub max_iter: u32,

    /// Funcdb path; the literal value `none` disables the funcdb entirely.
    #[arg(long)]
    pub funcdb: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Bblocks)]
    pub format: OutputFormat,

    /// Suffix appended to derive an output filename in directory mode.
    #[arg(long = "output-suffix", default_value = ".out")]
    pub output_suffix: String,

    /// Elide instructions marked dead.
    #[arg(long = "no-dead")]
    pub no_dead: bool,

    /// Elide decompilation annotation comments.
    #[arg(long = "no-comments")]
    pub no_comments: bool,

    /// Elide the graph-property header in `bblocks` format.
    #[arg(long = "no-graph-header")]
    pub no_graph_header: bool,

    /// Append the built-in `annotate-calls` per-inst pass to the effective
    /// script, so calls are annotated with the architecture's call-def set
    /// regardless of what the input file or `--script` requested.
    #[arg(long = "annotate-calls")]
    pub annotate_calls: bool,

    /// Show instruction addresses.
    #[arg(long = "inst-addr")]
    pub inst_addr: bool,

    /// Include instruction text in `.dot` nodes.
    #[arg(long = "dot-inst")]
    pub dot_inst: bool,

    /// Use the debug-repr printer for instructions.
    #[arg(long)]
    pub repr: bool,

    /// Write `<in>.0.bb`, `<in>.0.dot`, `<in>.out.bb`, `<in>.out.dot`
    /// around processing each file.
    #[arg(long)]
    pub debug: bool,

    /// Logging threshold (`error`, `warn`, `info`, `debug`, `trace`).
    /// `RUST_LOG`, if set, takes precedence.
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}

/// The `--format` choices. `None` is handled by the driver directly (no
/// printer is invoked); the rest delegate to `pseudoc_printer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum OutputFormat {
    None,
    Bblocks,
    Asm,
    C,
}

impl Cli {
    pub fn printer_options(&self) -> pseudoc_printer::PrinterOptions {
        pseudoc_printer::PrinterOptions {
            no_dead: self.no_dead,
            no_comments: self.no_comments,
            no_graph_header: self.no_graph_header,
            inst_addr: self.inst_addr,
            dot_inst: self.dot_inst,
            repr: self.repr,
        }
    }
}
