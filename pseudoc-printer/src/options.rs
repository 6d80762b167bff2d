/// Formatting knobs threaded through every print step (§6, §9 redesign
/// note: replaces the source's hidden `show_comments`/`show_insts`/
/// `simple_repr` globals with an explicit value passed in by the caller).
#[derive(Debug, Clone, Copy, Default)]
pub struct PrinterOptions {
    /// `--no-dead`: omit instructions marked dead rather than showing them.
    pub no_dead: bool,
    /// `--no-comments`: omit decompilation-annotation comments.
    pub no_comments: bool,
    /// `--no-graph-header`: omit the block/edge-count header in `bblocks`.
    pub no_graph_header: bool,
    /// `--inst-addr`: show each instruction's address, when known.
    pub inst_addr: bool,
    /// `--dot-inst`: include instruction text inside `.dot` block nodes.
    pub dot_inst: bool,
    /// `--repr`: use the debug-repr form of an instruction instead of its
    /// ordinary mnemonic-and-operands rendering.
    pub repr: bool,
}
