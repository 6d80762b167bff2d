//! The four output formats the driver can render a processed function to
//! (§4.5, §6): `bblocks`, `asm`, `c`, and `.dot`.

mod asm;
mod bblocks;
mod c;
mod dot;
mod inst_text;
mod options;

pub use options::PrinterOptions;

use pseudoc_ir::Function;

/// The output formats selectable via `--format` (`none` is handled by the
/// driver directly and has no printer here).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bblocks,
    Asm,
    C,
}

/// Render `func` in the given format. The `c` format renumbers blocks in
/// postorder as a side effect, hence the `&mut`.
pub fn print(func: &mut Function, format: Format, opts: &PrinterOptions) -> String {
    match format {
        Format::Bblocks => bblocks::print(func, opts),
        Format::Asm => asm::print(func, opts),
        Format::C => c::print(func, opts),
    }
}

/// Render the `.dot` graph used by `--debug` mode.
pub fn print_dot(func: &Function, opts: &PrinterOptions) -> String {
    dot::print(func, opts)
}
