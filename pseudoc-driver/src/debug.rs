//! `--debug` dump files (§5, §6): `<in>.0.bb`/`<in>.0.dot` before a
//! function runs its script, `<in>.out.bb`/`<in>.out.dot` after. Each debug
//! file stream is scoped to this function and closed before returning, as
//! the design doc's resource-ownership section requires.

use std::io::Write as _;
use std::path::Path;

use pseudoc_ir::Function;
use pseudoc_printer::{Format, PrinterOptions};

use crate::error::Error;

/// Write the `.{suffix}.bb` and `.{suffix}.dot` dumps for `func` next to
/// `input_path`. `suffix` is `"0"` for the pre-script dump, `"out"` for
/// the post-script one.
pub fn dump(input_path: &Path, suffix: &str, func: &mut Function, opts: &PrinterOptions) -> Result<(), Error> {
    let bb_path = sibling(input_path, suffix, "bb");
    let bb_text = pseudoc_printer::print(func, Format::Bblocks, opts);
    write_file(&bb_path, &bb_text)?;

    let dot_path = sibling(input_path, suffix, "dot");
    let dot_text = pseudoc_printer::print_dot(func, opts);
    write_file(&dot_path, &dot_text)?;

    Ok(())
}

fn sibling(input_path: &Path, suffix: &str, ext: &str) -> std::path::PathBuf {
    let mut s = input_path.as_os_str().to_os_string();
    s.push(".");
    s.push(suffix);
    s.push(".");
    s.push(ext);
    std::path::PathBuf::from(s)
}

fn write_file(path: &Path, text: &str) -> Result<(), Error> {
    let mut f = std::fs::File::create(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    f.write_all(text.as_bytes()).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
