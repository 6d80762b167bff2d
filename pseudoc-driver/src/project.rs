//! Project layout resolution (§6): where the funcdb and symbol table live
//! when the caller doesn't say explicitly.

use std::path::{Path, PathBuf};

/// Where (or whether) the funcdb lives for this run.
pub enum FuncdbConfig {
    /// `--funcdb none`: funcdb load/save are no-ops, change detection
    /// always reports "no change" (§4.2).
    Disabled,
    Path(PathBuf),
}

/// The project directory a bare (non-`--funcdb`) run assumes: the input
/// directory in directory mode, or the input file's containing directory
/// in file mode (§6).
pub fn project_dir(input: &Path, dir_mode: bool) -> PathBuf {
    if dir_mode {
        input.to_path_buf()
    } else {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Resolve `--funcdb` against the project directory's default,
/// `<proj>/funcdb.yaml` (§6).
pub fn resolve_funcdb(cli_funcdb: Option<&str>, proj: &Path) -> FuncdbConfig {
    match cli_funcdb {
        Some("none") => FuncdbConfig::Disabled,
        Some(path) => FuncdbConfig::Path(PathBuf::from(path)),
        None => FuncdbConfig::Path(proj.join("funcdb.yaml")),
    }
}

/// The symbol table path, `<proj>/symtab.txt`, loaded only if present.
pub fn symtab_path(proj: &Path) -> PathBuf {
    proj.join("symtab.txt")
}

/// The `<funcdb>.in` seed sibling, read only on iteration 0 (§4.5 step 1a).
pub fn funcdb_seed_path(funcdb_path: &Path) -> PathBuf {
    let mut s = funcdb_path.as_os_str().to_os_string();
    s.push(".in");
    PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_mode_project_dir_is_the_containing_directory() {
        assert_eq!(
            project_dir(Path::new("/x/y/foo.lst"), false),
            PathBuf::from("/x/y")
        );
    }

    #[test]
    fn file_mode_with_bare_filename_uses_current_directory() {
        assert_eq!(project_dir(Path::new("foo.lst"), false), PathBuf::from("."));
    }

    #[test]
    fn dir_mode_project_dir_is_the_input_itself() {
        assert_eq!(project_dir(Path::new("/proj"), true), PathBuf::from("/proj"));
    }

    #[test]
    fn funcdb_seed_path_appends_dot_in() {
        assert_eq!(
            funcdb_seed_path(Path::new("/p/funcdb.yaml")),
            PathBuf::from("/p/funcdb.yaml.in")
        );
    }
}
