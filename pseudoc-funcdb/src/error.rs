use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the funcdb and symtab loaders (§7 `IOError`/`FormatError`).
#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{path}:{line}: malformed symtab line: {text:?}")]
    Symtab {
        path: PathBuf,
        line: usize,
        text: String,
    },
}
