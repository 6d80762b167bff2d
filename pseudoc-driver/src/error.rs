//! The driver's unified error type (§7): a `thiserror` enum wrapping each
//! collaborator crate's own error, plus the filename-context wrapping a
//! pass or parse failure gets at the single-file boundary
//! ("Error while processing file: X"). `main` reports the final value
//! through `anyhow`, matching the "library returns typed errors, binary
//! reports with anyhow" split used elsewhere in this codebase.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] pseudoc_arch::ConfigError),

    #[error(transparent)]
    Funcdb(#[from] pseudoc_funcdb::Error),

    #[error(transparent)]
    Pass(#[from] pseudoc_passes::Error),

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: pseudoc_reader::ParseError,
    },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filename-context wrapper applied at the single-file boundary
    /// (§7 `PassError`): re-raises `source` unmodified beyond this prefix.
    #[error("error while processing file: {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap `self` with the filename-context prefix, unless it already
    /// carries one (so retrying the wrap on an already-wrapped error
    /// doesn't stack duplicate prefixes).
    pub fn with_file_context(self, path: &std::path::Path) -> Error {
        match self {
            Error::File { .. } => self,
            other => Error::File {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }
}
