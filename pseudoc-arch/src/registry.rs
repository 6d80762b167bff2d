//! The process-wide Arch Registry (§4.1).

use crate::arch::{Architecture, Riscv32, Xtensa};
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised by architecture loading. Reported to stderr with a
/// nonzero exit by the driver binary (§7 `ConfigError`).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown architecture: {0}")]
    UnknownArchitecture(String),
    #[error("architecture already loaded as {loaded}, cannot load {requested}")]
    AlreadyLoaded { loaded: String, requested: String },
    #[error("no architecture loaded")]
    NotLoaded,
}

static CURRENT: OnceLock<Box<dyn Architecture>> = OnceLock::new();

fn resolve(name: &str) -> Result<Box<dyn Architecture>, ConfigError> {
    match name {
        "xtensa" => Ok(Box::new(Xtensa)),
        "riscv32" => Ok(Box::new(Riscv32)),
        other => Err(ConfigError::UnknownArchitecture(other.to_string())),
    }
}

/// Load the named architecture, making it globally available via
/// [`current`]. Idempotent when called again with the same name; fails
/// with [`ConfigError::AlreadyLoaded`] if a *different* architecture was
/// already loaded (§3: "at most one Architecture is loaded per process
/// lifetime"; §8 property 8).
pub fn load(name: &str) -> Result<(), ConfigError> {
    if let Some(loaded) = CURRENT.get() {
        if loaded.name() == name {
            log::debug!("architecture {name} already loaded, ignoring repeat load");
            return Ok(());
        }
        return Err(ConfigError::AlreadyLoaded {
            loaded: loaded.name().to_string(),
            requested: name.to_string(),
        });
    }
    let arch = resolve(name)?;
    log::debug!("loaded architecture {name}");
    // `set` can only fail on a lost race with another `set`; since we just
    // checked `get()` returned `None` there's no legitimate caller that
    // could have beaten us under the single-threaded startup contract this
    // registry assumes, so a failure here means two different names were
    // requested concurrently -- surface it as the same "already loaded"
    // condition rather than panicking.
    if CURRENT.set(arch).is_err() {
        let loaded = CURRENT.get().unwrap();
        return Err(ConfigError::AlreadyLoaded {
            loaded: loaded.name().to_string(),
            requested: name.to_string(),
        });
    }
    Ok(())
}

/// Return the loaded architecture, or [`ConfigError::NotLoaded`] if
/// [`load`] hasn't been called yet.
pub fn current() -> Result<&'static dyn Architecture, ConfigError> {
    CURRENT
        .get()
        .map(|b| b.as_ref())
        .ok_or(ConfigError::NotLoaded)
}
