use thiserror::Error;

/// Errors raised while resolving or running script steps (§7 `PassError`,
/// plus the registry-lookup `ConfigError` case from §4.4).
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown {kind} pass: {name}")]
    UnknownPass { kind: &'static str, name: String },
    #[error("unknown external script: {name}")]
    UnknownExternalScript { name: String },
    #[error("pass {name} failed: {source}")]
    PassFailed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
