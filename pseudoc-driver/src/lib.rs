//! Pipeline driver library (§4.5): wires the Arch Registry, Funcdb, Pass
//! Registry, parser, and printers into the fixed-point pipeline described
//! in §6. Split out of the `pseudoc` binary so the end-to-end scenarios in
//! §8 can run as ordinary integration tests against a scratch directory.

pub mod cli;
pub mod debug;
pub mod error;
pub mod pipeline;
pub mod project;

pub use cli::Cli;
pub use error::Error;
