//! Funcdb: the process-wide, keyed, mutable store of per-function facts
//! (§4.2) that transformation passes read and mutate, and whose
//! change-detection is the Pipeline Driver's fixed-point criterion.

mod db;
mod error;
mod record;

pub use db::FuncDb;
pub use error::Error;
pub use record::FuncRecord;
