//! Input/output helpers.
//!
//! - CSV/Excel ingest + type inference (`ingest`)
//! - cleaned-table and report exports (`export`)
//! - series JSON read/write (`series`)
//! - the export counter behind its atomic-increment contract (`counter`)

pub mod counter;
pub mod export;
pub mod ingest;
pub mod series;

pub use counter::*;
pub use export::*;
pub use ingest::*;
pub use series::*;
