//! Statistical utilities: moments, quantiles, describe rows, and auto-binning.

pub mod bins;
pub mod summary;

pub use bins::*;
pub use summary::*;
