//! Data sources that are not user uploads.

pub mod sample;

pub use sample::*;
