//! Collect input files, downgrade every class, and write one archive
//!
//! The pipeline has two strict phases: a single-pass collection that buffers
//! raw bytes and records entry order, then a transform-and-write pass that
//! emits the archive. Any failure anywhere aborts the run; there is no
//! partial-success output mode.

mod collect;
mod errors;
mod pipeline;
mod transform;

pub mod version;

pub use collect::*;
pub use errors::*;
pub use pipeline::*;
pub use transform::*;
