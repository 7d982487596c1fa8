//! Minimal reading and re-encoding of the [`class` file format of the JVM][0]
//!
//! [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html

mod class;
mod constants;
mod writer;

pub use class::*;
pub use constants::*;
pub use writer::*;
