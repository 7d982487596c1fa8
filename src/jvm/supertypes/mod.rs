//! Lazily discovered class hierarchy and the common-superclass judgment
//!
//! Reconstructing stack-map frames requires a type for every control-flow
//! merge point, and that type is the least upper bound of the incoming
//! types. The hierarchy those bounds live in is never available in full: it
//! is pulled on demand from the archive being rebuilt, from a pre-indexed
//! compile-time classpath, and from a built-in table of platform classes,
//! with every answer memoized for the rest of the run.

mod pool;
mod providers;
mod wrapper;

pub use pool::*;
pub use providers::*;
pub use wrapper::*;
