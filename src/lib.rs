//! Repackage compiled Java classes into an archive targeting an older
//! bytecode version
//!
//! The difficult part of the job is not the archive itself: rewriting a
//! class invalidates its stack-map frames, and recomputing those requires
//! answering "what is the nearest common ancestor of these two classes?" for
//! arbitrary class names the verifier runs into. The full hierarchy is never
//! available up front, so it is discovered lazily from three sources in
//! priority order: the archive being rebuilt, a pre-indexed compile-time
//! classpath, and a built-in table of platform classes.
//!
//! The flow is strictly one direction:
//!
//! ```text
//! raw file bytes -> ClassNodeCache -> provider chain -> WrapperPool
//!                -> per-class transformation -> archive writer
//! ```
//!
//! See [`archive::rebuild_archive`] for the pipeline entry point and
//! [`jvm::supertypes`] for the hierarchy resolution machinery.

pub mod archive;
pub mod jvm;

mod util;
