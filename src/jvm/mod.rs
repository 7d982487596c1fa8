//! Work with JVM classes at the granularity this crate needs
//!
//! Parsing stops at the class-file header (constant pool plus supertype
//! information); everything past the interface table rides along as raw
//! bytes. That is enough to rebuild an archive with rewritten versions while
//! answering the verifier's common-superclass queries, which is the actual
//! hard part of the job (see [`supertypes`]).

mod access_flags;
mod errors;
mod names;

pub mod class_file;
pub mod node_cache;
pub mod supertypes;

pub use access_flags::*;
pub use errors::*;
pub use names::*;
